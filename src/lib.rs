//! Snapshelf: a terminal photo gallery. Photos are captured or imported,
//! tagged with a timestamp and location, stored in SQLite, and browsed in a
//! thumbnail grid.

pub mod app;
pub mod capture;
pub mod config;
pub mod db;
pub mod device;
pub mod error;
pub mod gallery;
pub mod logging;
pub mod storage;
pub mod trash;
pub mod ui;
