//! Types for the deleted photos list.

#[derive(Debug, Clone, PartialEq)]
pub struct DeletedImage {
    pub id: i64,
    pub path: String,            // Current path in trash
    pub original_path: String,   // Path before trashing
    pub timestamp: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub deleted_at: String,
}
