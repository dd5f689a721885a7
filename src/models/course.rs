use serde::{Deserialize, Serialize};

use crate::models::palette;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub course_number: String,
    pub course_name: String,
    pub course_color: String,
}

impl Course {
    /// Substitute for an unresolved course join. Degraded state, not an error.
    pub fn fallback() -> Self {
        Self {
            id: String::new(),
            course_number: String::new(),
            course_name: "Unknown Course".to_string(),
            course_color: palette::ACCENT_COLOR.to_string(),
        }
    }
}
