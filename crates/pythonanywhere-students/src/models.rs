//! Student models.

use serde::{Deserialize, Serialize};

/// Students attached to a teacher account.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudentList {
    /// Students, in the order the API returns them.
    #[serde(default)]
    pub students: Vec<Student>,
}

impl StudentList {
    /// Usernames of all students.
    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.students.iter().map(|student| student.username.as_str())
    }
}

/// A student account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Student {
    /// Account username.
    pub username: String,
}
