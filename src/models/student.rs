//! Student roster entry.

use serde::{Deserialize, Serialize};

/// A student as returned by the roster query.
///
/// `nisn` is the national student identification number, treated as opaque
/// display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub nisn: String,
    pub class: String,
}
