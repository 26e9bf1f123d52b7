//! School identity used in report headers and signature blocks.

use serde::{Deserialize, Serialize};

/// Header and signature identity for rendered reports.
///
/// All fields are opaque display text. Missing values fall back to the
/// `"-"` placeholder so a partially configured school still renders a
/// well-formed report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolInfo {
    pub name: String,
    pub address: String,
    pub npsn: String,
    pub principal_name: String,
    pub principal_nip: String,
    /// Place name used in the signature date stamp.
    pub place: String,
}

impl Default for SchoolInfo {
    fn default() -> Self {
        Self {
            name: "-".to_string(),
            address: "-".to_string(),
            npsn: "-".to_string(),
            principal_name: "-".to_string(),
            principal_nip: "-".to_string(),
            place: "-".to_string(),
        }
    }
}
