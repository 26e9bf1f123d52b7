//! Canonical attendance status and raw-token normalization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical attendance status.
///
/// Source records carry two parallel vocabularies (English and Indonesian)
/// that map many-to-one onto these four values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Sick,
    Permitted,
    Absent,
}

impl AttendanceStatus {
    /// All canonical statuses in display order.
    pub const ALL: [AttendanceStatus; 4] = [
        AttendanceStatus::Present,
        AttendanceStatus::Sick,
        AttendanceStatus::Permitted,
        AttendanceStatus::Absent,
    ];

    /// Normalize a raw status token.
    ///
    /// Matching is exact and case-sensitive. Unknown tokens return `None`
    /// and are displayed verbatim; the upstream store is not
    /// schema-enforced, so this stays lenient instead of failing hard.
    pub fn from_raw(token: &str) -> Option<Self> {
        match token {
            "present" | "hadir" => Some(Self::Present),
            "sick" | "sakit" => Some(Self::Sick),
            "permitted" | "izin" => Some(Self::Permitted),
            "absent" | "alpha" => Some(Self::Absent),
            _ => None,
        }
    }

    /// Display label used in rendered reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Present => "Hadir",
            Self::Sick => "Sakit",
            Self::Permitted => "Izin",
            Self::Absent => "Alpha",
        }
    }

}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_raw(s).ok_or_else(|| format!("unknown status '{s}' (expected hadir, sakit, izin, or alpha)"))
    }
}

/// Display label for an arbitrary raw token.
///
/// Canonical tokens get their label, anything else passes through verbatim.
pub fn display_label(raw: &str) -> &str {
    match AttendanceStatus::from_raw(raw) {
        Some(status) => status.label(),
        None => raw,
    }
}
