use serde::{Deserialize, Serialize};

/// Status a student can be toggled into during the day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Washroom,
    Activity,
    Bunking,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 5] = [
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
        AttendanceStatus::Washroom,
        AttendanceStatus::Activity,
        AttendanceStatus::Bunking,
    ];

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Washroom => "washroom",
            AttendanceStatus::Activity => "activity",
            AttendanceStatus::Bunking => "bunking",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "present" => Some(AttendanceStatus::Present),
            "absent" => Some(AttendanceStatus::Absent),
            "washroom" => Some(AttendanceStatus::Washroom),
            "activity" => Some(AttendanceStatus::Activity),
            "bunking" => Some(AttendanceStatus::Bunking),
            _ => None,
        }
    }

    /// Helper: parse user input (any case, surrounding blanks ignored)
    pub fn from_input(s: &str) -> Option<Self> {
        Self::from_db_str(&s.trim().to_lowercase())
    }

    /// Everything except `absent` means the student was in school that day.
    pub fn counts_as_present(&self) -> bool {
        !matches!(self, AttendanceStatus::Absent)
    }
}
