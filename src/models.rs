use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub type StudentId = u32;

/// Students at or above this attendance percentage count as present.
pub const PRESENT_THRESHOLD: u8 = 75;
pub const MIN_ATTENDANCE: u8 = 40;
pub const MAX_ATTENDANCE: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub city: String,
    pub attendance: u8,
}

impl Student {
    pub fn from_remote(user: RemoteUser, attendance: u8) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            city: user.address.city,
            attendance,
        }
    }

    pub fn status(&self) -> AttendanceStatus {
        AttendanceStatus::of(self.attendance)
    }

    pub fn is_present(&self) -> bool {
        self.status() == AttendanceStatus::Present
    }

    pub fn is_absent(&self) -> bool {
        self.status() == AttendanceStatus::Absent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn of(attendance: u8) -> Self {
        if attendance >= PRESENT_THRESHOLD {
            AttendanceStatus::Present
        } else {
            AttendanceStatus::Absent
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "✅",
            AttendanceStatus::Absent => "⚠️",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterType {
    #[default]
    All,
    Present,
    Absent,
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FilterType::All => "All",
            FilterType::Present => "Present",
            FilterType::Absent => "Absent",
        };
        f.write_str(label)
    }
}

impl FromStr for FilterType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "all" => Ok(FilterType::All),
            "present" => Ok(FilterType::Present),
            "absent" => Ok(FilterType::Absent),
            other => Err(format!("unknown filter type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewConfig {
    pub filter_type: FilterType,
    pub show_low_attendance: bool,
    pub sort_by_attendance: bool,
}

/// Aggregate statistics shown alongside the display list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub filtered: usize,
    pub selected: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteUser {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub address: RemoteAddress,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteAddress {
    pub city: String,
}
