// Copyright (c) 2025 - Cowboy AI, Inc.
//! Examination Session Value Objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{DomainError, DomainResult};

/// Examination session within an academic year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamSession {
    /// Winter semester session
    Winter,

    /// Spring semester session
    Spring,

    /// September retake session
    September,
}

impl fmt::Display for ExamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExamSession::Winter => write!(f, "winter"),
            ExamSession::Spring => write!(f, "spring"),
            ExamSession::September => write!(f, "september"),
        }
    }
}

/// Academic year expressed as a consecutive year pair, e.g. `2024-2025`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AcademicYear(String);

impl AcademicYear {
    pub fn new(year: impl Into<String>) -> DomainResult<Self> {
        let year = year.into();

        let (first, second) = year.split_once('-').ok_or_else(|| {
            DomainError::InvalidAcademicYear(format!(
                "expected <year>-<year>, got {:?}",
                year
            ))
        })?;

        let first: u16 = first.parse().map_err(|_| {
            DomainError::InvalidAcademicYear(format!("invalid start year in {:?}", year))
        })?;
        let second: u16 = second.parse().map_err(|_| {
            DomainError::InvalidAcademicYear(format!("invalid end year in {:?}", year))
        })?;

        if second != first + 1 {
            return Err(DomainError::InvalidAcademicYear(format!(
                "years must be consecutive, got {}-{}",
                first, second
            )));
        }

        Ok(Self(year))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AcademicYear {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_academic_year_validation() {
        assert!(AcademicYear::new("2024-2025").is_ok());
        assert!(AcademicYear::new("2024-2026").is_err());
        assert!(AcademicYear::new("2024").is_err());
        assert!(AcademicYear::new("abcd-efgh").is_err());
        assert!(AcademicYear::new("").is_err());
    }

    #[test]
    fn test_exam_session_display() {
        assert_eq!(ExamSession::Winter.to_string(), "winter");
        assert_eq!(ExamSession::Spring.to_string(), "spring");
        assert_eq!(ExamSession::September.to_string(), "september");
    }
}
