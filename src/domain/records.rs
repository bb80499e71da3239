//! Value records exchanged with the case-management collaborators.
//!
//! The USSD engine treats goal, contact, and tracking services as black
//! boxes; these are the shapes that cross the port boundary. Summaries are
//! also cached inside the session's flow data for index-based selection, so
//! they carry serde derives.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::foundation::{ContactId, GoalId, Language, PhoneNumber, UserId, UserRole};

/// A registered platform user as resolved by phone-number lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredUser {
    pub user_id: UserId,
    pub role: UserRole,
    pub language: Language,
}

/// Category of a beneficiary goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    Business,
    Education,
    Health,
    Housing,
    Other,
}

impl GoalType {
    /// Maps a single-digit menu choice to a goal type.
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice {
            "1" => Some(GoalType::Business),
            "2" => Some(GoalType::Education),
            "3" => Some(GoalType::Health),
            "4" => Some(GoalType::Housing),
            "5" => Some(GoalType::Other),
            _ => None,
        }
    }

    /// Returns the persistence string for this goal type.
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::Business => "business",
            GoalType::Education => "education",
            GoalType::Health => "health",
            GoalType::Housing => "housing",
            GoalType::Other => "other",
        }
    }

    /// Parses a goal type from its persistence string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "business" => Some(GoalType::Business),
            "education" => Some(GoalType::Education),
            "health" => Some(GoalType::Health),
            "housing" => Some(GoalType::Housing),
            "other" => Some(GoalType::Other),
            _ => None,
        }
    }
}

/// Group-meeting attendance for a tracking week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attendance {
    Present,
    Absent,
}

impl Attendance {
    /// Maps a single-digit menu choice to an attendance value.
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice {
            "1" => Some(Attendance::Present),
            "2" => Some(Attendance::Absent),
            _ => None,
        }
    }

    /// Returns the persistence string for this attendance value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Attendance::Present => "present",
            Attendance::Absent => "absent",
        }
    }

    /// Parses an attendance value from its persistence string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "present" => Some(Attendance::Present),
            "absent" => Some(Attendance::Absent),
            _ => None,
        }
    }
}

/// A goal as listed for menu browsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalSummary {
    pub id: GoalId,
    pub goal_type: GoalType,
    pub description: String,
    pub target_amount: i64,
    pub target_date: NaiveDate,
}

/// A fully-validated goal ready for creation.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalSubmission {
    pub goal_type: GoalType,
    pub description: String,
    pub target_amount: i64,
    pub target_date: NaiveDate,
}

/// An emergency contact as listed for menu browsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSummary {
    pub id: ContactId,
    pub name: String,
    pub phone: PhoneNumber,
    pub relationship: String,
    pub is_primary: bool,
}

/// A fully-validated emergency contact ready for creation.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactSubmission {
    pub name: String,
    pub phone: PhoneNumber,
    pub relationship: String,
    pub address: String,
    pub is_primary: bool,
}

/// One week of tracking figures ready for submission.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekPayload {
    pub week_ending: NaiveDate,
    pub income_this_week: i64,
    pub expenses_this_week: i64,
    pub current_capital: i64,
    pub attendance: Attendance,
    pub notes: String,
    pub challenges: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_type_from_choice_covers_menu_range() {
        assert_eq!(GoalType::from_choice("1"), Some(GoalType::Business));
        assert_eq!(GoalType::from_choice("5"), Some(GoalType::Other));
        assert_eq!(GoalType::from_choice("6"), None);
        assert_eq!(GoalType::from_choice("0"), None);
    }

    #[test]
    fn goal_type_as_str_roundtrips_through_parse() {
        for gt in [
            GoalType::Business,
            GoalType::Education,
            GoalType::Health,
            GoalType::Housing,
            GoalType::Other,
        ] {
            assert_eq!(GoalType::parse(gt.as_str()), Some(gt));
        }
    }

    #[test]
    fn attendance_from_choice_maps_one_and_two() {
        assert_eq!(Attendance::from_choice("1"), Some(Attendance::Present));
        assert_eq!(Attendance::from_choice("2"), Some(Attendance::Absent));
        assert_eq!(Attendance::from_choice("3"), None);
    }

    #[test]
    fn attendance_as_str_roundtrips_through_parse() {
        for a in [Attendance::Present, Attendance::Absent] {
            assert_eq!(Attendance::parse(a.as_str()), Some(a));
        }
    }

    #[test]
    fn goal_summary_serializes_for_flow_caching() {
        let summary = GoalSummary {
            id: GoalId::new(),
            goal_type: GoalType::Business,
            description: "Expand kiosk stock".to_string(),
            target_amount: 50_000,
            target_date: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
        };
        let json = serde_json::to_string(&summary).unwrap();
        let back: GoalSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }
}
