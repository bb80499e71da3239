//! Per-flow transient data carried inside a session between turns.
//!
//! Each multi-step flow accumulates a draft across turns and submits it
//! atomically on confirmation. The accumulator is a closed tagged union so a
//! handler can only see the fields of its own flow; there is no shared bag
//! of optional fields for values to bleed through.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::PhoneNumber;
use crate::domain::records::{
    Attendance, ContactSubmission, ContactSummary, GoalSubmission, GoalSummary, GoalType,
};

use super::menu_state::{FlowFamily, MenuState};

/// Draft for one week of tracking figures, filled one field per turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingDraft {
    pub income_this_week: Option<i64>,
    pub expenses_this_week: Option<i64>,
    pub current_capital: Option<i64>,
    pub attendance: Option<Attendance>,
}

impl TrackingDraft {
    /// Returns the draft's figures if every field has been entered.
    pub fn figures(&self) -> Option<(i64, i64, i64, Attendance)> {
        Some((
            self.income_this_week?,
            self.expenses_this_week?,
            self.current_capital?,
            self.attendance?,
        ))
    }
}

/// Draft for a new goal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalDraft {
    pub goal_type: Option<GoalType>,
    pub description: Option<String>,
    pub target_amount: Option<i64>,
    pub target_date: Option<NaiveDate>,
}

impl GoalDraft {
    /// Converts the draft into a submission if every field has been entered.
    pub fn to_submission(&self) -> Option<GoalSubmission> {
        Some(GoalSubmission {
            goal_type: self.goal_type?,
            description: self.description.clone()?,
            target_amount: self.target_amount?,
            target_date: self.target_date?,
        })
    }
}

/// Draft for a new emergency contact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactDraft {
    pub name: Option<String>,
    pub phone: Option<PhoneNumber>,
    pub relationship: Option<String>,
    pub address: Option<String>,
    pub is_primary: Option<bool>,
}

impl ContactDraft {
    /// Converts the draft into a submission if every field has been entered.
    pub fn to_submission(&self) -> Option<ContactSubmission> {
        Some(ContactSubmission {
            name: self.name.clone()?,
            phone: self.phone.clone()?,
            relationship: self.relationship.clone()?,
            address: self.address.clone()?,
            is_primary: self.is_primary?,
        })
    }
}

/// Recent goals cached for index-based selection while browsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalBrowse {
    pub goals: Vec<GoalSummary>,
    pub selected: Option<usize>,
}

impl GoalBrowse {
    /// Returns the goal currently selected for the details view.
    pub fn selected_goal(&self) -> Option<&GoalSummary> {
        self.goals.get(self.selected?)
    }
}

/// Recent contacts cached for index-based selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactBrowse {
    pub contacts: Vec<ContactSummary>,
}

/// The at-most-one active flow accumulator of a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "flow", rename_all = "snake_case")]
pub enum ActiveFlow {
    #[default]
    Idle,
    Tracking(TrackingDraft),
    GoalCreate(GoalDraft),
    GoalBrowse(GoalBrowse),
    ContactCreate(ContactDraft),
    ContactBrowse(ContactBrowse),
}

impl ActiveFlow {
    /// Returns the flow family this accumulator belongs to, if any.
    pub fn family(&self) -> Option<FlowFamily> {
        match self {
            ActiveFlow::Idle => None,
            ActiveFlow::Tracking(_) => Some(FlowFamily::Tracking),
            ActiveFlow::GoalCreate(_) => Some(FlowFamily::GoalCreate),
            ActiveFlow::GoalBrowse(_) => Some(FlowFamily::GoalBrowse),
            ActiveFlow::ContactCreate(_) => Some(FlowFamily::ContactCreate),
            ActiveFlow::ContactBrowse(_) => Some(FlowFamily::ContactBrowse),
        }
    }
}

/// Transient conversational state persisted alongside the session row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowData {
    /// The single active draft or browse cache.
    #[serde(default)]
    pub active: ActiveFlow,

    /// Single-slot back-navigation memory, written before each dispatch.
    #[serde(default)]
    pub previous_menu_state: Option<MenuState>,

    /// Raw input trail for diagnostics.
    #[serde(default)]
    pub input_history: Vec<String>,
}
