//! Menu states of the USSD conversation.
//!
//! Every state a session can rest in between turns. The dispatcher in
//! `domain::menu` pairs each state with one renderer and one handler; the
//! persistence layer stores the state by its snake_case name.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Flow families used to keep the session's draft accumulator honest.
///
/// A draft may only be active while the menu state belongs to the matching
/// family; leaving the family (back-navigation, cancel) clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowFamily {
    Tracking,
    GoalCreate,
    GoalBrowse,
    ContactCreate,
    ContactBrowse,
}

/// All states the menu engine can dispatch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MenuState {
    #[default]
    MainMenu,

    // Weekly tracking flow
    TrackingIncome,
    TrackingExpenses,
    TrackingCapital,
    TrackingAttendance,
    TrackingConfirm,

    // Goals flow
    GoalsMenu,
    ViewGoals,
    GoalDetails,
    CreateGoalType,
    CreateGoalDesc,
    CreateGoalAmount,
    CreateGoalDate,
    CreateGoalConfirm,

    // Emergency contacts flow
    ContactsMenu,
    ViewContacts,
    AddContactName,
    AddContactPhone,
    AddContactRelationship,
    AddContactAddress,
    AddContactPrimary,
    AddContactConfirm,
    SelectPrimaryContact,

    // Language flow
    LanguageSelect,

    // Reserved state entered when an expired session is superseded
    SessionExpired,
}

impl MenuState {
    /// Returns the persistence name of this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuState::MainMenu => "main_menu",
            MenuState::TrackingIncome => "tracking_income",
            MenuState::TrackingExpenses => "tracking_expenses",
            MenuState::TrackingCapital => "tracking_capital",
            MenuState::TrackingAttendance => "tracking_attendance",
            MenuState::TrackingConfirm => "tracking_confirm",
            MenuState::GoalsMenu => "goals_menu",
            MenuState::ViewGoals => "view_goals",
            MenuState::GoalDetails => "goal_details",
            MenuState::CreateGoalType => "create_goal_type",
            MenuState::CreateGoalDesc => "create_goal_desc",
            MenuState::CreateGoalAmount => "create_goal_amount",
            MenuState::CreateGoalDate => "create_goal_date",
            MenuState::CreateGoalConfirm => "create_goal_confirm",
            MenuState::ContactsMenu => "contacts_menu",
            MenuState::ViewContacts => "view_contacts",
            MenuState::AddContactName => "add_contact_name",
            MenuState::AddContactPhone => "add_contact_phone",
            MenuState::AddContactRelationship => "add_contact_relationship",
            MenuState::AddContactAddress => "add_contact_address",
            MenuState::AddContactPrimary => "add_contact_primary",
            MenuState::AddContactConfirm => "add_contact_confirm",
            MenuState::SelectPrimaryContact => "select_primary_contact",
            MenuState::LanguageSelect => "language_select",
            MenuState::SessionExpired => "session_expired",
        }
    }

    /// Parses a state from its persistence name.
    pub fn parse(s: &str) -> Option<Self> {
        let state = match s {
            "main_menu" => MenuState::MainMenu,
            "tracking_income" => MenuState::TrackingIncome,
            "tracking_expenses" => MenuState::TrackingExpenses,
            "tracking_capital" => MenuState::TrackingCapital,
            "tracking_attendance" => MenuState::TrackingAttendance,
            "tracking_confirm" => MenuState::TrackingConfirm,
            "goals_menu" => MenuState::GoalsMenu,
            "view_goals" => MenuState::ViewGoals,
            "goal_details" => MenuState::GoalDetails,
            "create_goal_type" => MenuState::CreateGoalType,
            "create_goal_desc" => MenuState::CreateGoalDesc,
            "create_goal_amount" => MenuState::CreateGoalAmount,
            "create_goal_date" => MenuState::CreateGoalDate,
            "create_goal_confirm" => MenuState::CreateGoalConfirm,
            "contacts_menu" => MenuState::ContactsMenu,
            "view_contacts" => MenuState::ViewContacts,
            "add_contact_name" => MenuState::AddContactName,
            "add_contact_phone" => MenuState::AddContactPhone,
            "add_contact_relationship" => MenuState::AddContactRelationship,
            "add_contact_address" => MenuState::AddContactAddress,
            "add_contact_primary" => MenuState::AddContactPrimary,
            "add_contact_confirm" => MenuState::AddContactConfirm,
            "select_primary_contact" => MenuState::SelectPrimaryContact,
            "language_select" => MenuState::LanguageSelect,
            "session_expired" => MenuState::SessionExpired,
            _ => return None,
        };
        Some(state)
    }

    /// Returns the flow family this state belongs to, if any.
    pub fn flow_family(&self) -> Option<FlowFamily> {
        match self {
            MenuState::TrackingIncome
            | MenuState::TrackingExpenses
            | MenuState::TrackingCapital
            | MenuState::TrackingAttendance
            | MenuState::TrackingConfirm => Some(FlowFamily::Tracking),

            MenuState::CreateGoalType
            | MenuState::CreateGoalDesc
            | MenuState::CreateGoalAmount
            | MenuState::CreateGoalDate
            | MenuState::CreateGoalConfirm => Some(FlowFamily::GoalCreate),

            MenuState::ViewGoals | MenuState::GoalDetails => Some(FlowFamily::GoalBrowse),

            MenuState::AddContactName
            | MenuState::AddContactPhone
            | MenuState::AddContactRelationship
            | MenuState::AddContactAddress
            | MenuState::AddContactPrimary
            | MenuState::AddContactConfirm => Some(FlowFamily::ContactCreate),

            MenuState::ViewContacts | MenuState::SelectPrimaryContact => {
                Some(FlowFamily::ContactBrowse)
            }

            MenuState::MainMenu
            | MenuState::GoalsMenu
            | MenuState::ContactsMenu
            | MenuState::LanguageSelect
            | MenuState::SessionExpired => None,
        }
    }

    /// Returns all dispatchable states, in menu order.
    pub fn all() -> &'static [MenuState] {
        &[
            MenuState::MainMenu,
            MenuState::TrackingIncome,
            MenuState::TrackingExpenses,
            MenuState::TrackingCapital,
            MenuState::TrackingAttendance,
            MenuState::TrackingConfirm,
            MenuState::GoalsMenu,
            MenuState::ViewGoals,
            MenuState::GoalDetails,
            MenuState::CreateGoalType,
            MenuState::CreateGoalDesc,
            MenuState::CreateGoalAmount,
            MenuState::CreateGoalDate,
            MenuState::CreateGoalConfirm,
            MenuState::ContactsMenu,
            MenuState::ViewContacts,
            MenuState::AddContactName,
            MenuState::AddContactPhone,
            MenuState::AddContactRelationship,
            MenuState::AddContactAddress,
            MenuState::AddContactPrimary,
            MenuState::AddContactConfirm,
            MenuState::SelectPrimaryContact,
            MenuState::LanguageSelect,
            MenuState::SessionExpired,
        ]
    }
}

impl fmt::Display for MenuState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_main_menu() {
        assert_eq!(MenuState::default(), MenuState::MainMenu);
    }

    #[test]
    fn every_state_roundtrips_through_persistence_name() {
        for state in MenuState::all() {
            assert_eq!(MenuState::parse(state.as_str()), Some(*state));
        }
    }

    #[test]
    fn parse_rejects_unknown_name() {
        assert_eq!(MenuState::parse("nonexistent_state"), None);
    }

    #[test]
    fn all_lists_every_state_exactly_once() {
        let states = MenuState::all();
        for (i, a) in states.iter().enumerate() {
            for b in &states[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(states.len(), 25);
    }

    #[test]
    fn tracking_states_share_a_family() {
        assert_eq!(
            MenuState::TrackingIncome.flow_family(),
            Some(FlowFamily::Tracking)
        );
        assert_eq!(
            MenuState::TrackingConfirm.flow_family(),
            Some(FlowFamily::Tracking)
        );
    }

    #[test]
    fn menus_have_no_flow_family() {
        assert_eq!(MenuState::MainMenu.flow_family(), None);
        assert_eq!(MenuState::GoalsMenu.flow_family(), None);
        assert_eq!(MenuState::ContactsMenu.flow_family(), None);
        assert_eq!(MenuState::SessionExpired.flow_family(), None);
    }

    #[test]
    fn browse_and_create_are_distinct_goal_families() {
        assert_eq!(MenuState::ViewGoals.flow_family(), Some(FlowFamily::GoalBrowse));
        assert_eq!(
            MenuState::CreateGoalType.flow_family(),
            Some(FlowFamily::GoalCreate)
        );
    }

    #[test]
    fn serde_name_matches_persistence_name() {
        for state in MenuState::all() {
            let json = serde_json::to_string(state).unwrap();
            assert_eq!(json, format!("\"{}\"", state.as_str()));
        }
    }
}
