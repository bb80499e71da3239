//! The state dispatcher.
//!
//! One handler per state, paired with the renderers in [`super::render`].
//! Handlers are pure transformations of the session value; collaborator
//! calls are returned as [`EffectRequest`] data and executed by the
//! application layer, which also performs the single persistence write per
//! turn.

use crate::domain::foundation::{ContactId, Language};
use crate::domain::session::{MenuState, UssdSession};

use super::handlers::{contacts, goals, language, root, tracking};
use super::input::BACK_SENTINEL;

/// A collaborator call a handler wants executed before the next render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectRequest {
    /// Fetch recent goals and enter the browse list.
    LoadGoals,
    /// Create the accumulated goal draft.
    SubmitGoal,
    /// Fetch recent contacts and enter the browse list.
    LoadContactsForView,
    /// Fetch recent contacts and enter primary selection.
    LoadContactsForPrimary,
    /// Create the accumulated contact draft.
    SubmitContact,
    /// Designate an existing contact as primary.
    SetPrimaryContact { contact_id: ContactId },
    /// Submit the accumulated weekly tracking draft.
    SubmitTracking,
    /// Persist a new language preference and re-render the main menu.
    ChangeLanguage(Language),
}

/// Result of dispatching one input token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Render the session's (possibly updated) current state. A notice key,
    /// when present, is prefixed as an inline line; rejected input keeps the
    /// state and draft untouched and carries the error key here.
    Render { notice: Option<&'static str> },
    /// Execute a collaborator call, then render.
    Effect(EffectRequest),
    /// Terminate the session with a localized message.
    End { message_key: &'static str },
}

impl StepOutcome {
    /// Plain re-render of the current state.
    pub fn render() -> Self {
        StepOutcome::Render { notice: None }
    }

    /// Re-render of the current state with an inline error; the handler must
    /// not have advanced the state or touched the draft.
    pub fn reject(error_key: &'static str) -> Self {
        StepOutcome::Render { notice: Some(error_key) }
    }
}

/// Processes one isolated input token against the session's state.
///
/// Pre-dispatch rules, in order:
/// 1. A session start always renders the main menu, whatever was stored.
/// 2. The back sentinel pops the single-slot previous state (defaulting to
///    the main menu) and re-renders it without entry side effects.
/// 3. Otherwise the incoming state is copied into the back slot, the input
///    is appended to the diagnostic trail, and the state's handler runs.
///
/// Identity and role gating happen in the application layer before this is
/// called; by the time we dispatch, the caller is a known beneficiary.
pub fn step(session: &mut UssdSession, input: &str, is_session_start: bool) -> StepOutcome {
    if is_session_start {
        session.transition_to(MenuState::MainMenu);
        return StepOutcome::render();
    }

    session.push_input(input);

    if input == BACK_SENTINEL {
        let target = session.take_previous_state();
        session.transition_to(target);
        return StepOutcome::render();
    }

    session.remember_previous();
    dispatch(session, input)
}

/// The state-to-handler table, exhaustive over every dispatchable state.
fn dispatch(session: &mut UssdSession, input: &str) -> StepOutcome {
    match session.menu_state() {
        MenuState::MainMenu => root::handle_main_menu(session, input),
        MenuState::SessionExpired => root::handle_session_expired(session, input),

        MenuState::TrackingIncome => tracking::handle_income(session, input),
        MenuState::TrackingExpenses => tracking::handle_expenses(session, input),
        MenuState::TrackingCapital => tracking::handle_capital(session, input),
        MenuState::TrackingAttendance => tracking::handle_attendance(session, input),
        MenuState::TrackingConfirm => tracking::handle_confirm(session, input),

        MenuState::GoalsMenu => goals::handle_goals_menu(session, input),
        MenuState::ViewGoals => goals::handle_view_goals(session, input),
        MenuState::GoalDetails => goals::handle_goal_details(session, input),
        MenuState::CreateGoalType => goals::handle_create_type(session, input),
        MenuState::CreateGoalDesc => goals::handle_create_desc(session, input),
        MenuState::CreateGoalAmount => goals::handle_create_amount(session, input),
        MenuState::CreateGoalDate => goals::handle_create_date(session, input),
        MenuState::CreateGoalConfirm => goals::handle_create_confirm(session, input),

        MenuState::ContactsMenu => contacts::handle_contacts_menu(session, input),
        MenuState::ViewContacts => contacts::handle_view_contacts(session, input),
        MenuState::AddContactName => contacts::handle_name(session, input),
        MenuState::AddContactPhone => contacts::handle_phone(session, input),
        MenuState::AddContactRelationship => contacts::handle_relationship(session, input),
        MenuState::AddContactAddress => contacts::handle_address(session, input),
        MenuState::AddContactPrimary => contacts::handle_primary(session, input),
        MenuState::AddContactConfirm => contacts::handle_confirm(session, input),
        MenuState::SelectPrimaryContact => contacts::handle_select_primary(session, input),

        MenuState::LanguageSelect => language::handle_language_select(session, input),
    }
}
