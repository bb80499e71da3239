//! Handlers for the weekly tracking flow.
//!
//! Three numeric steps, one attendance choice, then a confirm/edit/cancel
//! gate. Rejected input never touches the draft.

use crate::domain::menu::engine::{EffectRequest, StepOutcome};
use crate::domain::menu::input::parse_amount;
use crate::domain::records::Attendance;
use crate::domain::session::{ActiveFlow, MenuState, TrackingDraft, UssdSession};
use crate::domain::translation::keys;

fn draft_mut(session: &mut UssdSession) -> &mut TrackingDraft {
    if !matches!(session.active_flow(), ActiveFlow::Tracking(_)) {
        session.begin_flow(ActiveFlow::Tracking(TrackingDraft::default()));
    }
    match session.active_flow_mut() {
        ActiveFlow::Tracking(draft) => draft,
        _ => unreachable!("tracking draft was just installed"),
    }
}

pub(crate) fn handle_income(session: &mut UssdSession, input: &str) -> StepOutcome {
    match parse_amount(input) {
        Some(amount) => {
            draft_mut(session).income_this_week = Some(amount);
            session.transition_to(MenuState::TrackingExpenses);
            StepOutcome::render()
        }
        None => StepOutcome::reject(keys::ERR_INVALID_AMOUNT),
    }
}

pub(crate) fn handle_expenses(session: &mut UssdSession, input: &str) -> StepOutcome {
    match parse_amount(input) {
        Some(amount) => {
            draft_mut(session).expenses_this_week = Some(amount);
            session.transition_to(MenuState::TrackingCapital);
            StepOutcome::render()
        }
        None => StepOutcome::reject(keys::ERR_INVALID_AMOUNT),
    }
}

pub(crate) fn handle_capital(session: &mut UssdSession, input: &str) -> StepOutcome {
    match parse_amount(input) {
        Some(amount) => {
            draft_mut(session).current_capital = Some(amount);
            session.transition_to(MenuState::TrackingAttendance);
            StepOutcome::render()
        }
        None => StepOutcome::reject(keys::ERR_INVALID_AMOUNT),
    }
}

pub(crate) fn handle_attendance(session: &mut UssdSession, input: &str) -> StepOutcome {
    match Attendance::from_choice(input) {
        Some(attendance) => {
            draft_mut(session).attendance = Some(attendance);
            session.transition_to(MenuState::TrackingConfirm);
            StepOutcome::render()
        }
        None => StepOutcome::reject(keys::ERR_INVALID_CHOICE),
    }
}

pub(crate) fn handle_confirm(session: &mut UssdSession, input: &str) -> StepOutcome {
    match input {
        "1" => StepOutcome::Effect(EffectRequest::SubmitTracking),
        "2" => {
            // Edit restarts the flow without clearing the draft.
            session.transition_to(MenuState::TrackingIncome);
            StepOutcome::render()
        }
        "3" => {
            session.clear_flow();
            session.transition_to(MenuState::MainMenu);
            StepOutcome::render()
        }
        _ => StepOutcome::reject(keys::ERR_INVALID_CHOICE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{PhoneNumber, Timestamp};

    fn tracking_session(state: MenuState) -> UssdSession {
        let mut session = UssdSession::start(
            "ATUid_tracking",
            PhoneNumber::new("0712345678").unwrap(),
            None,
            Timestamp::from_unix_secs(1_000),
            180,
        );
        session.begin_flow(ActiveFlow::Tracking(TrackingDraft::default()));
        session.transition_to(state);
        session
    }

    fn draft(session: &UssdSession) -> &TrackingDraft {
        match session.active_flow() {
            ActiveFlow::Tracking(draft) => draft,
            other => panic!("expected tracking draft, got {:?}", other),
        }
    }

    #[test]
    fn valid_income_advances_to_expenses() {
        let mut session = tracking_session(MenuState::TrackingIncome);
        let outcome = handle_income(&mut session, "10000");
        assert_eq!(outcome, StepOutcome::render());
        assert_eq!(session.menu_state(), MenuState::TrackingExpenses);
        assert_eq!(draft(&session).income_this_week, Some(10_000));
    }

    #[test]
    fn negative_income_rejects_without_advancing() {
        let mut session = tracking_session(MenuState::TrackingIncome);
        let outcome = handle_income(&mut session, "-5");
        assert_eq!(outcome, StepOutcome::reject(keys::ERR_INVALID_AMOUNT));
        assert_eq!(session.menu_state(), MenuState::TrackingIncome);
        assert_eq!(draft(&session).income_this_week, None);
    }

    #[test]
    fn non_numeric_capital_rejects() {
        let mut session = tracking_session(MenuState::TrackingCapital);
        let outcome = handle_capital(&mut session, "lots");
        assert_eq!(outcome, StepOutcome::reject(keys::ERR_INVALID_AMOUNT));
        assert_eq!(draft(&session).current_capital, None);
    }

    #[test]
    fn attendance_choice_maps_to_enum() {
        let mut session = tracking_session(MenuState::TrackingAttendance);
        handle_attendance(&mut session, "1");
        assert_eq!(draft(&session).attendance, Some(Attendance::Present));
        assert_eq!(session.menu_state(), MenuState::TrackingConfirm);
    }

    #[test]
    fn attendance_out_of_range_rejects() {
        let mut session = tracking_session(MenuState::TrackingAttendance);
        let outcome = handle_attendance(&mut session, "3");
        assert_eq!(outcome, StepOutcome::reject(keys::ERR_INVALID_CHOICE));
        assert_eq!(session.menu_state(), MenuState::TrackingAttendance);
    }

    #[test]
    fn confirm_submit_requests_the_effect() {
        let mut session = tracking_session(MenuState::TrackingConfirm);
        let outcome = handle_confirm(&mut session, "1");
        assert_eq!(outcome, StepOutcome::Effect(EffectRequest::SubmitTracking));
    }

    #[test]
    fn confirm_edit_restarts_keeping_draft() {
        let mut session = tracking_session(MenuState::TrackingConfirm);
        match session.active_flow_mut() {
            ActiveFlow::Tracking(d) => d.income_this_week = Some(700),
            _ => unreachable!(),
        }
        handle_confirm(&mut session, "2");
        assert_eq!(session.menu_state(), MenuState::TrackingIncome);
        assert_eq!(draft(&session).income_this_week, Some(700));
    }

    #[test]
    fn confirm_cancel_clears_draft_and_returns_home() {
        let mut session = tracking_session(MenuState::TrackingConfirm);
        handle_confirm(&mut session, "3");
        assert_eq!(session.menu_state(), MenuState::MainMenu);
        assert_eq!(session.active_flow(), &ActiveFlow::Idle);
    }
}
