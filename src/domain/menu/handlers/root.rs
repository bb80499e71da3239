//! Handlers for the root menu and the reserved expired state.

use crate::domain::menu::engine::StepOutcome;
use crate::domain::session::{ActiveFlow, MenuState, TrackingDraft, UssdSession};
use crate::domain::translation::keys;

/// Branches from the main menu into the sub-machines.
pub(crate) fn handle_main_menu(session: &mut UssdSession, input: &str) -> StepOutcome {
    match input {
        "1" => {
            session.begin_flow(ActiveFlow::Tracking(TrackingDraft::default()));
            session.transition_to(MenuState::TrackingIncome);
            StepOutcome::render()
        }
        "2" => {
            session.transition_to(MenuState::GoalsMenu);
            StepOutcome::render()
        }
        "3" => {
            session.transition_to(MenuState::ContactsMenu);
            StepOutcome::render()
        }
        "4" => {
            session.transition_to(MenuState::LanguageSelect);
            StepOutcome::render()
        }
        "5" => StepOutcome::End { message_key: keys::EXIT_GOODBYE },
        _ => StepOutcome::reject(keys::ERR_INVALID_CHOICE),
    }
}

/// Offers a fresh start after the previous session generation expired.
pub(crate) fn handle_session_expired(session: &mut UssdSession, input: &str) -> StepOutcome {
    match input {
        "1" => {
            session.clear_flow();
            session.transition_to(MenuState::MainMenu);
            StepOutcome::render()
        }
        "2" => StepOutcome::End { message_key: keys::EXIT_GOODBYE },
        _ => StepOutcome::reject(keys::ERR_INVALID_CHOICE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{PhoneNumber, Timestamp};

    fn test_session() -> UssdSession {
        UssdSession::start(
            "ATUid_root",
            PhoneNumber::new("0712345678").unwrap(),
            None,
            Timestamp::from_unix_secs(1_000),
            180,
        )
    }

    #[test]
    fn choice_one_starts_tracking_with_empty_draft() {
        let mut session = test_session();
        let outcome = handle_main_menu(&mut session, "1");
        assert_eq!(outcome, StepOutcome::render());
        assert_eq!(session.menu_state(), MenuState::TrackingIncome);
        assert_eq!(
            session.active_flow(),
            &ActiveFlow::Tracking(TrackingDraft::default())
        );
    }

    #[test]
    fn choice_four_enters_language_select() {
        let mut session = test_session();
        handle_main_menu(&mut session, "4");
        assert_eq!(session.menu_state(), MenuState::LanguageSelect);
    }

    #[test]
    fn unknown_choice_is_rejected_without_moving() {
        let mut session = test_session();
        let outcome = handle_main_menu(&mut session, "7");
        assert_eq!(outcome, StepOutcome::reject(keys::ERR_INVALID_CHOICE));
        assert_eq!(session.menu_state(), MenuState::MainMenu);
    }

    #[test]
    fn expired_restart_returns_to_main_menu() {
        let mut session = test_session();
        session.transition_to(MenuState::SessionExpired);
        let outcome = handle_session_expired(&mut session, "1");
        assert_eq!(outcome, StepOutcome::render());
        assert_eq!(session.menu_state(), MenuState::MainMenu);
    }

    #[test]
    fn expired_exit_terminates() {
        let mut session = test_session();
        session.transition_to(MenuState::SessionExpired);
        let outcome = handle_session_expired(&mut session, "2");
        assert_eq!(outcome, StepOutcome::End { message_key: keys::EXIT_GOODBYE });
    }
}
