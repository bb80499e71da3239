//! Handlers for the goals flow: browsing recent goals and creating new ones.

use crate::domain::menu::engine::{EffectRequest, StepOutcome};
use crate::domain::menu::input::{clean_text, parse_amount, parse_iso_date};
use crate::domain::records::GoalType;
use crate::domain::session::{ActiveFlow, GoalDraft, MenuState, UssdSession};
use crate::domain::translation::keys;

fn draft_mut(session: &mut UssdSession) -> &mut GoalDraft {
    if !matches!(session.active_flow(), ActiveFlow::GoalCreate(_)) {
        session.begin_flow(ActiveFlow::GoalCreate(GoalDraft::default()));
    }
    match session.active_flow_mut() {
        ActiveFlow::GoalCreate(draft) => draft,
        _ => unreachable!("goal draft was just installed"),
    }
}

pub(crate) fn handle_goals_menu(session: &mut UssdSession, input: &str) -> StepOutcome {
    match input {
        "1" => StepOutcome::Effect(EffectRequest::LoadGoals),
        "2" => {
            session.begin_flow(ActiveFlow::GoalCreate(GoalDraft::default()));
            session.transition_to(MenuState::CreateGoalType);
            StepOutcome::render()
        }
        _ => StepOutcome::reject(keys::ERR_INVALID_CHOICE),
    }
}

pub(crate) fn handle_view_goals(session: &mut UssdSession, input: &str) -> StepOutcome {
    let browse = match session.active_flow() {
        ActiveFlow::GoalBrowse(browse) => browse.clone(),
        // Cache lost (e.g. row reconstructed mid-flow): reload the list.
        _ => return StepOutcome::Effect(EffectRequest::LoadGoals),
    };

    if browse.goals.is_empty() {
        return match input {
            "1" => {
                session.begin_flow(ActiveFlow::GoalCreate(GoalDraft::default()));
                session.transition_to(MenuState::CreateGoalType);
                StepOutcome::render()
            }
            _ => StepOutcome::reject(keys::ERR_INVALID_CHOICE),
        };
    }

    match input.parse::<usize>() {
        Ok(choice) if (1..=browse.goals.len()).contains(&choice) => {
            match session.active_flow_mut() {
                ActiveFlow::GoalBrowse(b) => b.selected = Some(choice - 1),
                _ => unreachable!("browse cache checked above"),
            }
            session.transition_to(MenuState::GoalDetails);
            StepOutcome::render()
        }
        _ => StepOutcome::reject(keys::ERR_INVALID_CHOICE),
    }
}

pub(crate) fn handle_goal_details(session: &mut UssdSession, _input: &str) -> StepOutcome {
    // Details is a read-only leaf; any input returns to the goals menu.
    session.transition_to(MenuState::GoalsMenu);
    StepOutcome::render()
}

pub(crate) fn handle_create_type(session: &mut UssdSession, input: &str) -> StepOutcome {
    match GoalType::from_choice(input) {
        Some(goal_type) => {
            draft_mut(session).goal_type = Some(goal_type);
            session.transition_to(MenuState::CreateGoalDesc);
            StepOutcome::render()
        }
        None => StepOutcome::reject(keys::ERR_INVALID_CHOICE),
    }
}

pub(crate) fn handle_create_desc(session: &mut UssdSession, input: &str) -> StepOutcome {
    match clean_text(input) {
        Some(description) => {
            draft_mut(session).description = Some(description);
            session.transition_to(MenuState::CreateGoalAmount);
            StepOutcome::render()
        }
        None => StepOutcome::reject(keys::ERR_EMPTY_TEXT),
    }
}

pub(crate) fn handle_create_amount(session: &mut UssdSession, input: &str) -> StepOutcome {
    match parse_amount(input) {
        Some(amount) => {
            draft_mut(session).target_amount = Some(amount);
            session.transition_to(MenuState::CreateGoalDate);
            StepOutcome::render()
        }
        None => StepOutcome::reject(keys::ERR_INVALID_AMOUNT),
    }
}

pub(crate) fn handle_create_date(session: &mut UssdSession, input: &str) -> StepOutcome {
    match parse_iso_date(input) {
        Some(date) => {
            draft_mut(session).target_date = Some(date);
            session.transition_to(MenuState::CreateGoalConfirm);
            StepOutcome::render()
        }
        None => StepOutcome::reject(keys::ERR_INVALID_DATE),
    }
}

pub(crate) fn handle_create_confirm(session: &mut UssdSession, input: &str) -> StepOutcome {
    match input {
        "1" => StepOutcome::Effect(EffectRequest::SubmitGoal),
        "2" => {
            session.transition_to(MenuState::CreateGoalType);
            StepOutcome::render()
        }
        "3" => {
            session.clear_flow();
            session.transition_to(MenuState::GoalsMenu);
            StepOutcome::render()
        }
        _ => StepOutcome::reject(keys::ERR_INVALID_CHOICE),
    }
}
