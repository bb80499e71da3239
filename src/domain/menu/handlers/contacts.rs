//! Handlers for the emergency-contacts flow.
//!
//! Mirrors the goals flow shape: a browse path, a multi-field create path,
//! and a primary-designation path over the cached contact list.

use crate::domain::foundation::PhoneNumber;
use crate::domain::menu::engine::{EffectRequest, StepOutcome};
use crate::domain::menu::input::clean_text;
use crate::domain::session::{ActiveFlow, ContactDraft, MenuState, UssdSession};
use crate::domain::translation::keys;

fn draft_mut(session: &mut UssdSession) -> &mut ContactDraft {
    if !matches!(session.active_flow(), ActiveFlow::ContactCreate(_)) {
        session.begin_flow(ActiveFlow::ContactCreate(ContactDraft::default()));
    }
    match session.active_flow_mut() {
        ActiveFlow::ContactCreate(draft) => draft,
        _ => unreachable!("contact draft was just installed"),
    }
}

pub(crate) fn handle_contacts_menu(session: &mut UssdSession, input: &str) -> StepOutcome {
    match input {
        "1" => StepOutcome::Effect(EffectRequest::LoadContactsForView),
        "2" => {
            session.begin_flow(ActiveFlow::ContactCreate(ContactDraft::default()));
            session.transition_to(MenuState::AddContactName);
            StepOutcome::render()
        }
        "3" => StepOutcome::Effect(EffectRequest::LoadContactsForPrimary),
        _ => StepOutcome::reject(keys::ERR_INVALID_CHOICE),
    }
}

pub(crate) fn handle_view_contacts(session: &mut UssdSession, input: &str) -> StepOutcome {
    let is_empty = match session.active_flow() {
        ActiveFlow::ContactBrowse(browse) => browse.contacts.is_empty(),
        _ => return StepOutcome::Effect(EffectRequest::LoadContactsForView),
    };

    if is_empty {
        return match input {
            "1" => {
                session.begin_flow(ActiveFlow::ContactCreate(ContactDraft::default()));
                session.transition_to(MenuState::AddContactName);
                StepOutcome::render()
            }
            _ => StepOutcome::reject(keys::ERR_INVALID_CHOICE),
        };
    }

    // The list is read-only; any input returns to the contacts menu.
    session.transition_to(MenuState::ContactsMenu);
    StepOutcome::render()
}

pub(crate) fn handle_name(session: &mut UssdSession, input: &str) -> StepOutcome {
    match clean_text(input) {
        Some(name) => {
            draft_mut(session).name = Some(name);
            session.transition_to(MenuState::AddContactPhone);
            StepOutcome::render()
        }
        None => StepOutcome::reject(keys::ERR_EMPTY_TEXT),
    }
}

pub(crate) fn handle_phone(session: &mut UssdSession, input: &str) -> StepOutcome {
    match PhoneNumber::new(input) {
        Ok(phone) => {
            draft_mut(session).phone = Some(phone);
            session.transition_to(MenuState::AddContactRelationship);
            StepOutcome::render()
        }
        Err(_) => StepOutcome::reject(keys::ERR_INVALID_PHONE),
    }
}

pub(crate) fn handle_relationship(session: &mut UssdSession, input: &str) -> StepOutcome {
    match clean_text(input) {
        Some(relationship) => {
            draft_mut(session).relationship = Some(relationship);
            session.transition_to(MenuState::AddContactAddress);
            StepOutcome::render()
        }
        None => StepOutcome::reject(keys::ERR_EMPTY_TEXT),
    }
}

pub(crate) fn handle_address(session: &mut UssdSession, input: &str) -> StepOutcome {
    match clean_text(input) {
        Some(address) => {
            draft_mut(session).address = Some(address);
            session.transition_to(MenuState::AddContactPrimary);
            StepOutcome::render()
        }
        None => StepOutcome::reject(keys::ERR_EMPTY_TEXT),
    }
}

pub(crate) fn handle_primary(session: &mut UssdSession, input: &str) -> StepOutcome {
    let is_primary = match input {
        "1" => true,
        "2" => false,
        _ => return StepOutcome::reject(keys::ERR_INVALID_CHOICE),
    };
    draft_mut(session).is_primary = Some(is_primary);
    session.transition_to(MenuState::AddContactConfirm);
    StepOutcome::render()
}

pub(crate) fn handle_confirm(session: &mut UssdSession, input: &str) -> StepOutcome {
    match input {
        "1" => StepOutcome::Effect(EffectRequest::SubmitContact),
        "2" => {
            session.transition_to(MenuState::AddContactName);
            StepOutcome::render()
        }
        "3" => {
            session.clear_flow();
            session.transition_to(MenuState::ContactsMenu);
            StepOutcome::render()
        }
        _ => StepOutcome::reject(keys::ERR_INVALID_CHOICE),
    }
}

pub(crate) fn handle_select_primary(session: &mut UssdSession, input: &str) -> StepOutcome {
    let contacts = match session.active_flow() {
        ActiveFlow::ContactBrowse(browse) => browse.contacts.clone(),
        _ => return StepOutcome::Effect(EffectRequest::LoadContactsForPrimary),
    };

    match input.parse::<usize>() {
        Ok(choice) if (1..=contacts.len()).contains(&choice) => {
            let contact_id = contacts[choice - 1].id;
            StepOutcome::Effect(EffectRequest::SetPrimaryContact { contact_id })
        }
        _ => StepOutcome::reject(keys::ERR_INVALID_CHOICE),
    }
}
