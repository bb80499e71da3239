//! Handler for the language-select flow.

use crate::domain::foundation::Language;
use crate::domain::menu::engine::{EffectRequest, StepOutcome};
use crate::domain::session::UssdSession;
use crate::domain::translation::keys;

pub(crate) fn handle_language_select(_session: &mut UssdSession, input: &str) -> StepOutcome {
    let language = match input {
        "1" => Language::English,
        "2" => Language::Swahili,
        _ => return StepOutcome::reject(keys::ERR_INVALID_CHOICE),
    };
    // Persisting the preference is a collaborator call; the session's own
    // language switches once that succeeds.
    StepOutcome::Effect(EffectRequest::ChangeLanguage(language))
}
