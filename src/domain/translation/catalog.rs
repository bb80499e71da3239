//! Bilingual message catalog.
//!
//! A static key x language table built once at startup. The state machine
//! renders exclusively through [`text`]; no user-visible literal lives in
//! handler or renderer code. Unknown keys fall back to the key itself so a
//! missing entry degrades visibly rather than panicking mid-session.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::domain::foundation::Language;

/// Message keys used by the menu engine.
pub mod keys {
    pub const MENU_MAIN: &str = "menu.main";
    pub const MENU_GOALS: &str = "menu.goals";
    pub const MENU_CONTACTS: &str = "menu.contacts";

    pub const NAV_BACK: &str = "nav.back";
    pub const CONFIRM_OPTIONS: &str = "confirm.options";

    pub const TRACKING_INCOME_PROMPT: &str = "tracking.income.prompt";
    pub const TRACKING_EXPENSES_PROMPT: &str = "tracking.expenses.prompt";
    pub const TRACKING_CAPITAL_PROMPT: &str = "tracking.capital.prompt";
    pub const TRACKING_ATTENDANCE_PROMPT: &str = "tracking.attendance.prompt";
    pub const TRACKING_CONFIRM_HEADER: &str = "tracking.confirm.header";
    pub const TRACKING_SUBMITTED: &str = "tracking.submitted";
    pub const TRACKING_LABEL_INCOME: &str = "tracking.label.income";
    pub const TRACKING_LABEL_EXPENSES: &str = "tracking.label.expenses";
    pub const TRACKING_LABEL_CAPITAL: &str = "tracking.label.capital";
    pub const TRACKING_LABEL_ATTENDANCE: &str = "tracking.label.attendance";
    pub const ATTENDANCE_PRESENT: &str = "attendance.present";
    pub const ATTENDANCE_ABSENT: &str = "attendance.absent";

    pub const GOALS_EMPTY: &str = "goals.empty";
    pub const GOALS_LIST_HEADER: &str = "goals.list.header";
    pub const GOAL_TYPE_PROMPT: &str = "goal.type.prompt";
    pub const GOAL_DESC_PROMPT: &str = "goal.desc.prompt";
    pub const GOAL_AMOUNT_PROMPT: &str = "goal.amount.prompt";
    pub const GOAL_DATE_PROMPT: &str = "goal.date.prompt";
    pub const GOAL_CONFIRM_HEADER: &str = "goal.confirm.header";
    pub const GOAL_CREATED: &str = "goal.created";
    pub const GOAL_LABEL_TYPE: &str = "goal.label.type";
    pub const GOAL_LABEL_DESC: &str = "goal.label.desc";
    pub const GOAL_LABEL_AMOUNT: &str = "goal.label.amount";
    pub const GOAL_LABEL_DATE: &str = "goal.label.date";
    pub const GOAL_TYPE_BUSINESS: &str = "goal.type.business";
    pub const GOAL_TYPE_EDUCATION: &str = "goal.type.education";
    pub const GOAL_TYPE_HEALTH: &str = "goal.type.health";
    pub const GOAL_TYPE_HOUSING: &str = "goal.type.housing";
    pub const GOAL_TYPE_OTHER: &str = "goal.type.other";

    pub const CONTACTS_EMPTY: &str = "contacts.empty";
    pub const CONTACTS_LIST_HEADER: &str = "contacts.list.header";
    pub const CONTACTS_SELECT_PRIMARY_HEADER: &str = "contacts.select_primary.header";
    pub const CONTACT_NAME_PROMPT: &str = "contact.name.prompt";
    pub const CONTACT_PHONE_PROMPT: &str = "contact.phone.prompt";
    pub const CONTACT_RELATIONSHIP_PROMPT: &str = "contact.relationship.prompt";
    pub const CONTACT_ADDRESS_PROMPT: &str = "contact.address.prompt";
    pub const CONTACT_PRIMARY_PROMPT: &str = "contact.primary.prompt";
    pub const CONTACT_CONFIRM_HEADER: &str = "contact.confirm.header";
    pub const CONTACT_CREATED: &str = "contact.created";
    pub const CONTACT_PRIMARY_SET: &str = "contact.primary_set";
    pub const CONTACT_LABEL_NAME: &str = "contact.label.name";
    pub const CONTACT_LABEL_PHONE: &str = "contact.label.phone";
    pub const CONTACT_LABEL_RELATIONSHIP: &str = "contact.label.relationship";
    pub const CONTACT_LABEL_ADDRESS: &str = "contact.label.address";
    pub const CONTACT_LABEL_PRIMARY: &str = "contact.label.primary";
    pub const YES: &str = "common.yes";
    pub const NO: &str = "common.no";

    pub const LANGUAGE_PROMPT: &str = "language.prompt";
    pub const LANGUAGE_UPDATED: &str = "language.updated";

    pub const SESSION_EXPIRED: &str = "session.expired";
    pub const EXIT_GOODBYE: &str = "exit.goodbye";

    pub const ERR_INVALID_CHOICE: &str = "error.invalid_choice";
    pub const ERR_INVALID_AMOUNT: &str = "error.invalid_amount";
    pub const ERR_INVALID_DATE: &str = "error.invalid_date";
    pub const ERR_INVALID_PHONE: &str = "error.invalid_phone";
    pub const ERR_EMPTY_TEXT: &str = "error.empty_text";
    pub const ERR_NOT_REGISTERED: &str = "error.not_registered";
    pub const ERR_ROLE_UNSUPPORTED: &str = "error.role_unsupported";
    pub const ERR_SAVE_FAILED: &str = "error.save_failed";
    pub const ERR_SYSTEM: &str = "error.system";
}

/// (key, English, Swahili) rows.
const ENTRIES: &[(&str, &str, &str)] = &[
    (
        keys::MENU_MAIN,
        "Welcome to Tumaini\n1. Weekly tracking\n2. My goals\n3. Emergency contacts\n4. Language\n5. Exit",
        "Karibu Tumaini\n1. Ripoti ya wiki\n2. Malengo yangu\n3. Mawasiliano ya dharura\n4. Lugha\n5. Toka",
    ),
    (
        keys::MENU_GOALS,
        "My goals\n1. View my goals\n2. Create new goal",
        "Malengo yangu\n1. Angalia malengo\n2. Unda lengo jipya",
    ),
    (
        keys::MENU_CONTACTS,
        "Emergency contacts\n1. View contacts\n2. Add contact\n3. Set primary contact",
        "Mawasiliano ya dharura\n1. Angalia mawasiliano\n2. Ongeza mwasiliani\n3. Chagua mwasiliani mkuu",
    ),
    (keys::NAV_BACK, "00. Back", "00. Rudi"),
    (
        keys::CONFIRM_OPTIONS,
        "1. Submit\n2. Edit\n3. Cancel",
        "1. Tuma\n2. Sahihisha\n3. Ghairi",
    ),
    (
        keys::TRACKING_INCOME_PROMPT,
        "Enter income this week (KES):",
        "Weka kipato cha wiki hii (KES):",
    ),
    (
        keys::TRACKING_EXPENSES_PROMPT,
        "Enter expenses this week (KES):",
        "Weka matumizi ya wiki hii (KES):",
    ),
    (
        keys::TRACKING_CAPITAL_PROMPT,
        "Enter current capital (KES):",
        "Weka mtaji wa sasa (KES):",
    ),
    (
        keys::TRACKING_ATTENDANCE_PROMPT,
        "Did you attend the group meeting?\n1. Present\n2. Absent",
        "Je, ulihudhuria mkutano wa kikundi?\n1. Nilihudhuria\n2. Sikuhudhuria",
    ),
    (
        keys::TRACKING_CONFIRM_HEADER,
        "Confirm weekly report:",
        "Thibitisha ripoti ya wiki:",
    ),
    (
        keys::TRACKING_SUBMITTED,
        "Weekly report saved. Thank you!",
        "Ripoti ya wiki imehifadhiwa. Asante!",
    ),
    (keys::TRACKING_LABEL_INCOME, "Income", "Kipato"),
    (keys::TRACKING_LABEL_EXPENSES, "Expenses", "Matumizi"),
    (keys::TRACKING_LABEL_CAPITAL, "Capital", "Mtaji"),
    (keys::TRACKING_LABEL_ATTENDANCE, "Attendance", "Mahudhurio"),
    (keys::ATTENDANCE_PRESENT, "Present", "Nilihudhuria"),
    (keys::ATTENDANCE_ABSENT, "Absent", "Sikuhudhuria"),
    (
        keys::GOALS_EMPTY,
        "You have no goals yet.\n1. Create new goal",
        "Bado huna malengo.\n1. Unda lengo jipya",
    ),
    (keys::GOALS_LIST_HEADER, "Your recent goals:", "Malengo yako ya hivi karibuni:"),
    (
        keys::GOAL_TYPE_PROMPT,
        "Select goal type:\n1. Business\n2. Education\n3. Health\n4. Housing\n5. Other",
        "Chagua aina ya lengo:\n1. Biashara\n2. Elimu\n3. Afya\n4. Makazi\n5. Nyingine",
    ),
    (keys::GOAL_DESC_PROMPT, "Describe your goal:", "Eleza lengo lako:"),
    (
        keys::GOAL_AMOUNT_PROMPT,
        "Enter target amount (KES):",
        "Weka kiasi unacholenga (KES):",
    ),
    (
        keys::GOAL_DATE_PROMPT,
        "Enter target date (YYYY-MM-DD):",
        "Weka tarehe ya lengo (YYYY-MM-DD):",
    ),
    (keys::GOAL_CONFIRM_HEADER, "Confirm new goal:", "Thibitisha lengo jipya:"),
    (keys::GOAL_CREATED, "Goal saved.", "Lengo limehifadhiwa."),
    (keys::GOAL_LABEL_TYPE, "Type", "Aina"),
    (keys::GOAL_LABEL_DESC, "Goal", "Lengo"),
    (keys::GOAL_LABEL_AMOUNT, "Target", "Kiasi"),
    (keys::GOAL_LABEL_DATE, "By", "Ifikapo"),
    (keys::GOAL_TYPE_BUSINESS, "Business", "Biashara"),
    (keys::GOAL_TYPE_EDUCATION, "Education", "Elimu"),
    (keys::GOAL_TYPE_HEALTH, "Health", "Afya"),
    (keys::GOAL_TYPE_HOUSING, "Housing", "Makazi"),
    (keys::GOAL_TYPE_OTHER, "Other", "Nyingine"),
    (
        keys::CONTACTS_EMPTY,
        "You have no contacts yet.\n1. Add contact",
        "Bado huna mawasiliano.\n1. Ongeza mwasiliani",
    ),
    (keys::CONTACTS_LIST_HEADER, "Your contacts:", "Mawasiliano yako:"),
    (
        keys::CONTACTS_SELECT_PRIMARY_HEADER,
        "Choose primary contact:",
        "Chagua mwasiliani mkuu:",
    ),
    (keys::CONTACT_NAME_PROMPT, "Enter contact name:", "Weka jina la mwasiliani:"),
    (
        keys::CONTACT_PHONE_PROMPT,
        "Enter contact phone e.g. 0712345678:",
        "Weka nambari ya simu k.m. 0712345678:",
    ),
    (
        keys::CONTACT_RELATIONSHIP_PROMPT,
        "Relationship to you (e.g. sister):",
        "Uhusiano wenu (k.m. dada):",
    ),
    (keys::CONTACT_ADDRESS_PROMPT, "Enter contact address:", "Weka anwani ya mwasiliani:"),
    (
        keys::CONTACT_PRIMARY_PROMPT,
        "Set as primary contact?\n1. Yes\n2. No",
        "Awe mwasiliani mkuu?\n1. Ndiyo\n2. Hapana",
    ),
    (keys::CONTACT_CONFIRM_HEADER, "Confirm new contact:", "Thibitisha mwasiliani mpya:"),
    (keys::CONTACT_CREATED, "Contact saved.", "Mwasiliani amehifadhiwa."),
    (
        keys::CONTACT_PRIMARY_SET,
        "Primary contact updated.",
        "Mwasiliani mkuu amebadilishwa.",
    ),
    (keys::CONTACT_LABEL_NAME, "Name", "Jina"),
    (keys::CONTACT_LABEL_PHONE, "Phone", "Simu"),
    (keys::CONTACT_LABEL_RELATIONSHIP, "Relationship", "Uhusiano"),
    (keys::CONTACT_LABEL_ADDRESS, "Address", "Anwani"),
    (keys::CONTACT_LABEL_PRIMARY, "Primary", "Mkuu"),
    (keys::YES, "Yes", "Ndiyo"),
    (keys::NO, "No", "Hapana"),
    (
        keys::LANGUAGE_PROMPT,
        "Choose language:\n1. English\n2. Kiswahili",
        "Chagua lugha:\n1. English\n2. Kiswahili",
    ),
    (keys::LANGUAGE_UPDATED, "Language updated.", "Lugha imebadilishwa."),
    (
        keys::SESSION_EXPIRED,
        "Your session expired.\n1. Start again\n2. Exit",
        "Muda wa kikao chako uliisha.\n1. Anza upya\n2. Toka",
    ),
    (
        keys::EXIT_GOODBYE,
        "Thank you for using Tumaini. Goodbye.",
        "Asante kwa kutumia Tumaini. Kwaheri.",
    ),
    (
        keys::ERR_INVALID_CHOICE,
        "Invalid choice, try again.",
        "Chaguo si sahihi, jaribu tena.",
    ),
    (
        keys::ERR_INVALID_AMOUNT,
        "Enter a valid amount of 0 or more.",
        "Weka kiasi sahihi cha 0 au zaidi.",
    ),
    (
        keys::ERR_INVALID_DATE,
        "Enter a valid date as YYYY-MM-DD.",
        "Weka tarehe sahihi kama YYYY-MM-DD.",
    ),
    (
        keys::ERR_INVALID_PHONE,
        "Enter a valid mobile number e.g. 0712345678.",
        "Weka nambari sahihi ya simu k.m. 0712345678.",
    ),
    (
        keys::ERR_EMPTY_TEXT,
        "Entry cannot be empty, try again.",
        "Huwezi kuacha wazi, jaribu tena.",
    ),
    (
        keys::ERR_NOT_REGISTERED,
        "Your number is not registered. Please contact Tumaini support.",
        "Nambari yako haijasajiliwa. Tafadhali wasiliana na Tumaini.",
    ),
    (
        keys::ERR_ROLE_UNSUPPORTED,
        "This service is available to beneficiaries only.",
        "Huduma hii inapatikana kwa wanufaika pekee.",
    ),
    (
        keys::ERR_SAVE_FAILED,
        "We could not save your entry. Please try again later.",
        "Hatukuweza kuhifadhi. Tafadhali jaribu tena baadaye.",
    ),
    (
        keys::ERR_SYSTEM,
        "Something went wrong. Please try again later.",
        "Hitilafu imetokea. Tafadhali jaribu tena baadaye.",
    ),
];

static TABLE: Lazy<HashMap<&'static str, (&'static str, &'static str)>> =
    Lazy::new(|| ENTRIES.iter().map(|(k, en, sw)| (*k, (*en, *sw))).collect());

/// Looks up a message by key and language.
///
/// Falls back to the raw key when no entry exists, so a typo in a key shows
/// up in the rendered menu instead of crashing the turn.
pub fn text(key: &str, language: Language) -> String {
    match TABLE.get(key) {
        Some((en, sw)) => match language {
            Language::English => (*en).to_string(),
            Language::Swahili => (*sw).to_string(),
        },
        None => key.to_string(),
    }
}

/// Composes the English and Swahili renderings of a key, for terminal
/// messages sent before the caller's language is known.
pub fn bilingual(key: &str) -> String {
    format!(
        "{}\n{}",
        text(key, Language::English),
        text(key, Language::Swahili)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_returns_english_entry() {
        let msg = text(keys::EXIT_GOODBYE, Language::English);
        assert_eq!(msg, "Thank you for using Tumaini. Goodbye.");
    }

    #[test]
    fn text_returns_swahili_entry() {
        let msg = text(keys::EXIT_GOODBYE, Language::Swahili);
        assert_eq!(msg, "Asante kwa kutumia Tumaini. Kwaheri.");
    }

    #[test]
    fn text_falls_back_to_key_when_missing() {
        assert_eq!(text("no.such.key", Language::English), "no.such.key");
        assert_eq!(text("no.such.key", Language::Swahili), "no.such.key");
    }

    #[test]
    fn bilingual_joins_both_languages() {
        let msg = bilingual(keys::ERR_NOT_REGISTERED);
        assert!(msg.contains("not registered"));
        assert!(msg.contains("haijasajiliwa"));
    }

    #[test]
    fn every_entry_has_both_translations() {
        for (key, en, sw) in ENTRIES {
            assert!(!en.is_empty(), "missing English for {}", key);
            assert!(!sw.is_empty(), "missing Swahili for {}", key);
        }
    }

    #[test]
    fn entries_have_no_duplicate_keys() {
        assert_eq!(TABLE.len(), ENTRIES.len());
    }

    #[test]
    fn main_menu_lists_five_options() {
        let menu = text(keys::MENU_MAIN, Language::English);
        assert_eq!(menu.lines().count(), 6); // header + 5 options
    }
}
