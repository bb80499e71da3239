//! Pure renderers, one per menu state.
//!
//! Rendering is a function of session state and language only; invoking a
//! renderer twice without mutation yields identical text. All wording comes
//! from the translation catalog.

use crate::domain::records::{Attendance, ContactSummary, GoalSummary, GoalType};
use crate::domain::session::{ActiveFlow, MenuState, UssdSession};
use crate::domain::translation::{keys, text};

use crate::domain::foundation::Language;

/// Renders the prompt for a menu state.
pub fn render(state: MenuState, session: &UssdSession) -> String {
    let lang = session.language();
    match state {
        MenuState::MainMenu => text(keys::MENU_MAIN, lang),

        MenuState::TrackingIncome => text(keys::TRACKING_INCOME_PROMPT, lang),
        MenuState::TrackingExpenses => text(keys::TRACKING_EXPENSES_PROMPT, lang),
        MenuState::TrackingCapital => text(keys::TRACKING_CAPITAL_PROMPT, lang),
        MenuState::TrackingAttendance => text(keys::TRACKING_ATTENDANCE_PROMPT, lang),
        MenuState::TrackingConfirm => render_tracking_confirm(session),

        MenuState::GoalsMenu => with_back(text(keys::MENU_GOALS, lang), lang),
        MenuState::ViewGoals => render_goal_list(session),
        MenuState::GoalDetails => render_goal_details(session),
        MenuState::CreateGoalType => text(keys::GOAL_TYPE_PROMPT, lang),
        MenuState::CreateGoalDesc => text(keys::GOAL_DESC_PROMPT, lang),
        MenuState::CreateGoalAmount => text(keys::GOAL_AMOUNT_PROMPT, lang),
        MenuState::CreateGoalDate => text(keys::GOAL_DATE_PROMPT, lang),
        MenuState::CreateGoalConfirm => render_goal_confirm(session),

        MenuState::ContactsMenu => with_back(text(keys::MENU_CONTACTS, lang), lang),
        MenuState::ViewContacts => render_contact_list(session),
        MenuState::AddContactName => text(keys::CONTACT_NAME_PROMPT, lang),
        MenuState::AddContactPhone => text(keys::CONTACT_PHONE_PROMPT, lang),
        MenuState::AddContactRelationship => text(keys::CONTACT_RELATIONSHIP_PROMPT, lang),
        MenuState::AddContactAddress => text(keys::CONTACT_ADDRESS_PROMPT, lang),
        MenuState::AddContactPrimary => text(keys::CONTACT_PRIMARY_PROMPT, lang),
        MenuState::AddContactConfirm => render_contact_confirm(session),
        MenuState::SelectPrimaryContact => render_select_primary(session),

        MenuState::LanguageSelect => with_back(text(keys::LANGUAGE_PROMPT, lang), lang),

        MenuState::SessionExpired => text(keys::SESSION_EXPIRED, lang),
    }
}

/// Returns the catalog key for a goal type label.
pub fn goal_type_key(goal_type: GoalType) -> &'static str {
    match goal_type {
        GoalType::Business => keys::GOAL_TYPE_BUSINESS,
        GoalType::Education => keys::GOAL_TYPE_EDUCATION,
        GoalType::Health => keys::GOAL_TYPE_HEALTH,
        GoalType::Housing => keys::GOAL_TYPE_HOUSING,
        GoalType::Other => keys::GOAL_TYPE_OTHER,
    }
}

/// Returns the catalog key for an attendance label.
pub fn attendance_key(attendance: Attendance) -> &'static str {
    match attendance {
        Attendance::Present => keys::ATTENDANCE_PRESENT,
        Attendance::Absent => keys::ATTENDANCE_ABSENT,
    }
}

fn with_back(body: String, lang: Language) -> String {
    format!("{}\n{}", body, text(keys::NAV_BACK, lang))
}

fn amount_line(label_key: &str, amount: Option<i64>, lang: Language) -> String {
    match amount {
        Some(value) => format!("{}: KES {}", text(label_key, lang), value),
        None => format!("{}: -", text(label_key, lang)),
    }
}

fn render_tracking_confirm(session: &UssdSession) -> String {
    let lang = session.language();
    let draft = match session.active_flow() {
        ActiveFlow::Tracking(draft) => draft.clone(),
        _ => Default::default(),
    };
    let attendance = match draft.attendance {
        Some(a) => text(attendance_key(a), lang),
        None => "-".to_string(),
    };
    format!(
        "{}\n{}\n{}\n{}\n{}: {}\n{}",
        text(keys::TRACKING_CONFIRM_HEADER, lang),
        amount_line(keys::TRACKING_LABEL_INCOME, draft.income_this_week, lang),
        amount_line(keys::TRACKING_LABEL_EXPENSES, draft.expenses_this_week, lang),
        amount_line(keys::TRACKING_LABEL_CAPITAL, draft.current_capital, lang),
        text(keys::TRACKING_LABEL_ATTENDANCE, lang),
        attendance,
        text(keys::CONFIRM_OPTIONS, lang),
    )
}

fn goal_line(index: usize, goal: &GoalSummary) -> String {
    format!("{}. {} (KES {})", index + 1, goal.description, goal.target_amount)
}

fn render_goal_list(session: &UssdSession) -> String {
    let lang = session.language();
    let goals = match session.active_flow() {
        ActiveFlow::GoalBrowse(browse) => browse.goals.as_slice(),
        _ => &[],
    };
    if goals.is_empty() {
        return with_back(text(keys::GOALS_EMPTY, lang), lang);
    }
    let mut lines = vec![text(keys::GOALS_LIST_HEADER, lang)];
    lines.extend(goals.iter().enumerate().map(|(i, g)| goal_line(i, g)));
    lines.push(text(keys::NAV_BACK, lang));
    lines.join("\n")
}

fn render_goal_details(session: &UssdSession) -> String {
    let lang = session.language();
    let selected = match session.active_flow() {
        ActiveFlow::GoalBrowse(browse) => browse.selected_goal(),
        _ => None,
    };
    match selected {
        Some(goal) => format!(
            "{}: {}\n{}: {}\n{}: KES {}\n{}: {}\n{}",
            text(keys::GOAL_LABEL_TYPE, lang),
            text(goal_type_key(goal.goal_type), lang),
            text(keys::GOAL_LABEL_DESC, lang),
            goal.description,
            text(keys::GOAL_LABEL_AMOUNT, lang),
            goal.target_amount,
            text(keys::GOAL_LABEL_DATE, lang),
            goal.target_date,
            text(keys::NAV_BACK, lang),
        ),
        // Nothing selected: fall back to the list so the turn still renders.
        None => render_goal_list(session),
    }
}

fn render_goal_confirm(session: &UssdSession) -> String {
    let lang = session.language();
    let draft = match session.active_flow() {
        ActiveFlow::GoalCreate(draft) => draft.clone(),
        _ => Default::default(),
    };
    let goal_type = match draft.goal_type {
        Some(gt) => text(goal_type_key(gt), lang),
        None => "-".to_string(),
    };
    let date = draft
        .target_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}\n{}: {}\n{}: {}\n{}\n{}: {}\n{}",
        text(keys::GOAL_CONFIRM_HEADER, lang),
        text(keys::GOAL_LABEL_TYPE, lang),
        goal_type,
        text(keys::GOAL_LABEL_DESC, lang),
        draft.description.as_deref().unwrap_or("-"),
        amount_line(keys::GOAL_LABEL_AMOUNT, draft.target_amount, lang),
        text(keys::GOAL_LABEL_DATE, lang),
        date,
        text(keys::CONFIRM_OPTIONS, lang),
    )
}

fn contact_line(index: usize, contact: &ContactSummary) -> String {
    let marker = if contact.is_primary { " *" } else { "" };
    format!("{}. {} ({}){}", index + 1, contact.name, contact.phone, marker)
}

fn render_contact_list(session: &UssdSession) -> String {
    let lang = session.language();
    let contacts = match session.active_flow() {
        ActiveFlow::ContactBrowse(browse) => browse.contacts.as_slice(),
        _ => &[],
    };
    if contacts.is_empty() {
        return with_back(text(keys::CONTACTS_EMPTY, lang), lang);
    }
    let mut lines = vec![text(keys::CONTACTS_LIST_HEADER, lang)];
    lines.extend(contacts.iter().enumerate().map(|(i, c)| contact_line(i, c)));
    lines.push(text(keys::NAV_BACK, lang));
    lines.join("\n")
}

fn render_select_primary(session: &UssdSession) -> String {
    let lang = session.language();
    let contacts = match session.active_flow() {
        ActiveFlow::ContactBrowse(browse) => browse.contacts.as_slice(),
        _ => &[],
    };
    if contacts.is_empty() {
        return with_back(text(keys::CONTACTS_EMPTY, lang), lang);
    }
    let mut lines = vec![text(keys::CONTACTS_SELECT_PRIMARY_HEADER, lang)];
    lines.extend(contacts.iter().enumerate().map(|(i, c)| contact_line(i, c)));
    lines.push(text(keys::NAV_BACK, lang));
    lines.join("\n")
}

fn render_contact_confirm(session: &UssdSession) -> String {
    let lang = session.language();
    let draft = match session.active_flow() {
        ActiveFlow::ContactCreate(draft) => draft.clone(),
        _ => Default::default(),
    };
    let phone = draft
        .phone
        .as_ref()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "-".to_string());
    let primary = match draft.is_primary {
        Some(true) => text(keys::YES, lang),
        Some(false) => text(keys::NO, lang),
        None => "-".to_string(),
    };
    format!(
        "{}\n{}: {}\n{}: {}\n{}: {}\n{}: {}\n{}: {}\n{}",
        text(keys::CONTACT_CONFIRM_HEADER, lang),
        text(keys::CONTACT_LABEL_NAME, lang),
        draft.name.as_deref().unwrap_or("-"),
        text(keys::CONTACT_LABEL_PHONE, lang),
        phone,
        text(keys::CONTACT_LABEL_RELATIONSHIP, lang),
        draft.relationship.as_deref().unwrap_or("-"),
        text(keys::CONTACT_LABEL_ADDRESS, lang),
        draft.address.as_deref().unwrap_or("-"),
        text(keys::CONTACT_LABEL_PRIMARY, lang),
        primary,
        text(keys::CONFIRM_OPTIONS, lang),
    )
}
