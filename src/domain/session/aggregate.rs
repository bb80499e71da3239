//! Session aggregate entity.
//!
//! One row per gateway-assigned session id generation. The transport is
//! stateless, so everything the conversation needs between turns lives
//! here: current menu state, cached identity, the active flow draft, and
//! the back-navigation slot.
//!
//! # Lifecycle
//!
//! Created on the first request bearing an unseen session id; mutated on
//! every subsequent turn; deactivated on a terminal menu state (with
//! `completed_at`) or on abandonment/expiry (without). Rows are never
//! deleted.

use crate::domain::foundation::{
    DomainError, ErrorCode, Language, PhoneNumber, SessionRecordId, Timestamp,
};

use super::flow::{ActiveFlow, FlowData};
use super::identity::CallerIdentity;
use super::menu_state::MenuState;
use super::metadata::SessionMetadata;

/// Session aggregate - full conversational context of one USSD session.
///
/// # Invariants
///
/// - `menu_state` always names a dispatchable state
/// - the flow accumulator is non-idle only while `menu_state` belongs to
///   that flow's family
/// - `expires_at >= last_interaction_at`
/// - `completed_at` is set at most once, and only via [`UssdSession::complete`]
#[derive(Debug, Clone, PartialEq)]
pub struct UssdSession {
    id: SessionRecordId,
    session_id: String,
    phone_number: PhoneNumber,
    menu_state: MenuState,
    identity: Option<CallerIdentity>,
    language: Language,
    step_count: u32,
    flow: FlowData,
    created_at: Timestamp,
    last_interaction_at: Timestamp,
    expires_at: Timestamp,
    is_active: bool,
    completed_at: Option<Timestamp>,
    metadata: SessionMetadata,
}

impl UssdSession {
    /// Creates a fresh session in the initial state.
    pub fn start(
        session_id: impl Into<String>,
        phone_number: PhoneNumber,
        network_code: Option<String>,
        now: Timestamp,
        timeout_secs: u64,
    ) -> Self {
        Self {
            id: SessionRecordId::new(),
            session_id: session_id.into(),
            phone_number,
            menu_state: MenuState::MainMenu,
            identity: None,
            language: Language::default(),
            step_count: 0,
            flow: FlowData::default(),
            created_at: now,
            last_interaction_at: now,
            expires_at: now.plus_secs(timeout_secs),
            is_active: true,
            completed_at: None,
            metadata: SessionMetadata::from_network_code(network_code),
        }
    }

    /// Creates the replacement row for a session that expired.
    ///
    /// Carries the gateway id and phone number forward but starts in the
    /// reserved expired state so the caller is offered a fresh start
    /// instead of resuming the abandoned flow.
    pub fn expired_replacement(&self, now: Timestamp, timeout_secs: u64) -> Self {
        let mut replacement = Self::start(
            self.session_id.clone(),
            self.phone_number.clone(),
            self.metadata.network_code.clone(),
            now,
            timeout_secs,
        );
        replacement.menu_state = MenuState::SessionExpired;
        replacement
    }

    /// Reconstitute a session from persistence (no validation, no clock).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: SessionRecordId,
        session_id: String,
        phone_number: PhoneNumber,
        menu_state: MenuState,
        identity: Option<CallerIdentity>,
        language: Language,
        step_count: u32,
        flow: FlowData,
        created_at: Timestamp,
        last_interaction_at: Timestamp,
        expires_at: Timestamp,
        is_active: bool,
        completed_at: Option<Timestamp>,
        metadata: SessionMetadata,
    ) -> Self {
        Self {
            id,
            session_id,
            phone_number,
            menu_state,
            identity,
            language,
            step_count,
            flow,
            created_at,
            last_interaction_at,
            expires_at,
            is_active,
            completed_at,
            metadata,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the surrogate row id.
    pub fn id(&self) -> &SessionRecordId {
        &self.id
    }

    /// Returns the gateway-assigned session id.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Returns the caller's phone number.
    pub fn phone_number(&self) -> &PhoneNumber {
        &self.phone_number
    }

    /// Returns the current menu state.
    pub fn menu_state(&self) -> MenuState {
        self.menu_state
    }

    /// Returns the bound identity, if any.
    pub fn identity(&self) -> Option<&CallerIdentity> {
        self.identity.as_ref()
    }

    /// Returns the rendering language.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Returns the number of processed non-initial inputs.
    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    /// Returns the active flow accumulator.
    pub fn active_flow(&self) -> &ActiveFlow {
        &self.flow.active
    }

    /// Returns the active flow accumulator for in-place mutation.
    pub fn active_flow_mut(&mut self) -> &mut ActiveFlow {
        &mut self.flow.active
    }

    /// Returns the back-navigation slot without consuming it.
    pub fn previous_menu_state(&self) -> Option<MenuState> {
        self.flow.previous_menu_state
    }

    /// Returns the diagnostic input trail.
    pub fn input_history(&self) -> &[String] {
        &self.flow.input_history
    }

    /// Returns the full flow data (persistence only).
    pub fn flow_data(&self) -> &FlowData {
        &self.flow
    }

    /// Returns when the session was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns when the session last saw an accepted request.
    pub fn last_interaction_at(&self) -> &Timestamp {
        &self.last_interaction_at
    }

    /// Returns the stored expiry deadline.
    pub fn expires_at(&self) -> &Timestamp {
        &self.expires_at
    }

    /// Returns true while the session can still process turns.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns when the session completed normally, if it did.
    pub fn completed_at(&self) -> Option<&Timestamp> {
        self.completed_at.as_ref()
    }

    /// Returns the provider diagnostics.
    pub fn metadata(&self) -> &SessionMetadata {
        &self.metadata
    }

    /// Checks expiry against the deadline stored at the previous turn.
    pub fn is_expired_at(&self, now: &Timestamp) -> bool {
        now.is_after(&self.expires_at)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Extends the activity window; any accepted request counts as activity.
    ///
    /// # Errors
    ///
    /// - `SessionInactive` if the session has been deactivated
    pub fn touch(&mut self, now: Timestamp, timeout_secs: u64) -> Result<(), DomainError> {
        self.ensure_active()?;
        self.last_interaction_at = now;
        self.expires_at = now.plus_secs(timeout_secs);
        Ok(())
    }

    /// Counts one processed non-initial input.
    pub fn record_step(&mut self) {
        self.step_count = self.step_count.saturating_add(1);
    }

    /// Binds the resolved identity and adopts the caller's language.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if an identity is already bound
    pub fn bind_identity(
        &mut self,
        identity: CallerIdentity,
        language: Language,
    ) -> Result<(), DomainError> {
        if self.identity.is_some() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Session identity is immutable once bound",
            ));
        }
        self.identity = Some(identity);
        self.language = language;
        Ok(())
    }

    /// Switches the rendering language.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Copies the current state into the single back-navigation slot.
    pub fn remember_previous(&mut self) {
        self.flow.previous_menu_state = Some(self.menu_state);
    }

    /// Consumes the back-navigation slot, defaulting to the main menu.
    pub fn take_previous_state(&mut self) -> MenuState {
        self.flow
            .previous_menu_state
            .take()
            .unwrap_or(MenuState::MainMenu)
    }

    /// Moves to a new menu state, dropping any accumulator the new state's
    /// family no longer covers.
    pub fn transition_to(&mut self, state: MenuState) {
        self.menu_state = state;
        let keeps_flow = match self.flow.active.family() {
            Some(family) => self.menu_state.flow_family() == Some(family),
            None => true,
        };
        if !keeps_flow {
            self.flow.active = ActiveFlow::Idle;
        }
    }

    /// Appends one raw input token to the diagnostic trail.
    pub fn push_input(&mut self, input: &str) {
        self.flow.input_history.push(input.to_string());
    }

    /// Replaces the active flow accumulator.
    pub fn begin_flow(&mut self, flow: ActiveFlow) {
        self.flow.active = flow;
    }

    /// Clears the active flow accumulator.
    pub fn clear_flow(&mut self) {
        self.flow.active = ActiveFlow::Idle;
    }

    /// Deactivates via a normal terminal state.
    ///
    /// # Errors
    ///
    /// - `SessionAlreadyCompleted` if completed before
    /// - `SessionInactive` if already deactivated by abandonment
    pub fn complete(&mut self, now: Timestamp) -> Result<(), DomainError> {
        if self.completed_at.is_some() {
            return Err(DomainError::new(
                ErrorCode::SessionAlreadyCompleted,
                "Session has already completed",
            ));
        }
        self.ensure_active()?;
        self.is_active = false;
        self.completed_at = Some(now);
        Ok(())
    }

    /// Deactivates without completion (expiry, unregistered caller).
    pub fn abandon(&mut self) {
        self.is_active = false;
    }

    /// Records one collaborator or internal failure.
    pub fn record_error(&mut self) {
        self.metadata.record_error();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn ensure_active(&self) -> Result<(), DomainError> {
        if self.is_active {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::SessionInactive,
                "Session is no longer active",
            ))
        }
    }
}
