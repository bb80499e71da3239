//! ProcessUssdTurnHandler - one inbound gateway request, one reply.
//!
//! The whole transition (resolve -> bind -> dispatch -> persist) completes
//! synchronously within the turn; conversational continuity lives only in
//! the persisted session row. Turns for one session id are serialized by
//! [`SessionLocks`] so duplicate gateway deliveries cannot interleave the
//! read-modify-write.

use std::sync::Arc;

use tracing::Instrument;

use crate::domain::foundation::{
    BeneficiaryId, DomainError, ErrorCode, PhoneNumber, Timestamp, UserRole,
};
use crate::domain::menu::{latest_input, render, step, EffectRequest, StepOutcome, TurnReply};
use crate::domain::records::WeekPayload;
use crate::domain::session::{
    ActiveFlow, CallerIdentity, ContactBrowse, GoalBrowse, MenuState, UssdSession,
};
use crate::domain::translation::{bilingual, keys, text};
use crate::ports::{
    BeneficiaryGateway, ContactGateway, GoalGateway, IdentityGateway, SessionRepository,
    TrackingGateway,
};

use super::locks::SessionLocks;

/// Browse lists show at most this many recent records.
const RECENT_LIMIT: u32 = 5;

/// Placeholder fields marking tracking records as USSD submissions.
const USSD_NOTES: &str = "Submitted via USSD";
const USSD_CHALLENGES: &str = "Not captured via USSD";

/// One inbound gateway request.
#[derive(Debug, Clone)]
pub struct UssdTurnRequest {
    pub session_id: String,
    pub phone_number: String,
    pub service_code: String,
    pub text: String,
    pub network_code: Option<String>,
}

/// How the session resolver classified this turn.
enum Resolution {
    /// First request for an unseen gateway id.
    Fresh(UssdSession),
    /// Existing live session, activity window already extended.
    Live(UssdSession),
    /// The stored session expired; this is its replacement row.
    ExpiredOffer(UssdSession),
}

/// Handler for processing USSD turns.
pub struct ProcessUssdTurnHandler {
    sessions: Arc<dyn SessionRepository>,
    identities: Arc<dyn IdentityGateway>,
    beneficiaries: Arc<dyn BeneficiaryGateway>,
    goals: Arc<dyn GoalGateway>,
    contacts: Arc<dyn ContactGateway>,
    tracking: Arc<dyn TrackingGateway>,
    locks: SessionLocks,
    timeout_secs: u64,
}

impl ProcessUssdTurnHandler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        identities: Arc<dyn IdentityGateway>,
        beneficiaries: Arc<dyn BeneficiaryGateway>,
        goals: Arc<dyn GoalGateway>,
        contacts: Arc<dyn ContactGateway>,
        tracking: Arc<dyn TrackingGateway>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            sessions,
            identities,
            beneficiaries,
            goals,
            contacts,
            tracking,
            locks: SessionLocks::new(),
            timeout_secs,
        }
    }

    /// Processes one turn at the current wall-clock time.
    ///
    /// Never fails toward the transport: unexpected faults become a generic
    /// bilingual terminal message.
    pub async fn handle(&self, request: UssdTurnRequest) -> TurnReply {
        self.handle_at(request, Timestamp::now()).await
    }

    /// Processes one turn at an explicit time (injectable for tests and
    /// deterministic replay).
    pub async fn handle_at(&self, request: UssdTurnRequest, now: Timestamp) -> TurnReply {
        let span = tracing::info_span!(
            "ussd_turn",
            session_id = %request.session_id,
            phone = %request.phone_number,
        );
        async {
            let _guard = self.locks.acquire(&request.session_id).await;
            match self.process(&request, now).await {
                Ok(reply) => reply,
                Err(err) => {
                    tracing::error!(error = %err, "turn failed");
                    TurnReply::End(bilingual(keys::ERR_SYSTEM))
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn process(
        &self,
        request: &UssdTurnRequest,
        now: Timestamp,
    ) -> Result<TurnReply, DomainError> {
        let phone = PhoneNumber::new(request.phone_number.as_str())?;
        let is_start = request.text.trim().is_empty();
        let input = latest_input(&request.text).to_string();

        let (mut session, is_new, expired_offer) = match self
            .resolve(&request.session_id, &phone, request.network_code.clone(), now)
            .await?
        {
            Resolution::Fresh(session) => (session, true, false),
            Resolution::ExpiredOffer(session) => (session, true, true),
            Resolution::Live(session) => (session, false, false),
        };

        if !is_start {
            session.record_step();
        }

        self.bind_if_absent(&mut session, &phone).await?;

        let identity = match session.identity().copied() {
            Some(identity) => identity,
            None => {
                session.abandon();
                self.persist(&session, is_new).await?;
                return Ok(TurnReply::End(bilingual(keys::ERR_NOT_REGISTERED)));
            }
        };
        if !identity.role.is_interactive() {
            session.abandon();
            self.persist(&session, is_new).await?;
            return Ok(TurnReply::End(bilingual(keys::ERR_ROLE_UNSUPPORTED)));
        }

        let reply = if expired_offer {
            // The input belonged to the abandoned flow; offer restart or
            // exit instead of dispatching it.
            TurnReply::Continue(render(session.menu_state(), &session))
        } else {
            match step(&mut session, &input, is_start) {
                StepOutcome::Render { notice } => {
                    tracing::debug!(state = %session.menu_state(), "rendering");
                    let body = render(session.menu_state(), &session);
                    let message = match notice {
                        Some(key) => format!("{}\n{}", text(key, session.language()), body),
                        None => body,
                    };
                    TurnReply::Continue(message)
                }
                StepOutcome::Effect(effect) => {
                    match self.run_effect(&mut session, &identity, effect, now).await {
                        Ok(reply) => reply,
                        Err(err) => {
                            tracing::error!(
                                error = %err,
                                state = %session.menu_state(),
                                "collaborator call failed"
                            );
                            session.record_error();
                            let language = session.language();
                            session.abandon();
                            self.persist(&session, is_new).await?;
                            return Ok(TurnReply::End(text(keys::ERR_SAVE_FAILED, language)));
                        }
                    }
                }
                StepOutcome::End { message_key } => {
                    session.complete(now)?;
                    TurnReply::End(text(message_key, session.language()))
                }
            }
        };

        self.persist(&session, is_new).await?;
        Ok(reply)
    }

    /// Finds or creates the session row; must run before any state is
    /// consulted so expiry is judged against the previous turn's stored
    /// timestamps.
    async fn resolve(
        &self,
        session_id: &str,
        phone: &PhoneNumber,
        network_code: Option<String>,
        now: Timestamp,
    ) -> Result<Resolution, DomainError> {
        match self.sessions.find_current(session_id).await? {
            None => Ok(Resolution::Fresh(UssdSession::start(
                session_id,
                phone.clone(),
                network_code,
                now,
                self.timeout_secs,
            ))),
            Some(mut existing) => {
                if existing.is_expired_at(&now) {
                    tracing::debug!(session_id, "session expired, offering restart");
                    existing.abandon();
                    self.sessions.update(&existing).await?;
                    Ok(Resolution::ExpiredOffer(
                        existing.expired_replacement(now, self.timeout_secs),
                    ))
                } else {
                    // Any accepted request counts as activity, valid or not.
                    existing.touch(now, self.timeout_secs)?;
                    Ok(Resolution::Live(existing))
                }
            }
        }
    }

    /// Resolves the caller to a platform identity, once per session.
    ///
    /// A beneficiary-role user without a beneficiary record is left
    /// unbound and handled as unregistered.
    async fn bind_if_absent(
        &self,
        session: &mut UssdSession,
        phone: &PhoneNumber,
    ) -> Result<(), DomainError> {
        if session.identity().is_some() {
            return Ok(());
        }
        let user = match self.identities.find_by_phone(phone).await? {
            Some(user) => user,
            None => return Ok(()),
        };
        let identity = match user.role {
            UserRole::Beneficiary => {
                match self.beneficiaries.find_by_user_id(&user.user_id).await? {
                    Some(beneficiary_id) => {
                        CallerIdentity::beneficiary(user.user_id, beneficiary_id)
                    }
                    None => return Ok(()),
                }
            }
            role => CallerIdentity::non_beneficiary(user.user_id, role),
        };
        session.bind_identity(identity, user.language)?;
        Ok(())
    }

    /// Executes a collaborator call requested by a handler, then renders
    /// the state it lands on.
    async fn run_effect(
        &self,
        session: &mut UssdSession,
        identity: &CallerIdentity,
        effect: EffectRequest,
        now: Timestamp,
    ) -> Result<TurnReply, DomainError> {
        match effect {
            EffectRequest::LoadGoals => {
                let beneficiary_id = require_beneficiary(identity)?;
                let goals = self.goals.list_recent(&beneficiary_id, RECENT_LIMIT).await?;
                session.begin_flow(ActiveFlow::GoalBrowse(GoalBrowse { goals, selected: None }));
                session.transition_to(MenuState::ViewGoals);
                Ok(TurnReply::Continue(render(session.menu_state(), session)))
            }
            EffectRequest::SubmitGoal => {
                let beneficiary_id = require_beneficiary(identity)?;
                let submission = match session.active_flow() {
                    ActiveFlow::GoalCreate(draft) => draft.to_submission(),
                    _ => None,
                }
                .ok_or_else(|| {
                    DomainError::new(
                        ErrorCode::InternalError,
                        "Goal confirm reached with incomplete draft",
                    )
                })?;
                self.goals.create(&beneficiary_id, &submission).await?;
                session.clear_flow();
                session.transition_to(MenuState::GoalsMenu);
                Ok(self.continue_with_notice(keys::GOAL_CREATED, session))
            }
            EffectRequest::LoadContactsForView => {
                let beneficiary_id = require_beneficiary(identity)?;
                let contacts = self
                    .contacts
                    .list_recent(&beneficiary_id, RECENT_LIMIT)
                    .await?;
                session.begin_flow(ActiveFlow::ContactBrowse(ContactBrowse { contacts }));
                session.transition_to(MenuState::ViewContacts);
                Ok(TurnReply::Continue(render(session.menu_state(), session)))
            }
            EffectRequest::LoadContactsForPrimary => {
                let beneficiary_id = require_beneficiary(identity)?;
                let contacts = self
                    .contacts
                    .list_recent(&beneficiary_id, RECENT_LIMIT)
                    .await?;
                session.begin_flow(ActiveFlow::ContactBrowse(ContactBrowse { contacts }));
                session.transition_to(MenuState::SelectPrimaryContact);
                Ok(TurnReply::Continue(render(session.menu_state(), session)))
            }
            EffectRequest::SubmitContact => {
                let beneficiary_id = require_beneficiary(identity)?;
                let submission = match session.active_flow() {
                    ActiveFlow::ContactCreate(draft) => draft.to_submission(),
                    _ => None,
                }
                .ok_or_else(|| {
                    DomainError::new(
                        ErrorCode::InternalError,
                        "Contact confirm reached with incomplete draft",
                    )
                })?;
                self.contacts.create(&beneficiary_id, &submission).await?;
                session.clear_flow();
                session.transition_to(MenuState::ContactsMenu);
                Ok(self.continue_with_notice(keys::CONTACT_CREATED, session))
            }
            EffectRequest::SetPrimaryContact { contact_id } => {
                self.contacts.set_primary(&contact_id).await?;
                session.clear_flow();
                session.transition_to(MenuState::ContactsMenu);
                Ok(self.continue_with_notice(keys::CONTACT_PRIMARY_SET, session))
            }
            EffectRequest::SubmitTracking => {
                let beneficiary_id = require_beneficiary(identity)?;
                let figures = match session.active_flow() {
                    ActiveFlow::Tracking(draft) => draft.figures(),
                    _ => None,
                }
                .ok_or_else(|| {
                    DomainError::new(
                        ErrorCode::InternalError,
                        "Tracking confirm reached with incomplete draft",
                    )
                })?;
                let (income, expenses, capital, attendance) = figures;
                let payload = WeekPayload {
                    week_ending: now.date(),
                    income_this_week: income,
                    expenses_this_week: expenses,
                    current_capital: capital,
                    attendance,
                    notes: USSD_NOTES.to_string(),
                    challenges: USSD_CHALLENGES.to_string(),
                };
                self.tracking
                    .submit(&beneficiary_id, &payload, &identity.user_id, identity.role)
                    .await?;
                session.clear_flow();
                session.transition_to(MenuState::MainMenu);
                Ok(self.continue_with_notice(keys::TRACKING_SUBMITTED, session))
            }
            EffectRequest::ChangeLanguage(language) => {
                self.identities
                    .update_language(&identity.user_id, language)
                    .await?;
                session.set_language(language);
                session.transition_to(MenuState::MainMenu);
                Ok(self.continue_with_notice(keys::LANGUAGE_UPDATED, session))
            }
        }
    }

    fn continue_with_notice(&self, notice_key: &str, session: &UssdSession) -> TurnReply {
        TurnReply::Continue(format!(
            "{}\n{}",
            text(notice_key, session.language()),
            render(session.menu_state(), session),
        ))
    }

    async fn persist(&self, session: &UssdSession, is_new: bool) -> Result<(), DomainError> {
        if is_new {
            self.sessions.create(session).await
        } else {
            self.sessions.update(session).await
        }
    }
}

fn require_beneficiary(identity: &CallerIdentity) -> Result<BeneficiaryId, DomainError> {
    identity.beneficiary_id.ok_or_else(|| {
        DomainError::new(
            ErrorCode::InternalError,
            "Interactive session without beneficiary id",
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ContactId, GoalId, Language, TrackingRecordId, UserId};
    use crate::domain::records::{
        Attendance, ContactSubmission, ContactSummary, GoalSubmission, GoalSummary, GoalType,
        RegisteredUser,
    };
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════
    // Mock ports
    // ════════════════════════════════════════════════════════════════════

    #[derive(Default)]
    struct MockSessionRepository {
        rows: Mutex<Vec<UssdSession>>,
    }

    impl MockSessionRepository {
        fn rows(&self) -> Vec<UssdSession> {
            self.rows.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SessionRepository for MockSessionRepository {
        async fn create(&self, session: &UssdSession) -> Result<(), DomainError> {
            self.rows.lock().unwrap().push(session.clone());
            Ok(())
        }

        async fn update(&self, session: &UssdSession) -> Result<(), DomainError> {
            let mut rows = self.rows.lock().unwrap();
            match rows.iter_mut().find(|row| row.id() == session.id()) {
                Some(row) => {
                    *row = session.clone();
                    Ok(())
                }
                None => Err(DomainError::new(
                    ErrorCode::SessionNotFound,
                    "Session not found",
                )),
            }
        }

        async fn find_current(
            &self,
            session_id: &str,
        ) -> Result<Option<UssdSession>, DomainError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .filter(|row| row.session_id() == session_id && row.is_active())
                .max_by_key(|row| *row.created_at())
                .cloned())
        }

        async fn deactivate_stale(&self, cutoff: Timestamp) -> Result<u64, DomainError> {
            let mut rows = self.rows.lock().unwrap();
            let mut swept = 0;
            for row in rows.iter_mut() {
                if row.is_active() && row.expires_at().is_before(&cutoff) {
                    row.abandon();
                    swept += 1;
                }
            }
            Ok(swept)
        }
    }

    #[derive(Default)]
    struct MockIdentityGateway {
        users: Mutex<HashMap<String, RegisteredUser>>,
        language_updates: Mutex<Vec<(UserId, Language)>>,
    }

    impl MockIdentityGateway {
        fn with_user(phone: &str, user: RegisteredUser) -> Self {
            let gateway = Self::default();
            gateway
                .users
                .lock()
                .unwrap()
                .insert(PhoneNumber::new(phone).unwrap().as_str().to_string(), user);
            gateway
        }

        fn language_updates(&self) -> Vec<(UserId, Language)> {
            self.language_updates.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl IdentityGateway for MockIdentityGateway {
        async fn find_by_phone(
            &self,
            phone: &PhoneNumber,
        ) -> Result<Option<RegisteredUser>, DomainError> {
            Ok(self.users.lock().unwrap().get(phone.as_str()).cloned())
        }

        async fn update_language(
            &self,
            user_id: &UserId,
            language: Language,
        ) -> Result<(), DomainError> {
            self.language_updates
                .lock()
                .unwrap()
                .push((*user_id, language));
            let mut users = self.users.lock().unwrap();
            for user in users.values_mut() {
                if &user.user_id == user_id {
                    user.language = language;
                }
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockBeneficiaryGateway {
        records: Mutex<HashMap<UserId, BeneficiaryId>>,
    }

    #[async_trait]
    impl BeneficiaryGateway for MockBeneficiaryGateway {
        async fn find_by_user_id(
            &self,
            user_id: &UserId,
        ) -> Result<Option<BeneficiaryId>, DomainError> {
            Ok(self.records.lock().unwrap().get(user_id).copied())
        }
    }

    #[derive(Default)]
    struct MockGoalGateway {
        listed: Mutex<Vec<GoalSummary>>,
        created: Mutex<Vec<GoalSubmission>>,
        fail_create: bool,
    }

    impl MockGoalGateway {
        fn failing() -> Self {
            Self {
                fail_create: true,
                ..Default::default()
            }
        }

        fn created(&self) -> Vec<GoalSubmission> {
            self.created.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GoalGateway for MockGoalGateway {
        async fn list_recent(
            &self,
            _beneficiary_id: &BeneficiaryId,
            limit: u32,
        ) -> Result<Vec<GoalSummary>, DomainError> {
            let listed = self.listed.lock().unwrap();
            Ok(listed.iter().take(limit as usize).cloned().collect())
        }

        async fn create(
            &self,
            _beneficiary_id: &BeneficiaryId,
            submission: &GoalSubmission,
        ) -> Result<GoalSummary, DomainError> {
            if self.fail_create {
                return Err(DomainError::new(
                    ErrorCode::GatewayError,
                    "Simulated goal service outage",
                ));
            }
            self.created.lock().unwrap().push(submission.clone());
            Ok(GoalSummary {
                id: GoalId::new(),
                goal_type: submission.goal_type,
                description: submission.description.clone(),
                target_amount: submission.target_amount,
                target_date: submission.target_date,
            })
        }
    }

    #[derive(Default)]
    struct MockContactGateway {
        listed: Mutex<Vec<ContactSummary>>,
        created: Mutex<Vec<ContactSubmission>>,
        primary_calls: Mutex<Vec<ContactId>>,
    }

    #[async_trait]
    impl ContactGateway for MockContactGateway {
        async fn list_recent(
            &self,
            _beneficiary_id: &BeneficiaryId,
            limit: u32,
        ) -> Result<Vec<ContactSummary>, DomainError> {
            let listed = self.listed.lock().unwrap();
            Ok(listed.iter().take(limit as usize).cloned().collect())
        }

        async fn create(
            &self,
            _beneficiary_id: &BeneficiaryId,
            submission: &ContactSubmission,
        ) -> Result<ContactSummary, DomainError> {
            self.created.lock().unwrap().push(submission.clone());
            Ok(ContactSummary {
                id: ContactId::new(),
                name: submission.name.clone(),
                phone: submission.phone.clone(),
                relationship: submission.relationship.clone(),
                is_primary: submission.is_primary,
            })
        }

        async fn set_primary(&self, contact_id: &ContactId) -> Result<(), DomainError> {
            self.primary_calls.lock().unwrap().push(*contact_id);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockTrackingGateway {
        submissions: Mutex<Vec<(BeneficiaryId, WeekPayload, UserId, UserRole)>>,
    }

    impl MockTrackingGateway {
        fn submissions(&self) -> Vec<(BeneficiaryId, WeekPayload, UserId, UserRole)> {
            self.submissions.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TrackingGateway for MockTrackingGateway {
        async fn submit(
            &self,
            beneficiary_id: &BeneficiaryId,
            payload: &WeekPayload,
            submitter_id: &UserId,
            submitter_role: UserRole,
        ) -> Result<TrackingRecordId, DomainError> {
            self.submissions.lock().unwrap().push((
                *beneficiary_id,
                payload.clone(),
                *submitter_id,
                submitter_role,
            ));
            Ok(TrackingRecordId::new())
        }
    }

    // ════════════════════════════════════════════════════════════════════
    // Fixture
    // ════════════════════════════════════════════════════════════════════

    const PHONE: &str = "0712345678";
    const TIMEOUT: u64 = 180;

    struct Fixture {
        handler: ProcessUssdTurnHandler,
        sessions: Arc<MockSessionRepository>,
        identities: Arc<MockIdentityGateway>,
        goals: Arc<MockGoalGateway>,
        contacts: Arc<MockContactGateway>,
        tracking: Arc<MockTrackingGateway>,
        user_id: UserId,
        beneficiary_id: BeneficiaryId,
    }

    impl Fixture {
        fn registered_beneficiary() -> Self {
            Self::build(UserRole::Beneficiary, Language::English, MockGoalGateway::default())
        }

        fn build(role: UserRole, language: Language, goals: MockGoalGateway) -> Self {
            let user_id = UserId::new();
            let beneficiary_id = BeneficiaryId::new();
            let identities = Arc::new(MockIdentityGateway::with_user(
                PHONE,
                RegisteredUser { user_id, role, language },
            ));
            let beneficiaries = Arc::new(MockBeneficiaryGateway::default());
            beneficiaries
                .records
                .lock()
                .unwrap()
                .insert(user_id, beneficiary_id);

            let sessions = Arc::new(MockSessionRepository::default());
            let goals = Arc::new(goals);
            let contacts = Arc::new(MockContactGateway::default());
            let tracking = Arc::new(MockTrackingGateway::default());

            let handler = ProcessUssdTurnHandler::new(
                sessions.clone(),
                identities.clone(),
                beneficiaries,
                goals.clone(),
                contacts.clone(),
                tracking.clone(),
                TIMEOUT,
            );

            Self {
                handler,
                sessions,
                identities,
                goals,
                contacts,
                tracking,
                user_id,
                beneficiary_id,
            }
        }

        fn request(&self, session_id: &str, text: &str) -> UssdTurnRequest {
            UssdTurnRequest {
                session_id: session_id.to_string(),
                phone_number: PHONE.to_string(),
                service_code: "*384*42#".to_string(),
                text: text.to_string(),
                network_code: Some("63902".to_string()),
            }
        }

        /// Drives accumulated turns the way the gateway does: empty text,
        /// then the joined history of entered tokens.
        async fn drive(&self, session_id: &str, inputs: &[&str], now: Timestamp) -> TurnReply {
            let mut reply = self.handler.handle_at(self.request(session_id, ""), now).await;
            let mut accumulated = String::new();
            for input in inputs {
                if accumulated.is_empty() {
                    accumulated.push_str(input);
                } else {
                    accumulated.push('*');
                    accumulated.push_str(input);
                }
                reply = self
                    .handler
                    .handle_at(self.request(session_id, &accumulated), now)
                    .await;
            }
            reply
        }
    }

    fn t0() -> Timestamp {
        Timestamp::from_unix_secs(1_700_000_000)
    }

    // ════════════════════════════════════════════════════════════════════
    // Session start and gating
    // ════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn session_start_renders_main_menu() {
        let fixture = Fixture::registered_beneficiary();
        let reply = fixture.handler.handle_at(fixture.request("AT1", ""), t0()).await;

        assert!(!reply.is_terminal());
        assert!(reply.to_protocol_string().starts_with("CON Welcome to Tumaini"));

        let rows = fixture.sessions.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].menu_state(), MenuState::MainMenu);
        assert_eq!(rows[0].step_count(), 0);
    }

    #[tokio::test]
    async fn unregistered_caller_is_terminated_bilingually() {
        let fixture = Fixture::registered_beneficiary();
        let request = UssdTurnRequest {
            phone_number: "0799999999".to_string(),
            ..fixture.request("AT2", "")
        };
        let reply = fixture.handler.handle_at(request, t0()).await;

        assert!(reply.is_terminal());
        assert!(reply.message().contains("not registered"));
        assert!(reply.message().contains("haijasajiliwa"));

        let rows = fixture.sessions.rows();
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].is_active());
        assert!(rows[0].completed_at().is_none());
    }

    #[tokio::test]
    async fn non_beneficiary_role_is_turned_away() {
        let fixture = Fixture::build(
            UserRole::Mentor,
            Language::English,
            MockGoalGateway::default(),
        );
        let reply = fixture.handler.handle_at(fixture.request("AT3", ""), t0()).await;

        assert!(reply.is_terminal());
        assert!(reply.message().contains("beneficiaries only"));
    }

    #[tokio::test]
    async fn step_count_increments_on_non_initial_turns_only() {
        let fixture = Fixture::registered_beneficiary();
        fixture.drive("AT4", &["1", "500"], t0()).await;

        let rows = fixture.sessions.rows();
        assert_eq!(rows[0].step_count(), 2);
    }

    // ════════════════════════════════════════════════════════════════════
    // Tracking flow end to end
    // ════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn full_tracking_submission_calls_gateway_once() {
        let fixture = Fixture::registered_beneficiary();
        let now = t0();
        let reply = fixture
            .drive("AT5", &["1", "10000", "2000", "50000", "1", "1"], now)
            .await;

        let submissions = fixture.tracking.submissions();
        assert_eq!(submissions.len(), 1);
        let (beneficiary_id, payload, submitter_id, submitter_role) = &submissions[0];
        assert_eq!(beneficiary_id, &fixture.beneficiary_id);
        assert_eq!(payload.income_this_week, 10_000);
        assert_eq!(payload.expenses_this_week, 2_000);
        assert_eq!(payload.current_capital, 50_000);
        assert_eq!(payload.attendance, Attendance::Present);
        assert_eq!(payload.week_ending, now.date());
        assert_eq!(payload.notes, "Submitted via USSD");
        assert_eq!(submitter_id, &fixture.user_id);
        assert_eq!(*submitter_role, UserRole::Beneficiary);

        // Flow returns to the root menu rather than exiting.
        assert!(!reply.is_terminal());
        assert!(reply.message().contains("Weekly report saved"));
        assert!(reply.message().contains("1. Weekly tracking"));

        let rows = fixture.sessions.rows();
        assert_eq!(rows[0].active_flow(), &ActiveFlow::Idle);
        assert_eq!(rows[0].menu_state(), MenuState::MainMenu);
    }

    #[tokio::test]
    async fn invalid_income_rerenders_income_without_storing() {
        let fixture = Fixture::registered_beneficiary();
        let reply = fixture.drive("AT6", &["1", "-5"], t0()).await;

        assert!(!reply.is_terminal());
        assert!(reply.message().contains("valid amount"));
        assert!(reply.message().contains("Enter income this week"));

        let rows = fixture.sessions.rows();
        assert_eq!(rows[0].menu_state(), MenuState::TrackingIncome);
        match rows[0].active_flow() {
            ActiveFlow::Tracking(draft) => assert_eq!(draft.income_this_week, None),
            other => panic!("expected tracking draft, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn tracking_cancel_submits_nothing() {
        let fixture = Fixture::registered_beneficiary();
        fixture
            .drive("AT7", &["1", "10000", "2000", "50000", "1", "3"], t0())
            .await;

        assert!(fixture.tracking.submissions().is_empty());
        let rows = fixture.sessions.rows();
        assert_eq!(rows[0].menu_state(), MenuState::MainMenu);
        assert_eq!(rows[0].active_flow(), &ActiveFlow::Idle);
    }

    // ════════════════════════════════════════════════════════════════════
    // Goal flow
    // ════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn goal_draft_submits_atomically_with_all_fields() {
        let fixture = Fixture::registered_beneficiary();
        fixture
            .drive(
                "AT8",
                &["2", "2", "1", "Buy a water tank", "30000", "2026-06-01", "1"],
                t0(),
            )
            .await;

        let created = fixture.goals.created();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].goal_type, GoalType::Business);
        assert_eq!(created[0].description, "Buy a water tank");
        assert_eq!(created[0].target_amount, 30_000);
        assert_eq!(
            created[0].target_date,
            NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
        );

        let rows = fixture.sessions.rows();
        assert_eq!(rows[0].active_flow(), &ActiveFlow::Idle);
        assert_eq!(rows[0].menu_state(), MenuState::GoalsMenu);
    }

    #[tokio::test]
    async fn goal_cancel_before_confirm_creates_nothing() {
        let fixture = Fixture::registered_beneficiary();
        fixture
            .drive("AT9", &["2", "2", "1", "Anything", "30000", "2026-06-01", "3"], t0())
            .await;

        assert!(fixture.goals.created().is_empty());
    }

    #[tokio::test]
    async fn goal_service_failure_terminates_with_save_error() {
        let fixture = Fixture::build(
            UserRole::Beneficiary,
            Language::English,
            MockGoalGateway::failing(),
        );
        let reply = fixture
            .drive("AT10", &["2", "2", "1", "Anything", "30000", "2026-06-01", "1"], t0())
            .await;

        assert!(reply.is_terminal());
        assert!(reply.message().contains("could not save"));

        let rows = fixture.sessions.rows();
        assert!(!rows[0].is_active());
        assert!(rows[0].completed_at().is_none());
        assert_eq!(rows[0].metadata().error_count, 1);
    }

    #[tokio::test]
    async fn view_goals_caches_list_for_selection() {
        let fixture = Fixture::registered_beneficiary();
        fixture.goals.listed.lock().unwrap().push(GoalSummary {
            id: GoalId::new(),
            goal_type: GoalType::Education,
            description: "School fees".to_string(),
            target_amount: 15_000,
            target_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
        });

        let reply = fixture.drive("AT11", &["2", "1", "1"], t0()).await;

        // Third turn selected goal 1 and rendered its details.
        assert!(reply.message().contains("School fees"));
        assert!(reply.message().contains("KES 15000"));
    }

    // ════════════════════════════════════════════════════════════════════
    // Contact flow
    // ════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn contact_create_path_submits_normalized_phone() {
        let fixture = Fixture::registered_beneficiary();
        fixture
            .drive(
                "AT12",
                &["3", "2", "Mary Wanjiku", "0722000111", "Sister", "Kibera", "1", "1"],
                t0(),
            )
            .await;

        let created = fixture.contacts.created.lock().unwrap().clone();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].phone.as_str(), "254722000111");
        assert!(created[0].is_primary);
    }

    #[tokio::test]
    async fn select_primary_calls_gateway_with_chosen_contact() {
        let fixture = Fixture::registered_beneficiary();
        let contact_id = ContactId::new();
        fixture.contacts.listed.lock().unwrap().push(ContactSummary {
            id: contact_id,
            name: "Mary".to_string(),
            phone: PhoneNumber::new("0722000111").unwrap(),
            relationship: "Sister".to_string(),
            is_primary: false,
        });

        let reply = fixture.drive("AT13", &["3", "3", "1"], t0()).await;

        assert_eq!(
            fixture.contacts.primary_calls.lock().unwrap().clone(),
            vec![contact_id]
        );
        assert!(reply.message().contains("Primary contact updated"));
    }

    // ════════════════════════════════════════════════════════════════════
    // Language flow
    // ════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn language_switch_updates_identity_once_and_rerenders() {
        let fixture = Fixture::registered_beneficiary();
        let reply = fixture.drive("AT14", &["4", "2"], t0()).await;

        let updates = fixture.identities.language_updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0], (fixture.user_id, Language::Swahili));

        // Main menu re-rendered in the new language.
        assert!(reply.message().contains("Karibu Tumaini"));
    }

    #[tokio::test]
    async fn language_preference_survives_into_a_new_session() {
        let fixture = Fixture::registered_beneficiary();
        fixture.drive("AT15", &["4", "2"], t0()).await;

        // A brand-new gateway session for the same phone starts in Swahili
        // because identity binding adopts the persisted preference.
        let reply = fixture
            .handler
            .handle_at(fixture.request("AT16", ""), t0().plus_secs(600))
            .await;
        assert!(reply.message().starts_with("Karibu Tumaini"));
    }

    // ════════════════════════════════════════════════════════════════════
    // Expiry
    // ════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn turn_just_inside_timeout_resumes_the_flow() {
        let fixture = Fixture::registered_beneficiary();
        let now = t0();
        fixture.drive("AT17", &["1", "10000"], now).await;

        let reply = fixture
            .handler
            .handle_at(
                fixture.request("AT17", "1*10000*2000"),
                now.plus_secs(TIMEOUT - 1),
            )
            .await;

        assert!(reply.message().contains("Enter current capital"));
        let rows = fixture.sessions.rows();
        assert_eq!(rows.len(), 1);
        match rows[0].active_flow() {
            ActiveFlow::Tracking(draft) => {
                assert_eq!(draft.income_this_week, Some(10_000));
                assert_eq!(draft.expenses_this_week, Some(2_000));
            }
            other => panic!("expected tracking draft, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn turn_just_past_timeout_offers_restart() {
        let fixture = Fixture::registered_beneficiary();
        let now = t0();
        fixture.drive("AT18", &["1", "10000"], now).await;

        let reply = fixture
            .handler
            .handle_at(
                fixture.request("AT18", "1*10000*2000"),
                now.plus_secs(TIMEOUT + 1),
            )
            .await;

        assert!(!reply.is_terminal());
        assert!(reply.message().contains("session expired"));

        let rows = fixture.sessions.rows();
        assert_eq!(rows.len(), 2);
        // Old generation abandoned, not completed.
        assert!(!rows[0].is_active());
        assert!(rows[0].completed_at().is_none());
        // Replacement generation waits in the expired state.
        assert!(rows[1].is_active());
        assert_eq!(rows[1].menu_state(), MenuState::SessionExpired);
    }

    #[tokio::test]
    async fn restart_after_expiry_returns_to_main_menu() {
        let fixture = Fixture::registered_beneficiary();
        let now = t0();
        fixture.drive("AT19", &["1", "10000"], now).await;
        let later = now.plus_secs(TIMEOUT + 30);
        fixture
            .handler
            .handle_at(fixture.request("AT19", "1*10000*2000"), later)
            .await;

        let reply = fixture
            .handler
            .handle_at(fixture.request("AT19", "1*10000*2000*1"), later.plus_secs(10))
            .await;

        assert!(reply.message().contains("Welcome to Tumaini"));
        let rows = fixture.sessions.rows();
        assert_eq!(rows[1].menu_state(), MenuState::MainMenu);
    }

    // ════════════════════════════════════════════════════════════════════
    // Exit and back navigation
    // ════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn exit_completes_the_session() {
        let fixture = Fixture::registered_beneficiary();
        let reply = fixture.drive("AT20", &["5"], t0()).await;

        assert!(reply.is_terminal());
        assert!(reply.message().contains("Goodbye"));

        let rows = fixture.sessions.rows();
        assert!(!rows[0].is_active());
        assert!(rows[0].completed_at().is_some());
    }

    #[tokio::test]
    async fn back_from_goals_menu_rerenders_main_menu_exactly() {
        let fixture = Fixture::registered_beneficiary();
        let entering = fixture.drive("AT21", &[], t0()).await;
        let after_back = fixture.drive("AT22", &["2", "00"], t0()).await;

        assert_eq!(entering.message(), after_back.message());
    }
}
