use crate::client::{AuthApi, LeadApi};
use crate::errors::ApiError;
use crate::gate::{LoginOutcome, LoginPrompt};
use crate::models::LeadSnapshot;
use crate::progress::ProgressView;
use crate::session::{self, Session};
use std::time::Duration;
use tracing::{debug, warn};

pub const RELOAD_DELAY: Duration = Duration::from_secs(2);

const INVALID_NUMBER: &str = "Please enter a valid number";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    Notify(Notice),
    Celebrate,
    Reload(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Failed,
    Invalid,
    LoginRequired,
    Disabled,
    AwaitingConfirmation,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetState {
    #[default]
    Idle,
    PendingConfirmation,
}

pub struct LeadBoard<A> {
    api: A,
    session: Session,
    snapshot: Option<LeadSnapshot>,
    lead_input: String,
    target_input: String,
    loading: bool,
    login_prompt: LoginPrompt,
    reset: ResetState,
    signals: Vec<Signal>,
}

impl<A: LeadApi + AuthApi> LeadBoard<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            session: Session::Pending,
            snapshot: None,
            lead_input: String::new(),
            target_input: String::new(),
            loading: false,
            login_prompt: LoginPrompt::default(),
            reset: ResetState::Idle,
            signals: Vec::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn snapshot(&self) -> Option<&LeadSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn view(&self) -> Option<ProgressView> {
        self.snapshot.as_ref().map(ProgressView::from_snapshot)
    }

    pub fn lead_input(&self) -> &str {
        &self.lead_input
    }

    pub fn set_lead_input(&mut self, text: impl Into<String>) {
        self.lead_input = text.into();
    }

    pub fn target_input(&self) -> &str {
        &self.target_input
    }

    pub fn set_target_input(&mut self, text: impl Into<String>) {
        self.target_input = text.into();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn login_prompt(&self) -> LoginPrompt {
        self.login_prompt
    }

    pub fn reset_state(&self) -> ResetState {
        self.reset
    }

    pub fn can_undo(&self) -> bool {
        self.snapshot.as_ref().is_some_and(|snapshot| !snapshot.history_stack.is_empty())
    }

    pub fn can_redo(&self) -> bool {
        self.snapshot.as_ref().is_some_and(|snapshot| !snapshot.redo_stack.is_empty())
    }

    pub fn drain_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.signals)
    }

    pub async fn start(&mut self) -> bool {
        self.session = Session::Pending;
        self.session = session::resolve(&self.api).await;
        self.load().await
    }

    pub async fn load(&mut self) -> bool {
        match self.api.fetch_snapshot().await {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                true
            }
            Err(err) => {
                warn!("initial load failed: {err}");
                self.notify(Level::Error, "Please log in again");
                self.signals.push(Signal::Reload(RELOAD_DELAY));
                false
            }
        }
    }

    pub async fn submit_lead(&mut self) -> Outcome {
        if self.snapshot.is_none() {
            return Outcome::Disabled;
        }
        if !self.login_prompt.allow(self.session) {
            return Outcome::LoginRequired;
        }
        let Some(value) = parse_positive(&self.lead_input) else {
            self.notify(Level::Warning, INVALID_NUMBER);
            return Outcome::Invalid;
        };

        self.loading = true;
        let dispatched = self.api.add_lead(value).await;
        let result = self.reconcile(dispatched).await;
        self.loading = false;

        match result {
            Ok(()) => {
                self.lead_input.clear();
                self.signals.push(Signal::Celebrate);
                let goal_met = self.view().is_some_and(|view| view.goal_met());
                if goal_met {
                    self.notify(Level::Success, "Goal reached!");
                } else {
                    self.notify(Level::Success, "Updated this week's leads");
                }
                Outcome::Applied
            }
            Err(err) => self.fail(&err, "Could not add leads"),
        }
    }

    pub async fn update_target(&mut self) -> Outcome {
        if self.snapshot.is_none() {
            return Outcome::Disabled;
        }
        if !self.login_prompt.allow(self.session) {
            return Outcome::LoginRequired;
        }
        let Some(target) = parse_positive(&self.target_input) else {
            self.notify(Level::Warning, INVALID_NUMBER);
            return Outcome::Invalid;
        };

        let dispatched = self.api.set_target(target).await;
        match self.reconcile(dispatched).await {
            Ok(()) => {
                self.target_input.clear();
                self.notify(Level::Success, "Target updated");
                Outcome::Applied
            }
            Err(err) => self.fail(&err, "Could not update target"),
        }
    }

    pub async fn undo(&mut self) -> Outcome {
        if !self.can_undo() {
            return Outcome::Disabled;
        }
        if !self.login_prompt.allow(self.session) {
            return Outcome::LoginRequired;
        }

        let dispatched = self.api.undo().await;
        match self.reconcile(dispatched).await {
            Ok(()) => {
                self.notify(Level::Success, "Undo succeeded");
                Outcome::Applied
            }
            Err(err) => self.fail(&err, "Could not undo"),
        }
    }

    pub async fn redo(&mut self) -> Outcome {
        if !self.can_redo() {
            return Outcome::Disabled;
        }
        if !self.login_prompt.allow(self.session) {
            return Outcome::LoginRequired;
        }

        let dispatched = self.api.redo().await;
        match self.reconcile(dispatched).await {
            Ok(()) => {
                self.notify(Level::Success, "Redo succeeded");
                Outcome::Applied
            }
            Err(err) => self.fail(&err, "Could not redo"),
        }
    }

    pub fn request_reset(&mut self) -> Outcome {
        if self.snapshot.is_none() {
            return Outcome::Disabled;
        }
        if !self.login_prompt.allow(self.session) {
            return Outcome::LoginRequired;
        }
        self.reset = ResetState::PendingConfirmation;
        Outcome::AwaitingConfirmation
    }

    pub fn cancel_reset(&mut self) -> Outcome {
        if self.reset != ResetState::PendingConfirmation {
            return Outcome::Disabled;
        }
        self.reset = ResetState::Idle;
        Outcome::Cancelled
    }

    pub async fn confirm_reset(&mut self) -> Outcome {
        if self.reset != ResetState::PendingConfirmation {
            return Outcome::Disabled;
        }
        self.reset = ResetState::Idle;
        if !self.login_prompt.allow(self.session) {
            return Outcome::LoginRequired;
        }

        let dispatched = self.api.reset_system().await;
        match self.reconcile(dispatched).await {
            Ok(()) => {
                self.notify(Level::Success, "Board has been reset");
                Outcome::Applied
            }
            Err(err) => self.fail(&err, "Could not reset board"),
        }
    }

    pub fn open_login(&mut self) {
        self.login_prompt.open();
    }

    pub fn dismiss_login(&mut self) {
        self.login_prompt.close();
    }

    pub async fn login(&mut self, email: &str, password: &str) -> LoginOutcome {
        let outcome = self
            .login_prompt
            .submit(&self.api, &mut self.session, email, password)
            .await;
        match outcome {
            LoginOutcome::LoggedIn => self.notify(Level::Success, "Logged in"),
            LoginOutcome::MissingCredentials => {
                self.notify(Level::Warning, "Please enter email and password")
            }
            LoginOutcome::Rejected => self.notify(Level::Error, "Login failed"),
        }
        outcome
    }

    /// Drops the session locally even when the server call fails.
    pub async fn logout(&mut self) {
        if let Err(err) = self.api.logout().await {
            warn!("logout call failed: {err}");
        }
        self.session = Session::Anonymous;
        self.reset = ResetState::Idle;
        self.notify(Level::Info, "Logged out");
    }

    // The snapshot only ever changes by a full re-fetch after the call succeeds.
    async fn reconcile(&mut self, dispatched: Result<(), ApiError>) -> Result<(), ApiError> {
        dispatched?;
        let snapshot = self.api.fetch_snapshot().await?;
        debug!(
            achieved = snapshot.achieved_leads,
            total_target = snapshot.total_target,
            "snapshot refreshed"
        );
        self.snapshot = Some(snapshot);
        Ok(())
    }

    fn fail(&mut self, err: &ApiError, fallback: &str) -> Outcome {
        warn!("board action failed: {err}");
        let message = err.server_message().unwrap_or(fallback).to_string();
        self.notify(Level::Error, message);
        Outcome::Failed
    }

    fn notify(&mut self, level: Level, message: impl Into<String>) {
        self.signals.push(Signal::Notify(Notice {
            level,
            message: message.into(),
        }));
    }
}

pub fn parse_positive(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok().filter(|value| *value > 0)
}
