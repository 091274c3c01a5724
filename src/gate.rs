use crate::client::AuthApi;
use crate::session::Session;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoginPrompt {
    open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    LoggedIn,
    MissingCredentials,
    Rejected,
}

impl LoginPrompt {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Lets the action through when authenticated, otherwise opens the prompt.
    /// The blocked action is not remembered.
    pub fn allow(&mut self, session: Session) -> bool {
        if session.is_authenticated() {
            return true;
        }
        self.open();
        false
    }

    pub async fn submit<A: AuthApi>(
        &mut self,
        api: &A,
        session: &mut Session,
        email: &str,
        password: &str,
    ) -> LoginOutcome {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return LoginOutcome::MissingCredentials;
        }

        match api.login(email, password).await {
            Ok(()) => {
                info!(email, "logged in");
                *session = Session::Authenticated;
                self.close();
                LoginOutcome::LoggedIn
            }
            Err(err) => {
                warn!("login failed: {err}");
                LoginOutcome::Rejected
            }
        }
    }
}
