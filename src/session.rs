use crate::client::AuthApi;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Pending,
    Authenticated,
    Anonymous,
}

impl Session {
    pub fn is_authenticated(self) -> bool {
        self == Self::Authenticated
    }
}

/// Single refresh attempt. Any failure counts as anonymous; there is no retry.
pub async fn resolve<A: AuthApi>(api: &A) -> Session {
    match api.refresh().await {
        Ok(()) => {
            info!("session restored");
            Session::Authenticated
        }
        Err(err) => {
            debug!("session refresh failed: {err}");
            Session::Anonymous
        }
    }
}
