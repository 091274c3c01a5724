use crate::auth::SessionStore;
use crate::config::Account;
use crate::ledger::LeadLedger;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub ledger: Arc<Mutex<LeadLedger>>,
    pub sessions: Arc<Mutex<SessionStore>>,
    pub account: Option<Arc<Account>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, ledger: LeadLedger, account: Option<Account>) -> Self {
        Self {
            data_path,
            ledger: Arc::new(Mutex::new(ledger)),
            sessions: Arc::new(Mutex::new(SessionStore::default())),
            account: account.map(Arc::new),
        }
    }
}
