pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod controller;
pub mod errors;
pub mod gate;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod progress;
pub mod session;
pub mod shell;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use client::{AuthApi, HttpLeadClient, LeadApi};
pub use config::ServerConfig;
pub use controller::LeadBoard;
pub use state::AppState;
pub use storage::load_ledger;
