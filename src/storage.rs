use crate::errors::AppError;
use crate::ledger::LeadLedger;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::error;

pub async fn load_ledger(path: &Path) -> LeadLedger {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(ledger) => ledger,
            Err(err) => {
                error!("failed to parse data file: {err}");
                LeadLedger::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => LeadLedger::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            LeadLedger::default()
        }
    }
}

pub async fn persist_ledger(path: &Path, ledger: &LeadLedger) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(ledger).map_err(AppError::internal)?;
    let staging = staging_path(path);
    fs::write(&staging, payload).await?;
    if let Err(err) = fs::rename(&staging, path).await {
        let _ = fs::remove_file(&staging).await;
        return Err(err.into());
    }
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
