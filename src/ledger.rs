use crate::models::{InputRecord, LeadSnapshot};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LedgerAction {
    AddLeads { value: u64 },
    SetTarget { previous: u64, target: u64 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("value must be a positive integer")]
    InvalidValue,
    #[error("target must be a positive integer")]
    InvalidTarget,
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
}

/// Server-side board state. Serializes with the same field names as
/// [`LeadSnapshot`], so it doubles as the wire response and the data file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadLedger {
    pub total_target: u64,
    pub achieved_leads: u64,
    #[serde(default)]
    pub history_stack: Vec<LedgerAction>,
    #[serde(default)]
    pub redo_stack: Vec<LedgerAction>,
    #[serde(default)]
    pub input_history: Vec<InputRecord>,
}

impl LeadLedger {
    pub fn add_leads(&mut self, value: i64, timestamp: String) -> Result<(), LedgerError> {
        let value = positive(value).ok_or(LedgerError::InvalidValue)?;
        let action = LedgerAction::AddLeads { value };
        self.apply(&action);
        self.input_history.push(InputRecord {
            timestamp,
            value,
            total: self.achieved_leads,
        });
        self.history_stack.push(action);
        self.redo_stack.clear();
        Ok(())
    }

    pub fn set_target(&mut self, target: i64) -> Result<(), LedgerError> {
        let target = positive(target).ok_or(LedgerError::InvalidTarget)?;
        let action = LedgerAction::SetTarget {
            previous: self.total_target,
            target,
        };
        self.apply(&action);
        self.history_stack.push(action);
        self.redo_stack.clear();
        Ok(())
    }

    pub fn undo(&mut self) -> Result<(), LedgerError> {
        let action = self.history_stack.pop().ok_or(LedgerError::NothingToUndo)?;
        self.revert(&action);
        self.redo_stack.push(action);
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), LedgerError> {
        let action = self.redo_stack.pop().ok_or(LedgerError::NothingToRedo)?;
        self.apply(&action);
        self.history_stack.push(action);
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn snapshot(&self) -> LeadSnapshot {
        LeadSnapshot {
            total_target: self.total_target,
            achieved_leads: self.achieved_leads,
            history_stack: self.history_stack.iter().map(action_value).collect(),
            redo_stack: self.redo_stack.iter().map(action_value).collect(),
            input_history: self.input_history.clone(),
        }
    }

    fn apply(&mut self, action: &LedgerAction) {
        match *action {
            LedgerAction::AddLeads { value } => {
                self.achieved_leads = self.achieved_leads.saturating_add(value);
            }
            LedgerAction::SetTarget { target, .. } => self.total_target = target,
        }
    }

    fn revert(&mut self, action: &LedgerAction) {
        match *action {
            LedgerAction::AddLeads { value } => {
                self.achieved_leads = self.achieved_leads.saturating_sub(value);
            }
            LedgerAction::SetTarget { previous, .. } => self.total_target = previous,
        }
    }
}

fn positive(value: i64) -> Option<u64> {
    u64::try_from(value).ok().filter(|value| *value > 0)
}

fn action_value(action: &LedgerAction) -> serde_json::Value {
    serde_json::to_value(action).unwrap_or(serde_json::Value::Null)
}
