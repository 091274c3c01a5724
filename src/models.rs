use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    pub timestamp: String,
    pub value: u64,
    pub total: u64,
}

/// The stacks are kept opaque on the client; only their emptiness matters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSnapshot {
    pub total_target: u64,
    pub achieved_leads: u64,
    #[serde(default)]
    pub history_stack: Vec<Value>,
    #[serde(default)]
    pub redo_stack: Vec<Value>,
    #[serde(default)]
    pub input_history: Vec<InputRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddLeadRequest {
    pub value: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetRequest {
    pub new_target: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
