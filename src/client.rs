use crate::errors::ApiError;
use crate::models::{AddLeadRequest, ErrorBody, LeadSnapshot, LoginRequest, TargetRequest};
use reqwest::{Client, RequestBuilder};
use std::future::Future;
use tracing::debug;

pub trait LeadApi: Send + Sync {
    fn fetch_snapshot(&self) -> impl Future<Output = Result<LeadSnapshot, ApiError>> + Send;
    fn add_lead(&self, value: i64) -> impl Future<Output = Result<(), ApiError>> + Send;
    fn set_target(&self, new_target: i64) -> impl Future<Output = Result<(), ApiError>> + Send;
    fn undo(&self) -> impl Future<Output = Result<(), ApiError>> + Send;
    fn redo(&self) -> impl Future<Output = Result<(), ApiError>> + Send;
    fn reset_system(&self) -> impl Future<Output = Result<(), ApiError>> + Send;
}

pub trait AuthApi: Send + Sync {
    fn login(&self, email: &str, password: &str) -> impl Future<Output = Result<(), ApiError>> + Send;
    fn logout(&self) -> impl Future<Output = Result<(), ApiError>> + Send;
    fn refresh(&self) -> impl Future<Output = Result<(), ApiError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpLeadClient {
    http: Client,
    base_url: String,
}

impl HttpLeadClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        debug!(url = %response.url(), %status, "api response");
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .map(|body| body.error)
            .filter(|message| !message.is_empty());
        Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

impl LeadApi for HttpLeadClient {
    async fn fetch_snapshot(&self) -> Result<LeadSnapshot, ApiError> {
        let response = self.send(self.http.get(self.url("/leads"))).await?;
        Ok(response.json().await?)
    }

    async fn add_lead(&self, value: i64) -> Result<(), ApiError> {
        let request = self.http.post(self.url("/leads/add")).json(&AddLeadRequest { value });
        self.send(request).await.map(drop)
    }

    async fn set_target(&self, new_target: i64) -> Result<(), ApiError> {
        let request = self
            .http
            .put(self.url("/leads/target"))
            .json(&TargetRequest { new_target });
        self.send(request).await.map(drop)
    }

    async fn undo(&self) -> Result<(), ApiError> {
        self.send(self.http.post(self.url("/leads/undo"))).await.map(drop)
    }

    async fn redo(&self) -> Result<(), ApiError> {
        self.send(self.http.post(self.url("/leads/redo"))).await.map(drop)
    }

    async fn reset_system(&self) -> Result<(), ApiError> {
        self.send(self.http.post(self.url("/leads/reset"))).await.map(drop)
    }
}

impl AuthApi for HttpLeadClient {
    async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let request = self.http.post(self.url("/auth/login")).json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        });
        self.send(request).await.map(drop)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.send(self.http.post(self.url("/auth/logout"))).await.map(drop)
    }

    async fn refresh(&self) -> Result<(), ApiError> {
        self.send(self.http.post(self.url("/auth/refresh"))).await.map(drop)
    }
}
