/**
* filename : backend_client
* author : HAMA
* date: 2025. 5. 11.
* description: 사용자/거래 백엔드 서버와 통신하는 클라이언트
**/

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::BackendConfig;
use crate::error::SimError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteUser {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RemoteTransactionType {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RemoteTransactionStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteTransactionCreate {
    pub symbol: String,
    pub quantity: f64,
    pub price_per_unit: f64,
    pub transaction_type: RemoteTransactionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteTransaction {
    pub id: Uuid,
    #[serde(default)]
    pub owner_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub quantity: f64,
    pub price_per_unit: f64,
    pub transaction_type: RemoteTransactionType,
    pub status: RemoteTransactionStatus,
}

/// 백엔드 클라이언트 (Bearer 토큰 인증)
pub struct BackendClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, SimError> {
        let mut builder = Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Check if backend is reachable
    pub async fn health_check(&self) -> Result<bool, SimError> {
        let response = self.client.get(self.url("/api/v1/utils/health-check/")).send().await?;
        Ok(response.status().is_success())
    }

    /// Register a new account on the backend
    pub async fn signup(&self, request: &SignupRequest) -> Result<RemoteUser, SimError> {
        let response = self
            .client
            .post(self.url("/api/v1/users/signup/"))
            .json(request)
            .send()
            .await?;

        parse(response).await
    }

    /// OAuth2 password flow. Stores the token for later calls
    pub async fn login_access_token(&mut self, username: &str, password: &str) -> Result<AccessToken, SimError> {
        let response = self
            .client
            .post(self.url("/api/v1/login/access-token/"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        let token: AccessToken = parse(response).await?;
        self.token = Some(token.access_token.clone());
        log::info!("백엔드 로그인 완료: {}", username);

        Ok(token)
    }

    /// Current user for the stored token
    pub async fn me(&self) -> Result<RemoteUser, SimError> {
        let request = self.authorized(self.client.get(self.url("/api/v1/users/me")))?;
        parse(request.send().await?).await
    }

    pub async fn list_transactions(&self) -> Result<Vec<RemoteTransaction>, SimError> {
        let request = self.authorized(self.client.get(self.url("/api/v1/transactions/")))?;
        parse(request.send().await?).await
    }

    pub async fn get_transaction(&self, id: &Uuid) -> Result<RemoteTransaction, SimError> {
        let request = self.authorized(self.client.get(self.url(&format!("/api/v1/transactions/{}", id))))?;
        parse(request.send().await?).await
    }

    pub async fn create_transaction(&self, transaction: &RemoteTransactionCreate) -> Result<RemoteTransaction, SimError> {
        let request = self.authorized(self.client.post(self.url("/api/v1/transactions/")))?;
        parse(request.json(transaction).send().await?).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, SimError> {
        let token = self.token.as_deref().ok_or(SimError::NotAuthenticated)?;
        Ok(request.bearer_auth(token))
    }
}

/// 2xx 응답은 JSON 역직렬화, 그 외는 `{status} {detail}` 오류
async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, SimError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let detail = error_detail(&body);
        log::warn!("백엔드 오류 응답: {} {}", status.as_u16(), detail);
        return Err(SimError::BackendError(format!("{} {}", status.as_u16(), detail)));
    }

    Ok(response.json::<T>().await?)
}

/// FastAPI 스타일 `{"detail": ...}` 본문에서 메시지 추출
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => match map.get("detail") {
            Some(serde_json::Value::String(detail)) => detail.clone(),
            Some(other) => other.to_string(),
            None => body.to_string(),
        },
        _ => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail() {
        assert_eq!(error_detail(r#"{"detail":"Incorrect email or password"}"#), "Incorrect email or password");
        assert_eq!(error_detail(r#"{"detail":[{"msg":"field required"}]}"#), r#"[{"msg":"field required"}]"#);
        assert_eq!(error_detail("Bad Gateway\n"), "Bad Gateway");
    }

    #[tokio::test]
    async fn test_me_requires_token() {
        let client = BackendClient::new(&BackendConfig::default()).unwrap();
        assert!(matches!(client.me().await, Err(SimError::NotAuthenticated)));
    }
}
