use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::SimError;

type HmacSha256 = Hmac<Sha256>;

/// 세션 토큰 서명기
///
/// 토큰 형식: `{user_id}.{issued_ms}.{hex(hmac_sha256(secret, "{user_id}.{issued_ms}"))}`
pub struct TokenSigner {
    secret: Vec<u8>,
}

impl TokenSigner {
    pub fn new(secret: &str) -> Self {
        TokenSigner {
            secret: secret.as_bytes().to_vec(),
        }
    }

    pub fn issue(&self, user_id: &Uuid, issued_at: DateTime<Utc>) -> Result<String, SimError> {
        let payload = format!("{}.{}", user_id, issued_at.timestamp_millis());
        let signature = self.sign(&payload)?;
        Ok(format!("{}.{}", payload, signature))
    }

    /// 서명 검증 후 사용자 ID 반환
    pub fn verify(&self, token: &str) -> Result<Uuid, SimError> {
        let (payload, signature) = token.rsplit_once('.').ok_or(SimError::NotAuthenticated)?;
        let (user_id, issued_ms) = payload.split_once('.').ok_or(SimError::NotAuthenticated)?;

        if issued_ms.parse::<i64>().is_err() {
            return Err(SimError::NotAuthenticated);
        }

        let signature = hex::decode(signature).map_err(|_| SimError::NotAuthenticated)?;
        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature).map_err(|_| SimError::NotAuthenticated)?;

        Uuid::parse_str(user_id).map_err(|_| SimError::NotAuthenticated)
    }

    fn sign(&self, payload: &str) -> Result<String, SimError> {
        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    fn mac(&self) -> Result<HmacSha256, SimError> {
        HmacSha256::new_from_slice(&self.secret).map_err(|e| SimError::ConfigError(format!("Invalid token secret: {}", e)))
    }
}

/// 비밀번호 다이제스트 (hex SHA-256)
pub fn password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}
