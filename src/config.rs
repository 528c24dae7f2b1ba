/**
* filename : config
* author : HAMA
* date: 2025. 5. 8.
* description: 설정 로드 (기본값 -> 설정 파일 -> 환경 변수)
**/

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::env;

use crate::error::SimError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub trading: TradingConfig,
    pub auth: AuthConfig,
    pub backend: BackendConfig,
    pub logging: LoggingConfig,
    /// 모의 네트워크 지연 (밀리초)
    pub simulated_latency_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TradingConfig {
    pub max_deposit: Decimal,
    pub max_order_quantity: u32,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub token_secret: String,
    /// 등록되지 않은 이메일로 로그인하면 데모 계정을 자동 생성
    pub demo_auto_register: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    /// 설정 로드
    ///
    /// `STOCKSIM_CONFIG` (기본 `config`) 파일이 있으면 읽고,
    /// `STOCKSIM__SERVER__PORT` 같은 환경 변수로 덮어쓴다.
    pub fn load() -> Result<Self, SimError> {
        let path = env::var("STOCKSIM_CONFIG").unwrap_or_else(|_| "config".to_string());
        Self::load_from(&path)
    }

    pub fn load_from(path: &str) -> Result<Self, SimError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(path).required(false))
            .add_source(
                ::config::Environment::with_prefix("STOCKSIM")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Config = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), SimError> {
        if self.trading.max_deposit <= Decimal::ZERO {
            return Err(SimError::ConfigError("trading.max_deposit must be positive".to_string()));
        }
        if self.trading.max_order_quantity == 0 {
            return Err(SimError::ConfigError("trading.max_order_quantity must be positive".to_string()));
        }
        if self.auth.token_secret.is_empty() {
            return Err(SimError::ConfigError("auth.token_secret must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            trading: TradingConfig::default(),
            auth: AuthConfig::default(),
            backend: BackendConfig::default(),
            logging: LoggingConfig::default(),
            simulated_latency_ms: 0,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3030,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            backend: StorageBackend::Memory,
            data_dir: "./data".to_string(),
        }
    }
}

impl Default for TradingConfig {
    fn default() -> Self {
        TradingConfig {
            max_deposit: dec!(1000000),
            max_order_quantity: 1_000_000,
            currency: "USD".to_string(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            token_secret: "dev-secret-key".to_string(),
            demo_auto_register: true,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_ms: Some(5000),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
        }
    }
}
