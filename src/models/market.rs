use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionState {
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MarketEvent {
    Open,
    Close,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradingHours {
    pub open: String,
    pub close: String,
}

/// 장 운영 상태
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketStatus {
    pub is_open: bool,
    pub status: SessionState,
    pub exchange: String,
    pub timezone: String,
    pub current_time: DateTime<Utc>,
    pub next_event: MarketEvent,
    pub minutes_until_next_event: i64,
    pub time_until_next_event: String,
    pub trading_hours: TradingHours,
    pub is_weekend: bool,
    pub message: String,
}
