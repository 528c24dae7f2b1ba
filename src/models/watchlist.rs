use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::alert::AlertDirection;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistItem {
    pub id: Uuid,
    pub symbol: String,
    pub added_at: DateTime<Utc>,
    pub has_alert: bool,
    pub alert_price: Option<Decimal>,
    pub alert_direction: Option<AlertDirection>,
}

impl WatchlistItem {
    pub fn new(symbol: impl Into<String>, added_at: DateTime<Utc>) -> Self {
        WatchlistItem {
            id: Uuid::new_v4(),
            symbol: symbol.into(),
            added_at,
            has_alert: false,
            alert_price: None,
            alert_direction: None,
        }
    }
}

/// 관심 종목 변경 요청 (지정된 필드만 반영)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatchlistUpdate {
    pub has_alert: Option<bool>,
    pub alert_price: Option<Decimal>,
    pub alert_direction: Option<AlertDirection>,
}

impl WatchlistUpdate {
    pub fn apply(&self, item: &mut WatchlistItem) {
        if let Some(has_alert) = self.has_alert {
            item.has_alert = has_alert;
            if !has_alert {
                item.alert_price = None;
                item.alert_direction = None;
            }
        }
        if self.alert_price.is_some() {
            item.alert_price = self.alert_price;
        }
        if self.alert_direction.is_some() {
            item.alert_direction = self.alert_direction;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddWatchlistRequest {
    pub symbol: String,
}

/// 시세가 붙은 관심 종목
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistEntry {
    #[serde(flatten)]
    pub item: WatchlistItem,
    pub name: String,
    pub price: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
}
