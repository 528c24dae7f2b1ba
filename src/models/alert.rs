use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertDirection {
    Above,
    Below,
}

impl AlertDirection {
    /// 현재가가 목표가를 넘었는지(또는 밑돌았는지) 판정
    pub fn is_met(&self, current_price: Decimal, target_price: Decimal) -> bool {
        match self {
            AlertDirection::Above => current_price >= target_price,
            AlertDirection::Below => current_price <= target_price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceAlert {
    pub id: Uuid,
    pub symbol: String,
    pub target_price: Decimal,
    pub direction: AlertDirection,
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

impl PriceAlert {
    pub fn is_triggered(&self, current_price: Decimal) -> bool {
        self.direction.is_met(current_price, self.target_price)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAlert {
    pub symbol: String,
    pub target_price: Decimal,
    pub direction: AlertDirection,
    #[serde(default)]
    pub note: String,
}

/// 시세 정보가 붙은 알림
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertView {
    #[serde(flatten)]
    pub alert: PriceAlert,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_name: Option<String>,
    pub current_price: Decimal,
    pub is_triggered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difference: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difference_percent: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_direction_boundaries() {
        assert!(AlertDirection::Above.is_met(dec!(100), dec!(100)));
        assert!(!AlertDirection::Above.is_met(dec!(99.99), dec!(100)));
        assert!(AlertDirection::Below.is_met(dec!(100), dec!(100)));
        assert!(!AlertDirection::Below.is_met(dec!(100.01), dec!(100)));
    }
}
