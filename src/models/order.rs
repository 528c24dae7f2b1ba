use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::models::transaction::TransactionStatus;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    #[default]
    Market,
    Limit,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Filled,
}

/// 매수/매도 주문 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: String,
    pub quantity: u32,
    #[serde(default)]
    pub order_type: OrderType,
    #[serde(default)]
    pub limit_price: Option<Decimal>,
}

impl OrderRequest {
    pub fn market(symbol: impl Into<String>, quantity: u32) -> Self {
        OrderRequest {
            symbol: symbol.into(),
            quantity,
            order_type: OrderType::Market,
            limit_price: None,
        }
    }

    pub fn limit(symbol: impl Into<String>, quantity: u32, limit_price: Decimal) -> Self {
        OrderRequest {
            symbol: symbol.into(),
            quantity,
            order_type: OrderType::Limit,
            limit_price: Some(limit_price),
        }
    }
}

/// 체결 내역
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub id: Uuid,
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: u32,
    pub price: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
    pub filled_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realized_gain_loss: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub success: bool,
    pub order: OrderConfirmation,
    pub new_balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewRequest {
    pub symbol: String,
    pub quantity: u32,
    pub side: OrderSide,
    #[serde(default)]
    pub order_type: OrderType,
}

/// 주문 전 예상 금액
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPreview {
    pub symbol: String,
    pub stock_name: String,
    pub side: OrderSide,
    pub quantity: u32,
    pub price: Decimal,
    pub estimated_total: Decimal,
    pub commission: Decimal,
    pub order_type: OrderType,
    pub can_execute: bool,
    // 매수 전용
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_cash: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_cash: Option<Decimal>,
    // 매도 전용
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares_owned: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_cost: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_gain_loss: Option<Decimal>,
}

/// 주문 내역 조회 행
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderHistoryEntry {
    pub id: Uuid,
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: u32,
    pub price: Decimal,
    pub total: Decimal,
    pub status: TransactionStatus,
    pub order_type: OrderType,
    pub created_at: DateTime<Utc>,
    pub filled_at: DateTime<Utc>,
}
