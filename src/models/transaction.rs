use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::order::{OrderHistoryEntry, OrderSide, OrderType};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Buy,
    Sell,
    Deposit,
}

impl From<OrderSide> for TransactionType {
    fn from(side: OrderSide) -> Self {
        match side {
            OrderSide::Buy => TransactionType::Buy,
            OrderSide::Sell => TransactionType::Sell,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

/// 거래 원장 레코드 (추가 전용)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub symbol: Option<String>,
    pub quantity: Option<u32>,
    pub price: Option<Decimal>,
    pub total: Decimal,
    pub date: DateTime<Utc>,
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_type: Option<OrderType>,
}

impl Transaction {
    pub fn deposit(amount: Decimal, date: DateTime<Utc>) -> Self {
        Transaction {
            id: Uuid::new_v4(),
            transaction_type: TransactionType::Deposit,
            symbol: None,
            quantity: None,
            price: None,
            total: amount,
            date,
            status: TransactionStatus::Completed,
            order_type: None,
        }
    }

    pub fn trade(
        side: OrderSide,
        symbol: impl Into<String>,
        quantity: u32,
        price: Decimal,
        order_type: OrderType,
        date: DateTime<Utc>,
    ) -> Self {
        Transaction {
            id: Uuid::new_v4(),
            transaction_type: side.into(),
            symbol: Some(symbol.into()),
            quantity: Some(quantity),
            price: Some(price),
            total: price * Decimal::from(quantity),
            date,
            status: TransactionStatus::Completed,
            order_type: Some(order_type),
        }
    }

    pub fn side(&self) -> Option<OrderSide> {
        match self.transaction_type {
            TransactionType::Buy => Some(OrderSide::Buy),
            TransactionType::Sell => Some(OrderSide::Sell),
            TransactionType::Deposit => None,
        }
    }

    /// 매수/매도 거래만 주문 내역으로 변환
    pub fn as_order(&self) -> Option<OrderHistoryEntry> {
        let side = self.side()?;
        Some(OrderHistoryEntry {
            id: self.id,
            symbol: self.symbol.clone().unwrap_or_default(),
            side,
            quantity: self.quantity.unwrap_or(0),
            price: self.price.unwrap_or(Decimal::ZERO),
            total: self.total,
            status: self.status,
            order_type: self.order_type.unwrap_or_default(),
            created_at: self.date,
            filled_at: self.date,
        })
    }
}

/// 거래 내역 필터
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionFilter {
    #[default]
    All,
    Only(TransactionType),
}

impl TransactionFilter {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.to_uppercase()).as_deref() {
            Some("BUY") => TransactionFilter::Only(TransactionType::Buy),
            Some("SELL") => TransactionFilter::Only(TransactionType::Sell),
            Some("DEPOSIT") => TransactionFilter::Only(TransactionType::Deposit),
            _ => TransactionFilter::All,
        }
    }

    pub fn accepts(&self, tx: &Transaction) -> bool {
        match self {
            TransactionFilter::All => true,
            TransactionFilter::Only(kind) => tx.transaction_type == *kind,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_trade_total() {
        let tx = Transaction::trade(OrderSide::Buy, "AAPL", 4, dec!(175.43), OrderType::Market, Utc::now());
        assert_eq!(tx.total, dec!(701.72));
        assert_eq!(tx.transaction_type, TransactionType::Buy);
    }

    #[test]
    fn test_deposit_is_not_an_order() {
        let tx = Transaction::deposit(dec!(500), Utc::now());
        assert!(tx.as_order().is_none());
    }

    #[test]
    fn test_type_serialized_as_type_key() {
        let tx = Transaction::deposit(dec!(10), Utc::now());
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["type"], "DEPOSIT");
        assert_eq!(value["status"], "COMPLETED");
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!(TransactionFilter::parse(Some("sell")), TransactionFilter::Only(TransactionType::Sell));
        assert_eq!(TransactionFilter::parse(Some("ALL")), TransactionFilter::All);
        assert_eq!(TransactionFilter::parse(None), TransactionFilter::All);
    }
}
