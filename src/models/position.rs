use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SimError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub id: Uuid,
    pub symbol: String,
    pub name: String,
    pub quantity: u32,
    pub avg_cost: Decimal,
    pub purchase_date: NaiveDate,
}

impl Position {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        quantity: u32,
        avg_cost: Decimal,
        purchase_date: NaiveDate,
    ) -> Self {
        Position {
            id: Uuid::new_v4(),
            symbol: symbol.into(),
            name: name.into(),
            quantity,
            avg_cost,
            purchase_date,
        }
    }

    /// 추가 매수 반영 - 가중 평균 단가 재계산
    pub fn add_shares(&mut self, quantity: u32, price: Decimal) -> Result<(), SimError> {
        let new_quantity = self
            .quantity
            .checked_add(quantity)
            .ok_or_else(|| SimError::InvalidParameter(format!("Position in {} is too large", self.symbol)))?;

        let avg_cost = self
            .avg_cost
            .checked_mul(Decimal::from(self.quantity))
            .zip(price.checked_mul(Decimal::from(quantity)))
            .and_then(|(held, added)| held.checked_add(added))
            .and_then(|cost| cost.checked_div(Decimal::from(new_quantity)))
            .ok_or_else(|| SimError::InvalidParameter(format!("Position in {} is too large", self.symbol)))?;

        self.avg_cost = avg_cost;
        self.quantity = new_quantity;
        Ok(())
    }

    /// 일부 매도 반영 - 평균 단가는 유지
    pub fn remove_shares(&mut self, quantity: u32) {
        self.quantity = self.quantity.saturating_sub(quantity);
    }

    pub fn cost_basis(&self) -> Decimal {
        self.avg_cost * Decimal::from(self.quantity)
    }

    pub fn market_value(&self, price: Decimal) -> Decimal {
        price * Decimal::from(self.quantity)
    }

    pub fn unrealized_pnl(&self, price: Decimal) -> Decimal {
        self.market_value(price) - self.cost_basis()
    }
}

/// 현재가 기준 평가 정보
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PositionValuation {
    pub current_price: Decimal,
    pub market_value: Decimal,
    pub cost_basis: Decimal,
    pub gain_loss: Decimal,
    pub gain_loss_percent: Decimal,
    pub day_change: Decimal,
    pub sector: String,
}

/// 평가 정보가 붙은 보유 종목. 시세가 없는 종목은 평가 정보 없이 그대로 노출
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedPosition {
    #[serde(flatten)]
    pub position: Position,
    #[serde(flatten)]
    pub valuation: Option<PositionValuation>,
}
