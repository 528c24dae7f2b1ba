use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::position::Position;
use crate::models::transaction::{Transaction, TransactionType};

/// 사용자별 포트폴리오 (현금, 보유 종목, 거래 원장)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    pub user_id: Uuid,
    pub cash: Decimal,
    pub initial_deposit: Decimal,
    pub positions: Vec<Position>,
    pub transactions: Vec<Transaction>,
}

impl Portfolio {
    pub fn empty(user_id: Uuid) -> Self {
        Portfolio {
            user_id,
            cash: Decimal::ZERO,
            initial_deposit: Decimal::ZERO,
            positions: Vec::new(),
            transactions: Vec::new(),
        }
    }

    pub fn position_index(&self, symbol: &str) -> Option<usize> {
        self.positions
            .iter()
            .position(|p| p.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.position_index(symbol).map(|i| &self.positions[i])
    }

    /// 거래 기록 추가 후 입금 총액 재계산
    pub fn record(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
        self.recompute_initial_deposit();
    }

    pub fn recompute_initial_deposit(&mut self) {
        self.initial_deposit = self
            .transactions
            .iter()
            .filter(|t| t.transaction_type == TransactionType::Deposit)
            .map(|t| t.total)
            .sum();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_value: Decimal,
    pub cash: Decimal,
    pub invested_value: Decimal,
    pub cost_basis: Decimal,
    pub total_gain_loss: Decimal,
    pub total_gain_loss_percent: Decimal,
    pub overall_return: Decimal,
    pub overall_return_percent: Decimal,
    pub position_count: usize,
    pub today_change: Decimal,
}

/// 자산 배분 기준
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllocationBasis {
    #[default]
    Sector,
    Ticker,
}

impl AllocationBasis {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("ticker") => AllocationBasis::Ticker,
            _ => AllocationBasis::Sector,
        }
    }
}

/// 자산 배분 조각 (섹터 또는 종목 단위)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AllocationSlice {
    pub name: String,
    pub value: Decimal,
    pub percent: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformancePoint {
    pub date: NaiveDate,
    pub label: String,
    pub value: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletBalance {
    pub cash: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositReceipt {
    pub success: bool,
    pub transaction: Transaction,
    pub new_balance: Decimal,
}
