//! 포트폴리오 (지갑, 평가, 거래 내역, 성과, 자산 배분)

pub mod performance;
pub mod service;
pub mod valuation;

use uuid::Uuid;

use crate::error::SimError;
use crate::models::portfolio::Portfolio;
use crate::storage::{self, keys, KeyValueStore};

pub use service::PortfolioService;

/// 저장된 포트폴리오 조회. 없으면 빈 포트폴리오
pub async fn load_portfolio(store: &dyn KeyValueStore, user_id: &Uuid) -> Result<Portfolio, SimError> {
    let portfolio = storage::load(store, &keys::portfolio(user_id)).await?;
    Ok(portfolio.unwrap_or_else(|| Portfolio::empty(*user_id)))
}

pub async fn save_portfolio(store: &mut dyn KeyValueStore, portfolio: &Portfolio) -> Result<(), SimError> {
    storage::save(store, &keys::portfolio(&portfolio.user_id), portfolio).await
}
