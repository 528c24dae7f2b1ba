//! 모의 주식 거래 시뮬레이터 라이브러리
//!
//! 가상 현금 입금, 모의 시세 기반 매수/매도, 포트폴리오 평가,
//! 관심 종목과 가격 알림을 REST API로 제공합니다.

pub mod accounts;
pub mod alerts;
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod export;
pub mod market_data;
pub mod models;
pub mod order_core;
pub mod portfolio;
pub mod remote;
pub mod storage;
pub mod utils;
pub mod watchlist;

// 핵심 타입 재노출
pub use crate::app::AppContext;
pub use crate::error::SimError;
pub use crate::market_data::QuoteProvider;
pub use crate::models::order::{OrderRequest, OrderSide, OrderType};
pub use crate::models::portfolio::Portfolio;
pub use crate::models::position::Position;
pub use crate::models::stock::Stock;
pub use crate::storage::{KeyValueStore, SharedStore};

/// 버전 정보
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 결과 타입 별칭
pub type Result<T> = std::result::Result<T, SimError>;
