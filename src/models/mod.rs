//! 도메인 모델

pub mod alert;
pub mod market;
pub mod news;
pub mod order;
pub mod portfolio;
pub mod position;
pub mod stock;
pub mod transaction;
pub mod user;
pub mod watchlist;
