//! 관심 종목

pub mod service;

pub use service::WatchlistService;
