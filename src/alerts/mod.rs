//! 가격 알림

pub mod service;

pub use service::AlertService;
