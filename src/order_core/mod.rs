//! 주문 처리 (검증, 모의 체결)

pub mod executor;
pub mod validator;

pub use executor::{OrderExecutor, DEFAULT_ORDER_LIMIT};
pub use validator::{BasicOrderValidator, LimitPriceValidator, OrderValidator};
