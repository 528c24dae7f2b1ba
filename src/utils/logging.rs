//! 로깅 유틸리티
//!
//! 로그 초기화 및 유틸리티 함수 제공

use env_logger::Builder;
use log::LevelFilter;
use rust_decimal::Decimal;
use std::env;

use crate::error::SimError;

/// 로깅 시스템 초기화
///
/// RUST_LOG 환경변수가 있으면 우선하고, 없으면 설정 파일의 레벨을 사용
pub fn init(default_level: &str) -> Result<(), SimError> {
    let mut builder = Builder::from_default_env();

    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());

    builder
      .filter_level(parse_level(&log_level))
      .format_timestamp_millis()
      .try_init()
      .map_err(|e| SimError::ConfigError(format!("Failed to initialize logger: {}", e)))?;

    log::info!("로깅 시스템 초기화 완료: 레벨 = {}", log_level);

    Ok(())
}

fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// 주문 체결 로그
pub fn log_order_filled(user_id: &str, side: &str, symbol: &str, quantity: u32, price: Decimal) {
    log::info!("주문 체결: 사용자 {} - {} {} - 수량: {} - 가격: {}",
               user_id, side, symbol, quantity, price);
}

/// 주문 거부 로그
pub fn log_order_rejected(user_id: &str, side: &str, symbol: &str, reason: &SimError) {
    log::warn!("주문 거부: 사용자 {} - {} {} - 사유: {}", user_id, side, symbol, reason);
}

/// 입금 로그
pub fn log_deposit(user_id: &str, amount: Decimal, new_balance: Decimal) {
    log::info!("입금 완료: 사용자 {} - 금액: {} - 잔고: {}", user_id, amount, new_balance);
}

/// 가격 알림 발동 로그
pub fn log_alert_triggered(symbol: &str, target_price: Decimal, current_price: Decimal) {
    log::info!("가격 알림 발동: {} - 목표가: {} - 현재가: {}", symbol, target_price, current_price);
}

/// 오류 로그
pub fn log_error(context: &str, error: &SimError) {
    log::error!("오류 발생 - {}: {}", context, error);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("verbose"), LevelFilter::Info);
    }
}
