//! 수학 관련 유틸리티
//!
//! 비율, 페이지 계산 함수 제공

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

/// 백분율 계산. 분모가 0이면 0
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
  if whole.is_zero() {
    return Decimal::ZERO;
  }

  part / whole * Decimal::ONE_HUNDRED
}

/// 변화율 계산 (기준값 대비 %)
pub fn percent_change(from: Decimal, to: Decimal) -> Decimal {
  percent_of(to - from, from)
}

/// 부동소수 금액을 소수점 둘째 자리 Decimal로 변환
pub fn money_from_f64(value: f64) -> Decimal {
  Decimal::from_f64(value).unwrap_or(Decimal::ZERO).round_dp(2)
}

/// 달러 표기 (예: "$1,000,000", "$2,500.50")
pub fn format_dollars(amount: Decimal) -> String {
  let rounded = amount.round_dp(2);
  let whole = rounded.trunc().abs().to_string();
  let fraction = (rounded.fract().abs() * Decimal::ONE_HUNDRED).trunc();

  let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
  for (i, c) in whole.chars().enumerate() {
    if i > 0 && (whole.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(c);
  }

  let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
  if fraction.is_zero() {
    format!("{}${}", sign, grouped)
  } else {
    format!("{}${}.{:0>2}", sign, grouped, fraction.to_string())
  }
}

/// 올림 나눗셈 (총 페이지 수 계산용)
pub fn ceil_div(total: usize, size: usize) -> usize {
  if size == 0 || total == 0 {
    return 0;
  }

  (total - 1) / size + 1
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn test_percent_of() {
    assert_eq!(percent_of(dec!(25), dec!(200)), dec!(12.5));
    assert_eq!(percent_of(dec!(25), Decimal::ZERO), Decimal::ZERO);
  }

  #[test]
  fn test_percent_change() {
    assert_eq!(percent_change(dec!(200), dec!(250)), dec!(25));
    assert_eq!(percent_change(dec!(200), dec!(150)), dec!(-25));
  }

  #[test]
  fn test_money_from_f64() {
    assert_eq!(money_from_f64(12.3456), dec!(12.35));
    assert_eq!(money_from_f64(f64::NAN), Decimal::ZERO);
  }

  #[test]
  fn test_format_dollars() {
    assert_eq!(format_dollars(dec!(1000000)), "$1,000,000");
    assert_eq!(format_dollars(dec!(2500.5)), "$2,500.50");
    assert_eq!(format_dollars(dec!(999)), "$999");
    assert_eq!(format_dollars(dec!(-1234.05)), "-$1,234.05");
  }

  #[test]
  fn test_ceil_div() {
    assert_eq!(ceil_div(0, 10), 0);
    assert_eq!(ceil_div(10, 10), 1);
    assert_eq!(ceil_div(11, 10), 2);
    assert_eq!(ceil_div(5, 0), 0);
  }
}
