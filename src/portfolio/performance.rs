//! 포트폴리오 성과 추이 (모의)

use chrono::{Duration, NaiveDate};
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::portfolio::PerformancePoint;
use crate::models::stock::Period;
use crate::utils::math::money_from_f64;
use crate::utils::short_date_label;

const MARKET_OPEN_HOUR: i64 = 9;
const SESSION_HOURS: i64 = 7;
const VARIANCE_RATIO: f64 = 0.02;

/// 기간별 평가액 시계열 생성
///
/// 입금 내역이 없으면 0으로 고정된 선을 만든다. 그 외에는 입금 총액에서 현재 평가액까지
/// 선형으로 증가시키고 현재 평가액 기준 ±1% 잡음을 더한다. 마지막 점은 항상 현재 평가액이다.
pub fn performance_series<R: Rng>(
    initial_deposit: Decimal,
    current_value: Decimal,
    period: Period,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<PerformancePoint> {
    let days = period.days();
    let base = initial_deposit.to_f64().unwrap_or(0.0);
    let current = current_value.to_f64().unwrap_or(0.0);
    let flat = initial_deposit.is_zero();

    let mut points: Vec<PerformancePoint> = (0..=days)
        .rev()
        .map(|i| {
            let date = today - Duration::days(i);
            let value = if flat {
                Decimal::ZERO
            } else {
                let progress = 1.0 - i as f64 / days as f64;
                let variance = (rng.gen::<f64>() - 0.5) * current * VARIANCE_RATIO;
                money_from_f64(f64::max(base + (current - base) * progress + variance, 0.0))
            };

            PerformancePoint {
                date,
                label: point_label(period, i, days, date),
                value,
            }
        })
        .collect();

    if !flat {
        if let Some(last) = points.last_mut() {
            last.value = current_value;
        }
    }

    points
}

fn point_label(period: Period, days_ago: i64, days: i64, date: NaiveDate) -> String {
    match period {
        Period::OneDay => {
            let hour = MARKET_OPEN_HOUR + days_ago * SESSION_HOURS / days;
            let minute = if days_ago % 2 == 0 { "00" } else { "30" };
            format!("{}:{}", hour, minute)
        }
        _ => short_date_label(date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 10).unwrap()
    }

    #[rstest]
    #[case(Period::OneDay, 2)]
    #[case(Period::OneWeek, 8)]
    #[case(Period::OneMonth, 31)]
    #[case(Period::OneYear, 366)]
    fn test_point_count_and_last_value(#[case] period: Period, #[case] expected: usize) {
        let mut rng = StdRng::seed_from_u64(7);
        let points = performance_series(dec!(10000), dec!(12500.55), period, today(), &mut rng);

        assert_eq!(points.len(), expected);
        assert_eq!(points.last().unwrap().value, dec!(12500.55));
        assert_eq!(points.last().unwrap().date, today());
        assert!(points.iter().all(|p| p.value >= Decimal::ZERO));
    }

    #[test]
    fn test_no_deposits_is_flat_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        let points = performance_series(Decimal::ZERO, Decimal::ZERO, Period::OneWeek, today(), &mut rng);

        assert!(points.iter().all(|p| p.value.is_zero()));
        assert_eq!(points[0].label, "Dec 3");
        assert_eq!(points[7].label, "Dec 10");
    }

    #[test]
    fn test_intraday_labels() {
        let mut rng = StdRng::seed_from_u64(1);
        let points = performance_series(dec!(100), dec!(100), Period::OneDay, today(), &mut rng);

        let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["16:30", "9:00"]);
    }
}
