//! 장 운영 시간 계산
//!
//! NYSE 정규장 09:30-16:00 (미 동부), 평일만 운영. 동부 시간은 UTC-5 고정
//! (서머타임, 휴장일 미반영)

use chrono::{DateTime, Datelike, Duration, Timelike, Utc, Weekday};

use crate::models::market::{MarketEvent, MarketStatus, SessionState, TradingHours};
use crate::utils::format_minutes;

const ET_OFFSET_HOURS: i64 = -5;
const MARKET_OPEN_MINUTES: i64 = 9 * 60 + 30;
const MARKET_CLOSE_MINUTES: i64 = 16 * 60;
const MINUTES_PER_DAY: i64 = 24 * 60;

/// 주어진 시각 기준 장 상태 계산
pub fn market_status(now: DateTime<Utc>) -> MarketStatus {
    let eastern = now + Duration::hours(ET_OFFSET_HOURS);
    let weekday = eastern.weekday();
    let is_weekend = matches!(weekday, Weekday::Sat | Weekday::Sun);

    let current_minutes = eastern.hour() as i64 * 60 + eastern.minute() as i64;
    let in_session = current_minutes >= MARKET_OPEN_MINUTES && current_minutes < MARKET_CLOSE_MINUTES;
    let is_open = !is_weekend && in_session;

    let (next_event, minutes_until) = if is_open {
        (MarketEvent::Close, MARKET_CLOSE_MINUTES - current_minutes)
    } else if is_weekend {
        let days_until_monday = if weekday == Weekday::Sun { 1 } else { 2 };
        (MarketEvent::Open, days_until_monday * MINUTES_PER_DAY + (MARKET_OPEN_MINUTES - current_minutes))
    } else if current_minutes < MARKET_OPEN_MINUTES {
        (MarketEvent::Open, MARKET_OPEN_MINUTES - current_minutes)
    } else {
        // 금요일 장 마감 후 다음 개장은 월요일
        let days_until_open = if weekday == Weekday::Fri { 3 } else { 1 };
        (
            MarketEvent::Open,
            days_until_open * MINUTES_PER_DAY - current_minutes + MARKET_OPEN_MINUTES,
        )
    };

    let until = format_minutes(minutes_until);
    let message = if is_open {
        format!("Market closes in {}", until)
    } else if is_weekend {
        "Market closed for the weekend".to_string()
    } else {
        format!("Market opens in {}", until)
    };

    MarketStatus {
        is_open,
        status: if is_open { SessionState::Open } else { SessionState::Closed },
        exchange: "NYSE".to_string(),
        timezone: "America/New_York".to_string(),
        current_time: now,
        next_event,
        minutes_until_next_event: minutes_until,
        time_until_next_event: until,
        trading_hours: TradingHours {
            open: "9:30 AM ET".to_string(),
            close: "4:00 PM ET".to_string(),
        },
        is_weekend,
        message,
    }
}
