//! 시간 관련 유틸리티
//!
//! 날짜 라벨, 상대 시간 포맷팅 함수 제공

pub mod logging;
pub mod math;

use chrono::{DateTime, NaiveDate, Utc};

/// 오늘 날짜 (UTC)
pub fn today() -> NaiveDate {
  Utc::now().date_naive()
}

/// 차트용 짧은 날짜 라벨 (예: "Oct 15")
pub fn short_date_label(date: NaiveDate) -> String {
  date.format("%b %-d").to_string()
}

/// 게시 시각을 "5m ago" 형태로 변환
pub fn relative_time(published_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
  let diff = now - published_at;
  let minutes = diff.num_minutes();
  let hours = diff.num_hours();
  let days = diff.num_days();

  if minutes < 60 {
    format!("{}m ago", minutes)
  } else if hours < 24 {
    format!("{}h ago", hours)
  } else if days < 7 {
    format!("{}d ago", days)
  } else {
    short_date_label(published_at.date_naive())
  }
}

/// 분 단위 남은 시간을 "45m", "2h 5m", "1d 3h" 형태로 변환
pub fn format_minutes(minutes: i64) -> String {
  if minutes < 60 {
    return format!("{}m", minutes);
  }

  let hours = minutes / 60;
  let mins = minutes % 60;
  if hours < 24 {
    return format!("{}h {}m", hours, mins);
  }

  format!("{}d {}h", hours / 24, hours % 24)
}
