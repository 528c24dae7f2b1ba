use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 종목 시세 및 기본 정보
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stock {
    pub id: u32,
    pub symbol: String,
    pub name: String,
    pub price: Decimal,
    pub previous_close: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub volume: u64,
    pub avg_volume: u64,
    pub market_cap: u64,
    pub pe: Decimal,
    pub eps: Decimal,
    pub week52_high: Decimal,
    pub week52_low: Decimal,
    pub sector: String,
    pub industry: String,
    pub description: String,
}

impl Stock {
    pub fn matches_symbol(&self, symbol: &str) -> bool {
        self.symbol.eq_ignore_ascii_case(symbol)
    }

    pub fn summary(&self) -> StockSummary {
        StockSummary {
            symbol: self.symbol.clone(),
            name: self.name.clone(),
            price: self.price,
            change: self.change,
            change_percent: self.change_percent,
            sector: self.sector.clone(),
        }
    }

    pub fn listing(&self) -> StockListing {
        StockListing {
            summary: self.summary(),
            volume: self.volume,
            market_cap: self.market_cap,
        }
    }

    pub fn mover(&self) -> Mover {
        Mover {
            symbol: self.symbol.clone(),
            name: self.name.clone(),
            price: self.price,
            change: self.change,
            change_percent: self.change_percent,
        }
    }
}

/// 검색 결과 행
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockSummary {
    pub symbol: String,
    pub name: String,
    pub price: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
    pub sector: String,
}

/// 전체 종목 목록 행
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockListing {
    #[serde(flatten)]
    pub summary: StockSummary,
    pub volume: u64,
    pub market_cap: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mover {
    pub symbol: String,
    pub name: String,
    pub price: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
}

/// 상승/하락 상위 종목
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopMovers {
    pub gainers: Vec<Mover>,
    pub losers: Vec<Mover>,
}

/// 일봉 데이터
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: u64,
}

/// 조회 기간
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Period {
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "1Y")]
    OneYear,
}

impl Period {
    /// 알 수 없는 기간 문자열은 1M으로 처리
    pub fn parse(value: &str) -> Self {
        match value.to_uppercase().as_str() {
            "1D" => Period::OneDay,
            "1W" => Period::OneWeek,
            "3M" => Period::ThreeMonths,
            "1Y" => Period::OneYear,
            _ => Period::OneMonth,
        }
    }

    pub fn days(&self) -> i64 {
        match self {
            Period::OneDay => 1,
            Period::OneWeek => 7,
            Period::OneMonth => 30,
            Period::ThreeMonths => 90,
            Period::OneYear => 365,
        }
    }
}

impl Default for Period {
    fn default() -> Self {
        Period::OneMonth
    }
}
