//! 모의 종목 데이터베이스
//!
//! 정적 시세 테이블 조회, 검색, 상승/하락 상위 종목, 일봉 생성

use chrono::{Duration, NaiveDate};
use lazy_static::lazy_static;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::SimError;
use crate::models::stock::{Period, PriceBar, Stock, StockListing, StockSummary, TopMovers};
use crate::utils::math::money_from_f64;

const MOVERS_PER_SIDE: usize = 3;

#[allow(clippy::too_many_arguments)]
fn stock(
    id: u32,
    symbol: &str,
    name: &str,
    prices: [Decimal; 7],
    volumes: [u64; 3],
    ratios: [Decimal; 4],
    sector: &str,
    industry: &str,
    description: &str,
) -> Stock {
    let [price, previous_close, change, change_percent, open, high, low] = prices;
    let [volume, avg_volume, market_cap] = volumes;
    let [pe, eps, week52_high, week52_low] = ratios;

    Stock {
        id,
        symbol: symbol.to_string(),
        name: name.to_string(),
        price,
        previous_close,
        change,
        change_percent,
        open,
        high,
        low,
        volume,
        avg_volume,
        market_cap,
        pe,
        eps,
        week52_high,
        week52_low,
        sector: sector.to_string(),
        industry: industry.to_string(),
        description: description.to_string(),
    }
}

lazy_static! {
    static ref MOCK_STOCKS: Vec<Stock> = vec![
        stock(1, "AAPL", "Apple Inc.",
              [dec!(175.43), dec!(173.09), dec!(2.34), dec!(1.35), dec!(173.50), dec!(176.20), dec!(172.80)],
              [45_678_900, 52_000_000, 2_750_000_000_000],
              [dec!(28.5), dec!(6.15), dec!(199.62), dec!(143.90)],
              "Technology", "Consumer Electronics",
              "Apple Inc. designs, manufactures, and markets smartphones, personal computers, tablets, wearables, and accessories worldwide."),
        stock(2, "GOOGL", "Alphabet Inc.",
              [dec!(142.56), dec!(143.79), dec!(-1.23), dec!(-0.86), dec!(143.00), dec!(144.50), dec!(141.80)],
              [23_456_700, 28_000_000, 1_800_000_000_000],
              [dec!(25.2), dec!(5.66), dec!(153.78), dec!(102.21)],
              "Technology", "Internet Content & Information",
              "Alphabet Inc. offers various products and platforms in the United States, Europe, the Middle East, Africa, the Asia-Pacific, Canada, and Latin America."),
        stock(3, "MSFT", "Microsoft Corporation",
              [dec!(378.85), dec!(374.73), dec!(4.12), dec!(1.10), dec!(375.00), dec!(380.50), dec!(374.00)],
              [34_567_800, 30_000_000, 2_800_000_000_000],
              [dec!(35.8), dec!(10.58), dec!(384.30), dec!(275.37)],
              "Technology", "Software—Infrastructure",
              "Microsoft Corporation develops, licenses, and supports software, services, devices, and solutions worldwide."),
        stock(4, "AMZN", "Amazon.com Inc.",
              [dec!(155.23), dec!(156.10), dec!(-0.87), dec!(-0.56), dec!(155.50), dec!(157.20), dec!(154.00)],
              [45_678_900, 48_000_000, 1_600_000_000_000],
              [dec!(78.5), dec!(1.98), dec!(161.73), dec!(101.15)],
              "Consumer Discretionary", "Internet Retail",
              "Amazon.com, Inc. engages in the retail sale of consumer products and subscriptions through online and physical stores."),
        stock(5, "TSLA", "Tesla Inc.",
              [dec!(248.42), dec!(236.08), dec!(12.34), dec!(5.22), dec!(238.00), dec!(252.00), dec!(236.50)],
              [78_901_200, 95_000_000, 780_000_000_000],
              [dec!(65.3), dec!(3.80), dec!(299.29), dec!(138.80)],
              "Automotive", "Auto Manufacturers",
              "Tesla, Inc. designs, develops, manufactures, leases, and sells electric vehicles, and energy generation and storage systems."),
        stock(6, "NVDA", "NVIDIA Corporation",
              [dec!(875.23), dec!(851.78), dec!(23.45), dec!(2.76), dec!(855.00), dec!(880.00), dec!(850.00)],
              [56_789_000, 42_000_000, 2_200_000_000_000],
              [dec!(68.9), dec!(12.71), dec!(974.00), dec!(222.97)],
              "Technology", "Semiconductors",
              "NVIDIA Corporation provides graphics, compute and networking solutions in the United States, Taiwan, China, and internationally."),
        stock(7, "META", "Meta Platforms Inc.",
              [dec!(485.67), dec!(494.57), dec!(-8.90), dec!(-1.80), dec!(492.00), dec!(496.50), dec!(483.00)],
              [34_567_800, 18_000_000, 1_200_000_000_000],
              [dec!(32.4), dec!(14.99), dec!(531.49), dec!(274.38)],
              "Technology", "Internet Content & Information",
              "Meta Platforms, Inc. engages in the development of products that enable people to connect and share with friends and family."),
        stock(8, "JPM", "JPMorgan Chase & Co.",
              [dec!(178.34), dec!(177.11), dec!(1.23), dec!(0.69), dec!(177.50), dec!(179.50), dec!(176.80)],
              [23_456_700, 12_000_000, 520_000_000_000],
              [dec!(11.2), dec!(15.92), dec!(200.94), dec!(135.19)],
              "Financial Services", "Banks—Diversified",
              "JPMorgan Chase & Co. operates as a financial services company worldwide."),
        stock(9, "V", "Visa Inc.",
              [dec!(267.89), dec!(265.45), dec!(2.44), dec!(0.92), dec!(266.00), dec!(269.00), dec!(265.00)],
              [8_765_400, 7_500_000, 550_000_000_000],
              [dec!(29.8), dec!(8.99), dec!(290.96), dec!(227.79)],
              "Financial Services", "Credit Services",
              "Visa Inc. operates as a payments technology company worldwide."),
        stock(10, "JNJ", "Johnson & Johnson",
              [dec!(156.78), dec!(158.23), dec!(-1.45), dec!(-0.92), dec!(157.50), dec!(158.80), dec!(155.90)],
              [12_345_600, 8_500_000, 380_000_000_000],
              [dec!(15.6), dec!(10.05), dec!(175.97), dec!(143.13)],
              "Healthcare", "Drug Manufacturers—General",
              "Johnson & Johnson researches, develops, manufactures, and sells various products in the healthcare field worldwide."),
        stock(11, "WMT", "Walmart Inc.",
              [dec!(162.45), dec!(160.89), dec!(1.56), dec!(0.97), dec!(161.00), dec!(163.50), dec!(160.50)],
              [9_876_500, 7_800_000, 440_000_000_000],
              [dec!(28.9), dec!(5.62), dec!(169.94), dec!(143.40)],
              "Consumer Defensive", "Discount Stores",
              "Walmart Inc. engages in the operation of retail, wholesale, and other units worldwide."),
        stock(12, "DIS", "The Walt Disney Company",
              [dec!(98.34), dec!(99.87), dec!(-1.53), dec!(-1.53), dec!(99.50), dec!(100.20), dec!(97.80)],
              [15_678_900, 12_000_000, 180_000_000_000],
              [dec!(45.2), dec!(2.17), dec!(123.74), dec!(78.73)],
              "Communication Services", "Entertainment",
              "The Walt Disney Company operates as an entertainment company worldwide."),
    ];
}

/// 종목 카탈로그
#[derive(Debug, Clone)]
pub struct StockCatalog {
    stocks: Vec<Stock>,
}

impl StockCatalog {
    pub fn new(stocks: Vec<Stock>) -> Self {
        StockCatalog { stocks }
    }

    /// 심볼로 종목 찾기 (대소문자 무시)
    pub fn find(&self, symbol: &str) -> Option<&Stock> {
        self.stocks.iter().find(|s| s.matches_symbol(symbol))
    }

    pub fn quote(&self, symbol: &str) -> Result<Stock, SimError> {
        self.find(symbol)
            .cloned()
            .ok_or_else(|| SimError::StockNotFound(symbol.to_string()))
    }

    /// 심볼 또는 종목명 부분 일치 검색
    pub fn search(&self, query: &str) -> Vec<StockSummary> {
        if query.is_empty() {
            return Vec::new();
        }

        let needle = query.to_lowercase();
        self.stocks
            .iter()
            .filter(|s| s.symbol.to_lowercase().contains(&needle) || s.name.to_lowercase().contains(&needle))
            .map(Stock::summary)
            .collect()
    }

    pub fn all(&self) -> Vec<StockListing> {
        self.stocks.iter().map(Stock::listing).collect()
    }

    /// 등락률 기준 상승 상위 3개, 하락 상위 3개
    pub fn top_movers(&self) -> TopMovers {
        let mut sorted: Vec<&Stock> = self.stocks.iter().collect();
        sorted.sort_by(|a, b| b.change_percent.cmp(&a.change_percent));

        let gainers = sorted.iter().take(MOVERS_PER_SIDE).map(|s| s.mover()).collect();
        let losers = sorted.iter().rev().take(MOVERS_PER_SIDE).map(|s| s.mover()).collect();

        TopMovers { gainers, losers }
    }

    /// 기간별 일봉 생성 (랜덤 워크, 마지막 종가는 현재가)
    pub fn history(&self, symbol: &str, period: Period, today: NaiveDate) -> Vec<PriceBar> {
        let stock = match self.find(symbol) {
            Some(stock) => stock,
            None => return Vec::new(),
        };

        let mut rng = rand::thread_rng();
        let base = stock.price.to_f64().unwrap_or(0.0);
        let floor = base * 0.7;
        let mut price = base;
        let days = period.days();
        let mut bars = Vec::with_capacity(days as usize + 1);

        for i in (0..=days).rev() {
            let step = (rng.gen::<f64>() - 0.5) * base * 0.03;
            price = f64::max(price + step, floor);

            bars.push(PriceBar {
                date: today - Duration::days(i),
                open: money_from_f64(price - rng.gen::<f64>() * 2.0),
                high: money_from_f64(price + rng.gen::<f64>() * 3.0),
                low: money_from_f64(price - rng.gen::<f64>() * 3.0),
                close: money_from_f64(price),
                volume: (stock.avg_volume as f64 * (0.8 + rng.gen::<f64>() * 0.4)) as u64,
            });
        }

        if let Some(last) = bars.last_mut() {
            last.close = stock.price;
        }

        bars
    }
}

impl Default for StockCatalog {
    fn default() -> Self {
        StockCatalog::new(MOCK_STOCKS.clone())
    }
}
