//! 모의 뉴스 피드

use chrono::{DateTime, Duration, Utc};

use crate::models::news::{NewsItem, NewsView, Sentiment};
use crate::utils::relative_time;

pub const DEFAULT_NEWS_LIMIT: usize = 10;
pub const DEFAULT_STOCK_NEWS_LIMIT: usize = 5;

/// (헤드라인, 요약, 출처, 경과 분, 관련 심볼, 카테고리, 심리)
type NewsSeed = (&'static str, &'static str, &'static str, i64, &'static [&'static str], &'static str, Sentiment);

const HOUR: i64 = 60;
const DAY: i64 = 24 * 60;

const NEWS_SEEDS: &[NewsSeed] = &[
    ("Tech Stocks Rally as AI Optimism Continues",
     "Major technology companies saw significant gains today as investors remain bullish on artificial intelligence developments.",
     "Market Watch", 2 * HOUR, &["AAPL", "GOOGL", "MSFT", "NVDA"], "Technology", Sentiment::Bullish),
    ("Federal Reserve Signals Potential Rate Changes",
     "The Federal Reserve hinted at possible interest rate adjustments in upcoming meetings, causing market volatility.",
     "Reuters", 4 * HOUR, &["JPM", "V"], "Economy", Sentiment::Neutral),
    ("Electric Vehicle Sales Surge in Q4",
     "Tesla and other EV makers report record deliveries as consumer demand for electric vehicles continues to grow.",
     "Bloomberg", 6 * HOUR, &["TSLA"], "Automotive", Sentiment::Bullish),
    ("Meta Faces Regulatory Scrutiny in Europe",
     "European regulators announce new investigation into Meta's data practices, shares dip in pre-market trading.",
     "Financial Times", 8 * HOUR, &["META"], "Technology", Sentiment::Bearish),
    ("Amazon Expands Same-Day Delivery Network",
     "Amazon announces plans to open 50 new distribution centers, aiming to reach 90% of US population with same-day delivery.",
     "CNBC", 12 * HOUR, &["AMZN"], "Retail", Sentiment::Bullish),
    ("Apple Announces New Product Event",
     "Apple sends invites for spring product event, rumored to unveil new MacBook lineup and mixed reality headset updates.",
     "TechCrunch", DAY, &["AAPL"], "Technology", Sentiment::Bullish),
    ("Healthcare Stocks Under Pressure",
     "Healthcare sector faces headwinds as Congress debates drug pricing reforms.",
     "Wall Street Journal", DAY + DAY / 2, &["JNJ"], "Healthcare", Sentiment::Bearish),
    ("NVIDIA Reports Record Data Center Revenue",
     "NVIDIA's data center segment posts 200% year-over-year growth driven by AI chip demand.",
     "Reuters", 2 * DAY, &["NVDA"], "Technology", Sentiment::Bullish),
    ("Walmart Partners with Tech Startup for Automation",
     "Retail giant announces strategic partnership to automate warehouse operations using robotics.",
     "Business Insider", 2 * DAY + DAY / 2, &["WMT"], "Retail", Sentiment::Bullish),
    ("Market Volatility Expected Ahead of Earnings Season",
     "Analysts warn of increased market volatility as major companies prepare to report quarterly results.",
     "MarketWatch", 3 * DAY, &[], "Markets", Sentiment::Neutral),
];

/// 뉴스 피드
#[derive(Debug, Clone)]
pub struct NewsFeed {
    items: Vec<NewsItem>,
}

impl NewsFeed {
    pub fn new(items: Vec<NewsItem>) -> Self {
        NewsFeed { items }
    }

    /// 기준 시각에 상대적인 게시 시각으로 모의 뉴스 생성
    pub fn mock(now: DateTime<Utc>) -> Self {
        let items = NEWS_SEEDS
            .iter()
            .enumerate()
            .map(|(i, (headline, summary, source, age_minutes, symbols, category, sentiment))| NewsItem {
                id: i as u32 + 1,
                headline: headline.to_string(),
                summary: summary.to_string(),
                source: source.to_string(),
                published_at: now - Duration::minutes(*age_minutes),
                symbols: symbols.iter().map(|s| s.to_string()).collect(),
                category: category.to_string(),
                sentiment: *sentiment,
            })
            .collect();

        NewsFeed::new(items)
    }

    /// 심볼/카테고리 필터, 최신순 정렬 후 limit개 반환
    pub fn query(
        &self,
        symbol: Option<&str>,
        category: Option<&str>,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Vec<NewsView> {
        let mut items: Vec<&NewsItem> = self
            .items
            .iter()
            .filter(|item| match symbol {
                Some(symbol) => item.symbols.iter().any(|s| s.eq_ignore_ascii_case(symbol)),
                None => true,
            })
            .filter(|item| match category {
                Some(category) => item.category == category,
                None => true,
            })
            .collect();

        items.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        items
            .into_iter()
            .take(limit)
            .map(|item| NewsView {
                item: item.clone(),
                relative_time: relative_time(item.published_at, now),
            })
            .collect()
    }

    pub fn stock_news(&self, symbol: &str, limit: usize, now: DateTime<Utc>) -> Vec<NewsView> {
        self.query(Some(symbol), None, limit, now)
    }

    pub fn market_news(&self, limit: usize, now: DateTime<Utc>) -> Vec<NewsView> {
        self.query(None, None, limit, now)
    }
}
