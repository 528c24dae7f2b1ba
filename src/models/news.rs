use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsItem {
    pub id: u32,
    pub headline: String,
    pub summary: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
    pub symbols: Vec<String>,
    pub category: String,
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsView {
    #[serde(flatten)]
    pub item: NewsItem,
    pub relative_time: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsQuery {
    pub symbol: Option<String>,
    pub category: Option<String>,
    pub limit: Option<usize>,
}
