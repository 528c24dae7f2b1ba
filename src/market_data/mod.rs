//! 시장 데이터 (종목 카탈로그, 시세 제공자, 장 상태, 뉴스)

pub mod catalog;
pub mod news;
pub mod provider;
pub mod status;

pub use catalog::StockCatalog;
pub use news::NewsFeed;
pub use provider::{require_quote, CatalogQuoteProvider, QuoteProvider};
pub use status::market_status;
