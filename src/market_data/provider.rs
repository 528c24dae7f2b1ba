use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::SimError;
use crate::market_data::catalog::StockCatalog;
use crate::models::stock::Stock;

/// 시세 제공자 인터페이스
///
/// 주문 체결, 포트폴리오 평가, 관심 종목, 가격 알림이 모두 이 경로로 현재가를 조회한다.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// 심볼로 종목 시세 조회. 없는 종목은 None
    async fn lookup(&self, symbol: &str) -> Result<Option<Stock>, SimError>;
}

/// 시세 조회 - 없는 종목이면 StockNotFound
pub async fn require_quote(provider: &dyn QuoteProvider, symbol: &str) -> Result<Stock, SimError> {
    provider
        .lookup(symbol)
        .await?
        .ok_or_else(|| SimError::StockNotFound(symbol.to_string()))
}

/// 정적 카탈로그 기반 시세 제공자
pub struct CatalogQuoteProvider {
    catalog: StockCatalog,
}

impl CatalogQuoteProvider {
    pub fn new(catalog: StockCatalog) -> Self {
        CatalogQuoteProvider { catalog }
    }
}

#[async_trait]
impl QuoteProvider for CatalogQuoteProvider {
    async fn lookup(&self, symbol: &str) -> Result<Option<Stock>, SimError> {
        Ok(self.catalog.find(symbol).cloned())
    }
}
