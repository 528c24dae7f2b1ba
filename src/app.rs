/**
* filename : app
* author : HAMA
* date: 2025. 5. 12.
* description: 서비스 조립 (저장소, 시세, 포트폴리오, 주문, 관심 종목, 알림, 계정)
**/

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::accounts::AuthService;
use crate::alerts::AlertService;
use crate::config::Config;
use crate::error::SimError;
use crate::market_data::{CatalogQuoteProvider, NewsFeed, QuoteProvider, StockCatalog};
use crate::order_core::OrderExecutor;
use crate::portfolio::PortfolioService;
use crate::storage::{self, InMemoryStore, SharedStore};
use crate::watchlist::WatchlistService;

/// HTTP 핸들러가 공유하는 애플리케이션 상태
pub struct AppContext {
    pub config: Config,
    pub catalog: StockCatalog,
    pub news: NewsFeed,
    pub store: SharedStore,
    pub quotes: Arc<dyn QuoteProvider>,
    pub portfolios: Arc<PortfolioService>,
    pub orders: OrderExecutor,
    pub watchlist: WatchlistService,
    pub alerts: AlertService,
    pub auth: AuthService,
}

impl AppContext {
    /// 설정의 저장소 백엔드로 상태 생성
    pub fn from_config(config: Config) -> Result<Self, SimError> {
        let store = storage::open(&config.storage)?;
        Ok(Self::with_store(config, store))
    }

    /// 메모리 저장소 기반 상태 (테스트, 데모용)
    pub fn in_memory(config: Config) -> Self {
        let store: SharedStore = Arc::new(RwLock::new(InMemoryStore::new()));
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: SharedStore) -> Self {
        let catalog = StockCatalog::default();
        let quotes: Arc<dyn QuoteProvider> = Arc::new(CatalogQuoteProvider::new(catalog.clone()));

        let portfolios = Arc::new(PortfolioService::new(store.clone(), quotes.clone(), &config.trading));
        let orders = OrderExecutor::with_default_validators(store.clone(), quotes.clone(), &config.trading);
        let watchlist = WatchlistService::new(store.clone(), quotes.clone());
        let alerts = AlertService::new(store.clone(), quotes.clone());
        let auth = AuthService::new(store.clone(), portfolios.clone(), &config.auth);

        AppContext {
            news: NewsFeed::mock(Utc::now()),
            catalog,
            store,
            quotes,
            portfolios,
            orders,
            watchlist,
            alerts,
            auth,
            config,
        }
    }
}
