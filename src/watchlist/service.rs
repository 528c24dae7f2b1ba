use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::SimError;
use crate::market_data::provider::{require_quote, QuoteProvider};
use crate::models::stock::Stock;
use crate::models::watchlist::{WatchlistEntry, WatchlistItem, WatchlistUpdate};
use crate::storage::{self, keys, KeyValueStore, SharedStore};

const ALREADY_WATCHED: &str = "Stock is already in your watchlist";
const NOT_WATCHED: &str = "Stock is not in your watchlist";

/// 관심 종목 서비스 (사용자별)
pub struct WatchlistService {
    store: SharedStore,
    quotes: Arc<dyn QuoteProvider>,
}

impl WatchlistService {
    pub fn new(store: SharedStore, quotes: Arc<dyn QuoteProvider>) -> Self {
        WatchlistService { store, quotes }
    }

    /// 시세가 붙은 관심 종목 목록. 시세가 없는 종목은 제외
    pub async fn list(&self, user_id: &Uuid) -> Result<Vec<WatchlistEntry>, SimError> {
        let items = {
            let store = self.store.read().await;
            load_items(&*store, user_id).await?
        };

        let mut entries = Vec::with_capacity(items.len());
        for item in items {
            if let Some(stock) = self.quotes.lookup(&item.symbol).await? {
                entries.push(entry(item, &stock));
            }
        }

        Ok(entries)
    }

    pub async fn add(&self, user_id: &Uuid, symbol: &str) -> Result<WatchlistEntry, SimError> {
        let mut store = self.store.write().await;
        let mut items = load_items(&*store, user_id).await?;

        if position_of(&items, symbol).is_some() {
            return Err(SimError::Duplicate(ALREADY_WATCHED.to_string()));
        }

        let stock = require_quote(self.quotes.as_ref(), symbol).await?;
        let item = WatchlistItem::new(stock.symbol.clone(), Utc::now());
        items.push(item.clone());
        save_items(&mut *store, user_id, &items).await?;

        log::debug!("관심 종목 추가: 사용자 {} - {}", user_id, stock.symbol);
        Ok(entry(item, &stock))
    }

    /// 관심 종목 삭제. 삭제된 심볼 반환
    pub async fn remove(&self, user_id: &Uuid, symbol: &str) -> Result<String, SimError> {
        let mut store = self.store.write().await;
        let mut items = load_items(&*store, user_id).await?;

        let index = position_of(&items, symbol).ok_or_else(|| SimError::NotFound(NOT_WATCHED.to_string()))?;
        let removed = items.remove(index);
        save_items(&mut *store, user_id, &items).await?;

        Ok(removed.symbol)
    }

    pub async fn contains(&self, user_id: &Uuid, symbol: &str) -> Result<bool, SimError> {
        let store = self.store.read().await;
        let items = load_items(&*store, user_id).await?;
        Ok(position_of(&items, symbol).is_some())
    }

    /// 알림 설정 등 일부 필드 변경
    pub async fn update(&self, user_id: &Uuid, symbol: &str, updates: WatchlistUpdate) -> Result<WatchlistItem, SimError> {
        let mut store = self.store.write().await;
        let mut items = load_items(&*store, user_id).await?;

        let index = position_of(&items, symbol).ok_or_else(|| SimError::NotFound(NOT_WATCHED.to_string()))?;
        updates.apply(&mut items[index]);
        let updated = items[index].clone();
        save_items(&mut *store, user_id, &items).await?;

        Ok(updated)
    }
}

fn position_of(items: &[WatchlistItem], symbol: &str) -> Option<usize> {
    items.iter().position(|item| item.symbol.eq_ignore_ascii_case(symbol))
}

fn entry(item: WatchlistItem, stock: &Stock) -> WatchlistEntry {
    WatchlistEntry {
        item,
        name: stock.name.clone(),
        price: stock.price,
        change: stock.change,
        change_percent: stock.change_percent,
    }
}

async fn load_items(store: &dyn KeyValueStore, user_id: &Uuid) -> Result<Vec<WatchlistItem>, SimError> {
    Ok(storage::load(store, &keys::watchlist(user_id)).await?.unwrap_or_default())
}

async fn save_items(store: &mut dyn KeyValueStore, user_id: &Uuid, items: &[WatchlistItem]) -> Result<(), SimError> {
    storage::save(store, &keys::watchlist(user_id), &items).await
}
