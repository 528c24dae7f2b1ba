use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::SimError;
use crate::market_data::provider::{require_quote, QuoteProvider};
use crate::models::alert::{AlertView, NewAlert, PriceAlert};
use crate::models::stock::Stock;
use crate::storage::{self, keys, KeyValueStore, SharedStore};
use crate::utils::logging;
use crate::utils::math::percent_of;

/// 가격 알림 서비스 (사용자별)
pub struct AlertService {
    store: SharedStore,
    quotes: Arc<dyn QuoteProvider>,
}

impl AlertService {
    pub fn new(store: SharedStore, quotes: Arc<dyn QuoteProvider>) -> Self {
        AlertService { store, quotes }
    }

    /// 시세와 발동 여부가 붙은 알림 목록. 시세가 없는 종목은 제외
    pub async fn list(&self, user_id: &Uuid) -> Result<Vec<AlertView>, SimError> {
        let alerts = self.read(user_id).await?;

        let mut views = Vec::with_capacity(alerts.len());
        for alert in alerts {
            if let Some(stock) = self.quotes.lookup(&alert.symbol).await? {
                views.push(detailed_view(alert, &stock));
            }
        }

        Ok(views)
    }

    pub async fn create(&self, user_id: &Uuid, request: NewAlert) -> Result<AlertView, SimError> {
        let stock = require_quote(self.quotes.as_ref(), &request.symbol).await?;

        if request.target_price <= Decimal::ZERO {
            return Err(SimError::InvalidParameter("Target price must be positive".to_string()));
        }

        let mut store = self.store.write().await;
        let mut alerts = load_alerts(&*store, user_id).await?;

        let duplicate = alerts.iter().any(|a| {
            a.symbol == stock.symbol && a.target_price == request.target_price && a.direction == request.direction
        });
        if duplicate {
            return Err(SimError::Duplicate("A similar alert already exists".to_string()));
        }

        let alert = PriceAlert {
            id: Uuid::new_v4(),
            symbol: stock.symbol.clone(),
            target_price: request.target_price,
            direction: request.direction,
            note: request.note,
            created_at: Utc::now(),
            is_active: true,
        };
        alerts.push(alert.clone());
        save_alerts(&mut *store, user_id, &alerts).await?;

        log::debug!("가격 알림 생성: 사용자 {} - {} {:?} {}", user_id, alert.symbol, alert.direction, alert.target_price);

        Ok(AlertView {
            is_triggered: alert.is_triggered(stock.price),
            stock_name: Some(stock.name.clone()),
            current_price: stock.price,
            difference: None,
            difference_percent: None,
            alert,
        })
    }

    pub async fn delete(&self, user_id: &Uuid, alert_id: &Uuid) -> Result<(), SimError> {
        let mut store = self.store.write().await;
        let mut alerts = load_alerts(&*store, user_id).await?;

        let index = alerts
            .iter()
            .position(|a| a.id == *alert_id)
            .ok_or_else(|| SimError::NotFound("Alert not found".to_string()))?;
        alerts.remove(index);
        save_alerts(&mut *store, user_id, &alerts).await
    }

    /// 종목별 알림. 시세가 없으면 현재가 0, 미발동
    pub async fn for_symbol(&self, user_id: &Uuid, symbol: &str) -> Result<Vec<AlertView>, SimError> {
        let alerts = self.read(user_id).await?;
        let stock = self.quotes.lookup(symbol).await?;

        Ok(alerts
            .into_iter()
            .filter(|a| a.symbol.eq_ignore_ascii_case(symbol))
            .map(|alert| {
                let current_price = stock.as_ref().map(|s| s.price).unwrap_or(Decimal::ZERO);
                let is_triggered = stock.as_ref().map(|s| alert.is_triggered(s.price)).unwrap_or(false);
                AlertView {
                    alert,
                    stock_name: None,
                    current_price,
                    is_triggered,
                    difference: None,
                    difference_percent: None,
                }
            })
            .collect())
    }

    /// 조건을 만족한 활성 알림
    pub async fn triggered(&self, user_id: &Uuid) -> Result<Vec<AlertView>, SimError> {
        let triggered: Vec<AlertView> = self
            .list(user_id)
            .await?
            .into_iter()
            .filter(|view| view.alert.is_active && view.is_triggered)
            .collect();

        for view in &triggered {
            logging::log_alert_triggered(&view.alert.symbol, view.alert.target_price, view.current_price);
        }

        Ok(triggered)
    }

    async fn read(&self, user_id: &Uuid) -> Result<Vec<PriceAlert>, SimError> {
        let store = self.store.read().await;
        load_alerts(&*store, user_id).await
    }
}

fn detailed_view(alert: PriceAlert, stock: &Stock) -> AlertView {
    let difference = alert.target_price - stock.price;

    AlertView {
        is_triggered: alert.is_triggered(stock.price),
        stock_name: Some(stock.name.clone()),
        current_price: stock.price,
        difference: Some(difference),
        difference_percent: Some(percent_of(difference, stock.price)),
        alert,
    }
}

async fn load_alerts(store: &dyn KeyValueStore, user_id: &Uuid) -> Result<Vec<PriceAlert>, SimError> {
    Ok(storage::load(store, &keys::alerts(user_id)).await?.unwrap_or_default())
}

async fn save_alerts(store: &mut dyn KeyValueStore, user_id: &Uuid, alerts: &[PriceAlert]) -> Result<(), SimError> {
    storage::save(store, &keys::alerts(user_id), &alerts).await
}
