/**
* filename : executor
* author : HAMA
* date: 2025. 5. 8.
* description: 모의 주문 체결 (매수/매도/미리보기/주문 내역)
**/

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::TradingConfig;
use crate::error::SimError;
use crate::market_data::provider::{require_quote, QuoteProvider};
use crate::models::order::{
    OrderConfirmation, OrderHistoryEntry, OrderPreview, OrderReceipt, OrderRequest, OrderSide, OrderStatus,
    OrderType, PreviewRequest,
};
use crate::models::position::Position;
use crate::models::stock::Stock;
use crate::models::transaction::{Transaction, TransactionStatus};
use crate::order_core::validator::{BasicOrderValidator, LimitPriceValidator, OrderValidator};
use crate::portfolio::{load_portfolio, save_portfolio};
use crate::storage::SharedStore;
use crate::utils::logging;
use crate::utils::today;

pub const DEFAULT_ORDER_LIMIT: usize = 10;

/// 주문 체결기 - 포트폴리오에 즉시 체결 반영
pub struct OrderExecutor {
    store: SharedStore,
    quotes: Arc<dyn QuoteProvider>,
    validators: Vec<Box<dyn OrderValidator>>,
}

impl OrderExecutor {
    pub fn new(store: SharedStore, quotes: Arc<dyn QuoteProvider>) -> Self {
        OrderExecutor {
            store,
            quotes,
            validators: Vec::new(),
        }
    }

    /// 수량 범위 + 지정가 검증기를 등록한 체결기
    pub fn with_default_validators(store: SharedStore, quotes: Arc<dyn QuoteProvider>, trading: &TradingConfig) -> Self {
        let mut executor = OrderExecutor::new(store, quotes);
        executor.add_validator(Box::new(BasicOrderValidator::new(trading.max_order_quantity)));
        executor.add_validator(Box::new(LimitPriceValidator));
        executor
    }

    /// 주문 검증기 추가
    pub fn add_validator(&mut self, validator: Box<dyn OrderValidator>) {
        self.validators.push(validator);
    }

    /// 매수 주문 실행
    pub async fn execute_buy(&self, user_id: &Uuid, order: OrderRequest) -> Result<OrderReceipt, SimError> {
        let symbol = order.symbol.to_uppercase();
        let result = self.fill_buy(user_id, order).await;
        self.log_result(user_id, OrderSide::Buy, &symbol, &result);
        result
    }

    /// 매도 주문 실행
    pub async fn execute_sell(&self, user_id: &Uuid, order: OrderRequest) -> Result<OrderReceipt, SimError> {
        let symbol = order.symbol.to_uppercase();
        let result = self.fill_sell(user_id, order).await;
        self.log_result(user_id, OrderSide::Sell, &symbol, &result);
        result
    }

    async fn fill_buy(&self, user_id: &Uuid, mut order: OrderRequest) -> Result<OrderReceipt, SimError> {
        let stock = self.checked_quote(OrderSide::Buy, &mut order).await?;
        let price = fill_price(&order, &stock);
        let total = order_total(price, order.quantity)?;

        let mut store = self.store.write().await;
        let mut portfolio = load_portfolio(&*store, user_id).await?;

        if total > portfolio.cash {
            return Err(SimError::InsufficientFunds);
        }

        match portfolio.position_index(&stock.symbol) {
            Some(index) => portfolio.positions[index].add_shares(order.quantity, price)?,
            None => portfolio.positions.push(Position::new(
                stock.symbol.clone(),
                stock.name.clone(),
                order.quantity,
                price,
                today(),
            )),
        }

        let transaction = Transaction::trade(
            OrderSide::Buy,
            stock.symbol.clone(),
            order.quantity,
            price,
            order.order_type,
            Utc::now(),
        );
        portfolio.cash -= total;
        portfolio.record(transaction.clone());
        save_portfolio(&mut *store, &portfolio).await?;

        Ok(OrderReceipt {
            success: true,
            order: confirmation(&transaction, OrderSide::Buy, None),
            new_balance: portfolio.cash,
        })
    }

    async fn fill_sell(&self, user_id: &Uuid, mut order: OrderRequest) -> Result<OrderReceipt, SimError> {
        let stock = self.checked_quote(OrderSide::Sell, &mut order).await?;

        let mut store = self.store.write().await;
        let mut portfolio = load_portfolio(&*store, user_id).await?;

        let index = portfolio
            .position_index(&stock.symbol)
            .ok_or_else(|| SimError::NotFound(format!("No position found for {}", stock.symbol)))?;

        let held = portfolio.positions[index].quantity;
        if order.quantity > held {
            return Err(SimError::InsufficientShares {
                owned: held,
                symbol: stock.symbol.clone(),
            });
        }

        let avg_cost = portfolio.positions[index].avg_cost;
        let price = fill_price(&order, &stock);
        let total = order_total(price, order.quantity)?;
        let new_cash = portfolio.cash.checked_add(total).ok_or_else(order_too_large)?;

        if order.quantity == held {
            portfolio.positions.remove(index);
        } else {
            portfolio.positions[index].remove_shares(order.quantity);
        }

        let transaction = Transaction::trade(
            OrderSide::Sell,
            stock.symbol.clone(),
            order.quantity,
            price,
            order.order_type,
            Utc::now(),
        );
        portfolio.cash = new_cash;
        portfolio.record(transaction.clone());
        save_portfolio(&mut *store, &portfolio).await?;

        let realized = total - avg_cost * Decimal::from(order.quantity);

        Ok(OrderReceipt {
            success: true,
            order: confirmation(&transaction, OrderSide::Sell, Some(realized)),
            new_balance: portfolio.cash,
        })
    }

    /// 주문 전 예상 금액 (항상 현재가 기준)
    pub async fn preview(&self, user_id: &Uuid, request: PreviewRequest) -> Result<OrderPreview, SimError> {
        let stock = require_quote(self.quotes.as_ref(), &request.symbol).await?;
        let portfolio = {
            let store = self.store.read().await;
            load_portfolio(&*store, user_id).await?
        };

        let total = stock.price * Decimal::from(request.quantity);
        let mut preview = OrderPreview {
            symbol: stock.symbol.clone(),
            stock_name: stock.name.clone(),
            side: request.side,
            quantity: request.quantity,
            price: stock.price,
            estimated_total: total,
            commission: Decimal::ZERO,
            order_type: request.order_type,
            can_execute: false,
            available_cash: None,
            remaining_cash: None,
            shares_owned: None,
            avg_cost: None,
            estimated_gain_loss: None,
        };

        match request.side {
            OrderSide::Buy => {
                preview.available_cash = Some(portfolio.cash);
                preview.can_execute = total <= portfolio.cash;
                preview.remaining_cash = Some(portfolio.cash - total);
            }
            OrderSide::Sell => {
                let position = portfolio.position(&stock.symbol);
                preview.shares_owned = Some(position.map(|p| p.quantity).unwrap_or(0));
                preview.can_execute = position.map(|p| request.quantity <= p.quantity).unwrap_or(false);
                preview.avg_cost = position.map(|p| p.avg_cost);
                preview.estimated_gain_loss =
                    position.map(|p| (stock.price - p.avg_cost) * Decimal::from(request.quantity));
            }
        }

        Ok(preview)
    }

    /// 최근 주문 내역 (최신순)
    pub async fn orders(
        &self,
        user_id: &Uuid,
        status: Option<TransactionStatus>,
        limit: usize,
    ) -> Result<Vec<OrderHistoryEntry>, SimError> {
        let portfolio = {
            let store = self.store.read().await;
            load_portfolio(&*store, user_id).await?
        };

        let mut orders: Vec<OrderHistoryEntry> = portfolio
            .transactions
            .iter()
            .rev()
            .filter_map(Transaction::as_order)
            .filter(|o| status.map(|s| o.status == s).unwrap_or(true))
            .collect();

        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders.truncate(limit);

        Ok(orders)
    }

    /// 특정 종목 보유 현황
    pub async fn position_for(&self, user_id: &Uuid, symbol: &str) -> Result<Option<Position>, SimError> {
        let store = self.store.read().await;
        let portfolio = load_portfolio(&*store, user_id).await?;
        Ok(portfolio.position(symbol).cloned())
    }

    async fn checked_quote(&self, side: OrderSide, order: &mut OrderRequest) -> Result<Stock, SimError> {
        order.symbol = order.symbol.trim().to_uppercase();
        let stock = require_quote(self.quotes.as_ref(), &order.symbol).await?;

        for validator in &self.validators {
            validator.validate(side, order, &stock)?;
        }

        Ok(stock)
    }

    fn log_result(&self, user_id: &Uuid, side: OrderSide, symbol: &str, result: &Result<OrderReceipt, SimError>) {
        let user = user_id.to_string();
        match result {
            Ok(receipt) => logging::log_order_filled(
                &user,
                &side.to_string(),
                symbol,
                receipt.order.quantity,
                receipt.order.price,
            ),
            Err(e) => logging::log_order_rejected(&user, &side.to_string(), symbol, e),
        }
    }
}

fn fill_price(order: &OrderRequest, stock: &Stock) -> Decimal {
    match order.order_type {
        OrderType::Market => stock.price,
        OrderType::Limit => order.limit_price.unwrap_or(stock.price),
    }
}

/// 체결 금액 (Decimal 범위를 넘으면 주문 거부)
fn order_total(price: Decimal, quantity: u32) -> Result<Decimal, SimError> {
    price.checked_mul(Decimal::from(quantity)).ok_or_else(order_too_large)
}

fn order_too_large() -> SimError {
    SimError::InvalidParameter("Order total is too large".to_string())
}

fn confirmation(transaction: &Transaction, side: OrderSide, realized_gain_loss: Option<Decimal>) -> OrderConfirmation {
    OrderConfirmation {
        id: transaction.id,
        symbol: transaction.symbol.clone().unwrap_or_default(),
        side,
        quantity: transaction.quantity.unwrap_or(0),
        price: transaction.price.unwrap_or(Decimal::ZERO),
        total: transaction.total,
        status: OrderStatus::Filled,
        filled_at: transaction.date,
        realized_gain_loss,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::catalog::StockCatalog;
    use crate::market_data::provider::MockQuoteProvider;
    use crate::storage::InMemoryStore;
    use rust_decimal_macros::dec;
    use tokio::sync::RwLock;

    fn stock(symbol: &str, price: Decimal) -> Stock {
        let mut stock = StockCatalog::default().quote("AAPL").unwrap();
        stock.symbol = symbol.to_string();
        stock.price = price;
        stock
    }

    fn fixed_price(price: Decimal) -> Arc<dyn QuoteProvider> {
        let mut quotes = MockQuoteProvider::new();
        quotes
            .expect_lookup()
            .returning(move |symbol| Ok(Some(stock(&symbol.to_uppercase(), price))));
        Arc::new(quotes)
    }

    async fn funded_executor(quotes: Arc<dyn QuoteProvider>, cash: Decimal) -> (OrderExecutor, Uuid) {
        let store: SharedStore = Arc::new(RwLock::new(InMemoryStore::new()));
        let user = Uuid::new_v4();

        {
            let mut guard = store.write().await;
            let mut portfolio = load_portfolio(&*guard, &user).await.unwrap();
            portfolio.cash = cash;
            portfolio.record(Transaction::deposit(cash, Utc::now()));
            save_portfolio(&mut *guard, &portfolio).await.unwrap();
        }

        let executor = OrderExecutor::with_default_validators(store, quotes, &TradingConfig::default());
        (executor, user)
    }

    #[tokio::test]
    async fn test_buy_debits_cash_and_opens_position() {
        let (executor, user) = funded_executor(fixed_price(dec!(100)), dec!(1000)).await;

        let receipt = executor.execute_buy(&user, OrderRequest::market("aapl", 4)).await.unwrap();
        assert_eq!(receipt.order.total, dec!(400));
        assert_eq!(receipt.order.symbol, "AAPL");
        assert_eq!(receipt.order.status, OrderStatus::Filled);
        assert_eq!(receipt.new_balance, dec!(600));

        let position = executor.position_for(&user, "AAPL").await.unwrap().unwrap();
        assert_eq!(position.quantity, 4);
        assert_eq!(position.avg_cost, dec!(100));
    }

    #[tokio::test]
    async fn test_successive_buys_average_cost() {
        let mut quotes = MockQuoteProvider::new();
        let mut prices = vec![dec!(100), dec!(200)].into_iter();
        quotes
            .expect_lookup()
            .times(2)
            .returning(move |_| Ok(Some(stock("AAPL", prices.next().unwrap_or(Decimal::ZERO)))));

        let (executor, user) = funded_executor(Arc::new(quotes), dec!(10000)).await;
        executor.execute_buy(&user, OrderRequest::market("AAPL", 10)).await.unwrap();
        executor.execute_buy(&user, OrderRequest::market("AAPL", 10)).await.unwrap();

        let position = executor.position_for(&user, "AAPL").await.unwrap().unwrap();
        assert_eq!(position.quantity, 20);
        assert_eq!(position.avg_cost, dec!(150));
    }

    #[tokio::test]
    async fn test_huge_limit_total_is_rejected() {
        let (executor, user) = funded_executor(fixed_price(dec!(100)), dec!(1000)).await;

        let order = OrderRequest::limit("AAPL", 10, Decimal::from_str_exact("50000000000000000000000000000").unwrap());
        let err = executor.execute_buy(&user, order).await.unwrap_err();
        assert_eq!(err.to_string(), "Order total is too large");

        assert!(executor.position_for(&user, "AAPL").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_buy_over_cash_is_rejected_without_change() {
        let (executor, user) = funded_executor(fixed_price(dec!(100)), dec!(250)).await;

        let err = executor.execute_buy(&user, OrderRequest::market("AAPL", 3)).await.unwrap_err();
        assert!(matches!(err, SimError::InsufficientFunds));
        assert_eq!(err.to_string(), "Insufficient funds");

        assert!(executor.position_for(&user, "AAPL").await.unwrap().is_none());
        assert!(executor.orders(&user, None, DEFAULT_ORDER_LIMIT).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_stock() {
        let mut quotes = MockQuoteProvider::new();
        quotes.expect_lookup().returning(|_| Ok(None));

        let (executor, user) = funded_executor(Arc::new(quotes), dec!(1000)).await;
        let err = executor.execute_buy(&user, OrderRequest::market("NOPE", 1)).await.unwrap_err();
        assert_eq!(err.to_string(), "Stock not found: NOPE");
    }

    #[tokio::test]
    async fn test_sell_errors() {
        let (executor, user) = funded_executor(fixed_price(dec!(50)), dec!(1000)).await;

        let err = executor.execute_sell(&user, OrderRequest::market("AAPL", 1)).await.unwrap_err();
        assert_eq!(err.to_string(), "No position found for AAPL");

        executor.execute_buy(&user, OrderRequest::market("AAPL", 2)).await.unwrap();
        let err = executor.execute_sell(&user, OrderRequest::market("AAPL", 3)).await.unwrap_err();
        assert_eq!(err.to_string(), "Insufficient shares. You own 2 shares of AAPL");
    }

    #[tokio::test]
    async fn test_sell_all_removes_position_and_credits_cash() {
        let mut quotes = MockQuoteProvider::new();
        let mut prices = vec![dec!(100), dec!(120), dec!(130)].into_iter();
        quotes
            .expect_lookup()
            .returning(move |_| Ok(Some(stock("AAPL", prices.next().unwrap_or(dec!(130))))));

        let (executor, user) = funded_executor(Arc::new(quotes), dec!(1000)).await;
        executor.execute_buy(&user, OrderRequest::market("AAPL", 5)).await.unwrap();

        let partial = executor.execute_sell(&user, OrderRequest::market("AAPL", 2)).await.unwrap();
        assert_eq!(partial.order.realized_gain_loss, Some(dec!(40)));
        assert_eq!(partial.new_balance, dec!(740));

        let full = executor.execute_sell(&user, OrderRequest::market("AAPL", 3)).await.unwrap();
        assert_eq!(full.order.realized_gain_loss, Some(dec!(90)));
        assert_eq!(full.new_balance, dec!(1130));
        assert!(executor.position_for(&user, "AAPL").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_limit_order_fills_at_limit_price() {
        let (executor, user) = funded_executor(fixed_price(dec!(100)), dec!(1000)).await;

        let receipt = executor
            .execute_buy(&user, OrderRequest::limit("AAPL", 2, dec!(101)))
            .await
            .unwrap();
        assert_eq!(receipt.order.price, dec!(101));

        let orders = executor.orders(&user, None, DEFAULT_ORDER_LIMIT).await.unwrap();
        assert_eq!(orders[0].order_type, OrderType::Limit);

        let err = executor
            .execute_buy(&user, OrderRequest::limit("AAPL", 2, dec!(99)))
            .await
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn test_preview() {
        let (executor, user) = funded_executor(fixed_price(dec!(100)), dec!(250)).await;
        executor.execute_buy(&user, OrderRequest::market("AAPL", 2)).await.unwrap();

        let buy = executor
            .preview(&user, PreviewRequest {
                symbol: "AAPL".to_string(),
                quantity: 1,
                side: OrderSide::Buy,
                order_type: OrderType::Market,
            })
            .await
            .unwrap();
        assert_eq!(buy.available_cash, Some(dec!(50)));
        assert!(!buy.can_execute);
        assert_eq!(buy.remaining_cash, Some(dec!(-50)));
        assert_eq!(buy.commission, Decimal::ZERO);

        let sell = executor
            .preview(&user, PreviewRequest {
                symbol: "AAPL".to_string(),
                quantity: 2,
                side: OrderSide::Sell,
                order_type: OrderType::Market,
            })
            .await
            .unwrap();
        assert!(sell.can_execute);
        assert_eq!(sell.shares_owned, Some(2));
        assert_eq!(sell.estimated_gain_loss, Some(Decimal::ZERO));
    }

    #[tokio::test]
    async fn test_orders_newest_first_and_limited() {
        let (executor, user) = funded_executor(fixed_price(dec!(10)), dec!(1000)).await;
        for _ in 0..3 {
            executor.execute_buy(&user, OrderRequest::market("AAPL", 1)).await.unwrap();
        }
        executor.execute_sell(&user, OrderRequest::market("AAPL", 1)).await.unwrap();

        let orders = executor.orders(&user, None, 2).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].side, OrderSide::Sell);

        let failed = executor
            .orders(&user, Some(TransactionStatus::Failed), DEFAULT_ORDER_LIMIT)
            .await
            .unwrap();
        assert!(failed.is_empty());
    }
}
