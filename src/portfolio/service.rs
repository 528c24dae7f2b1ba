/**
* filename : service
* author : HAMA
* date: 2025. 5. 8.
* description: 지갑 입금, 포트폴리오 조회 서비스
**/

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::config::TradingConfig;
use crate::error::SimError;
use crate::market_data::provider::QuoteProvider;
use crate::models::order::{OrderSide, OrderType};
use crate::models::portfolio::{
    AllocationBasis, AllocationSlice, DepositReceipt, PerformancePoint, Portfolio, PortfolioSummary, WalletBalance,
};
use crate::models::position::{EnrichedPosition, Position};
use crate::models::stock::Period;
use crate::models::transaction::{Transaction, TransactionFilter, TransactionPage};
use crate::portfolio::performance::performance_series;
use crate::portfolio::valuation;
use crate::portfolio::{load_portfolio, save_portfolio};
use crate::storage::{keys, SharedStore};
use crate::utils::logging;
use crate::utils::math::{ceil_div, format_dollars};
use crate::utils::today;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// 포트폴리오 서비스
pub struct PortfolioService {
    store: SharedStore,
    quotes: Arc<dyn QuoteProvider>,
    max_deposit: Decimal,
    currency: String,
}

impl PortfolioService {
    pub fn new(store: SharedStore, quotes: Arc<dyn QuoteProvider>, trading: &TradingConfig) -> Self {
        PortfolioService {
            store,
            quotes,
            max_deposit: trading.max_deposit,
            currency: trading.currency.clone(),
        }
    }

    /// 저장된 포트폴리오를 읽고, 없으면 빈 포트폴리오를 만들어 저장
    pub async fn load_or_init(&self, user_id: &Uuid) -> Result<Portfolio, SimError> {
        let mut store = self.store.write().await;

        if let Some(value) = store.get(&keys::portfolio(user_id)).await? {
            return Ok(serde_json::from_value(value)?);
        }

        let portfolio = Portfolio::empty(*user_id);
        save_portfolio(&mut *store, &portfolio).await?;
        log::debug!("새 포트폴리오 생성: 사용자 {}", user_id);

        Ok(portfolio)
    }

    /// 저장된 포트폴리오 스냅샷 (없으면 빈 포트폴리오, 저장하지 않음)
    pub async fn portfolio(&self, user_id: &Uuid) -> Result<Portfolio, SimError> {
        self.read(user_id).await
    }

    /// 현금 입금
    pub async fn deposit(&self, user_id: &Uuid, amount: Decimal) -> Result<DepositReceipt, SimError> {
        if amount <= Decimal::ZERO {
            return Err(SimError::InvalidParameter("Invalid deposit amount".to_string()));
        }
        if amount > self.max_deposit {
            return Err(SimError::InvalidParameter(format!(
                "Maximum deposit is {}",
                format_dollars(self.max_deposit)
            )));
        }

        let mut store = self.store.write().await;
        let mut portfolio = load_portfolio(&*store, user_id).await?;

        let transaction = Transaction::deposit(amount, Utc::now());
        portfolio.cash += amount;
        portfolio.record(transaction.clone());
        save_portfolio(&mut *store, &portfolio).await?;

        logging::log_deposit(&user_id.to_string(), amount, portfolio.cash);

        Ok(DepositReceipt {
            success: true,
            transaction,
            new_balance: portfolio.cash,
        })
    }

    pub async fn balance(&self, user_id: &Uuid) -> Result<WalletBalance, SimError> {
        let portfolio = self.read(user_id).await?;
        Ok(WalletBalance {
            cash: portfolio.cash,
            currency: self.currency.clone(),
        })
    }

    pub async fn summary(&self, user_id: &Uuid) -> Result<PortfolioSummary, SimError> {
        let portfolio = self.read(user_id).await?;
        let positions = valuation::enrich_all(self.quotes.as_ref(), &portfolio.positions).await?;
        Ok(valuation::summarize(&portfolio, &positions))
    }

    /// 평가 정보가 붙은 보유 종목
    pub async fn positions(&self, user_id: &Uuid) -> Result<Vec<EnrichedPosition>, SimError> {
        let portfolio = self.read(user_id).await?;
        valuation::enrich_all(self.quotes.as_ref(), &portfolio.positions).await
    }

    /// 거래 내역 (유형 필터, 최신순, 페이지 단위)
    pub async fn transactions(
        &self,
        user_id: &Uuid,
        filter: TransactionFilter,
        page: usize,
        limit: usize,
    ) -> Result<TransactionPage, SimError> {
        let portfolio = self.read(user_id).await?;
        let page = page.max(1);
        let limit = limit.max(1);

        let mut transactions: Vec<Transaction> = portfolio
            .transactions
            .into_iter()
            .rev()
            .filter(|t| filter.accepts(t))
            .collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));

        let total = transactions.len();
        let transactions = transactions.into_iter().skip((page - 1).saturating_mul(limit)).take(limit).collect();

        Ok(TransactionPage {
            transactions,
            total,
            page,
            total_pages: ceil_div(total, limit),
        })
    }

    pub async fn performance(&self, user_id: &Uuid, period: Period) -> Result<Vec<PerformancePoint>, SimError> {
        let portfolio = self.read(user_id).await?;
        let positions = valuation::enrich_all(self.quotes.as_ref(), &portfolio.positions).await?;
        let current_value = portfolio.cash + valuation::invested_value(&positions);

        let mut rng = rand::thread_rng();
        Ok(performance_series(
            portfolio.initial_deposit,
            current_value,
            period,
            today(),
            &mut rng,
        ))
    }

    pub async fn allocation(&self, user_id: &Uuid, basis: AllocationBasis) -> Result<Vec<AllocationSlice>, SimError> {
        let portfolio = self.read(user_id).await?;
        let positions = valuation::enrich_all(self.quotes.as_ref(), &portfolio.positions).await?;

        Ok(match basis {
            AllocationBasis::Sector => valuation::allocation_by_sector(&positions, portfolio.cash),
            AllocationBasis::Ticker => valuation::allocation_by_ticker(&positions, portfolio.cash),
        })
    }

    /// 데모 포트폴리오로 덮어쓰기 (현금 7,500 + 3종목)
    pub async fn seed_demo(&self, user_id: &Uuid) -> Result<Portfolio, SimError> {
        let portfolio = demo_portfolio(*user_id);

        let mut store = self.store.write().await;
        save_portfolio(&mut *store, &portfolio).await?;
        log::info!("데모 포트폴리오 적용: 사용자 {}", user_id);

        Ok(portfolio)
    }

    async fn read(&self, user_id: &Uuid) -> Result<Portfolio, SimError> {
        let store = self.store.read().await;
        load_portfolio(&*store, user_id).await
    }
}

fn demo_time(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn demo_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(today)
}

fn demo_portfolio(user_id: Uuid) -> Portfolio {
    let holdings = [
        ("AAPL", "Apple Inc.", 10, dec!(165.00), demo_date(2024, 10, 15), demo_time(2024, 10, 15, 10, 30)),
        ("GOOGL", "Alphabet Inc.", 5, dec!(138.50), demo_date(2024, 11, 1), demo_time(2024, 11, 1, 14, 15)),
        ("TSLA", "Tesla Inc.", 3, dec!(220.00), demo_date(2024, 11, 20), demo_time(2024, 11, 20, 11, 45)),
    ];

    let mut portfolio = Portfolio::empty(user_id);
    portfolio.cash = dec!(7500.00);
    portfolio.record(Transaction::deposit(dec!(10000.00), demo_time(2024, 10, 1, 9, 0)));

    for (symbol, name, quantity, price, purchase_date, filled_at) in holdings {
        portfolio.positions.push(Position::new(symbol, name, quantity, price, purchase_date));
        portfolio.record(Transaction::trade(
            OrderSide::Buy,
            symbol,
            quantity,
            price,
            OrderType::Market,
            filled_at,
        ));
    }

    portfolio
}
