//! 파일 저장소 통합 테스트
//!
//! 재시작 후 상태 유지, 동시 주문 직렬화 확인

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::TempDir;

use stocksim::config::{Config, StorageBackend};
use stocksim::models::alert::{AlertDirection, NewAlert};
use stocksim::models::transaction::TransactionType;
use stocksim::models::user::{LoginRequest, RegisterRequest};
use stocksim::{AppContext, OrderRequest, SimError};

fn file_config(dir: &TempDir) -> Config {
  let mut config = Config::default();
  config.storage.backend = StorageBackend::File;
  config.storage.data_dir = dir.path().to_string_lossy().to_string();
  config
}

fn registration() -> RegisterRequest {
  RegisterRequest {
    email: "persist@example.com".to_string(),
    username: "persist".to_string(),
    password: "secret".to_string(),
    first_name: "Pat".to_string(),
    last_name: "Sistent".to_string(),
  }
}

#[tokio::test]
async fn test_state_survives_restart() {
  let dir = tempfile::tempdir().unwrap();

  let user_id = {
    let ctx = AppContext::from_config(file_config(&dir)).unwrap();
    let session = ctx.auth.register(registration()).await.unwrap();
    let user_id = session.user.id;

    ctx.portfolios.deposit(&user_id, dec!(5000)).await.unwrap();
    ctx.orders.execute_buy(&user_id, OrderRequest::market("MSFT", 3)).await.unwrap();
    ctx.watchlist.add(&user_id, "DIS").await.unwrap();
    ctx.alerts
      .create(&user_id, NewAlert {
        symbol: "MSFT".to_string(),
        target_price: dec!(500),
        direction: AlertDirection::Above,
        note: "breakout".to_string(),
      })
      .await
      .unwrap();
    user_id
  };

  // 같은 디렉터리로 다시 시작
  let ctx = AppContext::from_config(file_config(&dir)).unwrap();

  let session = ctx
    .auth
    .login(LoginRequest {
      email: "persist@example.com".to_string(),
      password: "secret".to_string(),
    })
    .await
    .unwrap();
  assert_eq!(session.user.id, user_id);

  let portfolio = ctx.portfolios.portfolio(&user_id).await.unwrap();
  assert_eq!(portfolio.initial_deposit, dec!(5000));
  assert_eq!(portfolio.positions.len(), 1);
  assert_eq!(portfolio.positions[0].symbol, "MSFT");
  assert_eq!(portfolio.positions[0].quantity, 3);
  assert_eq!(portfolio.cash, dec!(5000) - portfolio.positions[0].avg_cost * Decimal::from(3));

  let kinds: Vec<TransactionType> = portfolio.transactions.iter().map(|t| t.transaction_type).collect();
  assert_eq!(kinds, vec![TransactionType::Deposit, TransactionType::Buy]);

  assert!(ctx.watchlist.contains(&user_id, "dis").await.unwrap());
  let alerts = ctx.alerts.list(&user_id).await.unwrap();
  assert_eq!(alerts.len(), 1);
  assert_eq!(alerts[0].alert.note, "breakout");
}

#[tokio::test]
async fn test_wrong_password_after_restart() {
  let dir = tempfile::tempdir().unwrap();
  {
    let ctx = AppContext::from_config(file_config(&dir)).unwrap();
    ctx.auth.register(registration()).await.unwrap();
  }

  let ctx = AppContext::from_config(file_config(&dir)).unwrap();
  let err = ctx
    .auth
    .login(LoginRequest {
      email: "persist@example.com".to_string(),
      password: "guess".to_string(),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, SimError::InvalidCredentials));
}

#[tokio::test]
async fn test_concurrent_buys_do_not_overdraw() {
  let dir = tempfile::tempdir().unwrap();
  let ctx = Arc::new(AppContext::from_config(file_config(&dir)).unwrap());
  let session = ctx.auth.register(registration()).await.unwrap();
  let user_id = session.user.id;

  // AAPL 10주 (1754.30) 한 번만 살 수 있는 잔고
  ctx.portfolios.deposit(&user_id, dec!(2000)).await.unwrap();

  let first = {
    let ctx = ctx.clone();
    tokio::spawn(async move { ctx.orders.execute_buy(&user_id, OrderRequest::market("AAPL", 10)).await })
  };
  let second = {
    let ctx = ctx.clone();
    tokio::spawn(async move { ctx.orders.execute_buy(&user_id, OrderRequest::market("AAPL", 10)).await })
  };

  let results = vec![first.await.unwrap(), second.await.unwrap()];
  let filled = results.iter().filter(|r| r.is_ok()).count();
  let rejected = results
    .iter()
    .filter(|r| matches!(r, Err(SimError::InsufficientFunds)))
    .count();
  assert_eq!((filled, rejected), (1, 1));

  let balance = ctx.portfolios.balance(&user_id).await.unwrap();
  assert_eq!(balance.cash, dec!(245.70));

  let position = ctx.orders.position_for(&user_id, "AAPL").await.unwrap().unwrap();
  assert_eq!(position.quantity, 10);
}
