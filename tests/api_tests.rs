//! REST API 통합 테스트
//!
//! warp::test로 라우트 전체를 호출해 가입부터 주문, 관심 종목, 알림까지 확인

use std::sync::Arc;

use serde_json::{json, Value};
use warp::http::StatusCode;
use warp::test::{request, RequestBuilder};

use stocksim::api::create_routes;
use stocksim::config::Config;
use stocksim::AppContext;

fn context() -> Arc<AppContext> {
  Arc::new(AppContext::in_memory(Config::default()))
}

async fn send(ctx: &Arc<AppContext>, req: RequestBuilder) -> (StatusCode, Value) {
  let routes = create_routes(ctx.clone());
  let response = req.reply(&routes).await;
  let body = serde_json::from_slice(response.body()).unwrap_or(Value::Null);
  (response.status(), body)
}

async fn register(ctx: &Arc<AppContext>, email: &str, username: &str) -> String {
  let (status, body) = send(
    ctx,
    request().method("POST").path("/api/auth/register").json(&json!({
      "email": email,
      "username": username,
      "password": "secret",
      "first_name": "Test",
      "last_name": "User"
    })),
  )
  .await;

  assert_eq!(status, StatusCode::CREATED);
  body["token"].as_str().unwrap().to_string()
}

fn bearer(token: &str) -> String {
  format!("Bearer {}", token)
}

async fn funded_user(ctx: &Arc<AppContext>, amount: f64) -> String {
  let token = register(ctx, "trader@example.com", "trader").await;
  let (status, _) = send(
    ctx,
    request()
      .method("POST")
      .path("/api/wallet/deposit")
      .header("authorization", bearer(&token))
      .json(&json!({ "amount": amount })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  token
}

#[tokio::test]
async fn test_health() {
  let ctx = context();
  let (status, body) = send(&ctx, request().method("GET").path("/health")).await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_register_login_and_profile() {
  let ctx = context();
  let token = register(&ctx, "jamie@example.com", "jamie").await;

  let (status, body) = send(
    &ctx,
    request().method("GET").path("/api/auth/me").header("authorization", bearer(&token)),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["user"]["username"], "jamie");

  let (status, body) = send(
    &ctx,
    request()
      .method("PATCH")
      .path("/api/auth/me")
      .header("authorization", bearer(&token))
      .json(&json!({ "first_name": "Jay" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["user"]["first_name"], "Jay");

  let (status, body) = send(
    &ctx,
    request().method("POST").path("/api/auth/login").json(&json!({
      "email": "jamie@example.com",
      "password": "wrong"
    })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["error"], "Invalid email or password");

  let (status, _) = send(
    &ctx,
    request().method("POST").path("/api/auth/logout").header("authorization", bearer(&token)),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (status, body) = send(
    &ctx,
    request().method("GET").path("/api/auth/me").header("authorization", bearer(&token)),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["error"], "Not authenticated");
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
  let ctx = context();
  register(&ctx, "jamie@example.com", "jamie").await;

  let (status, body) = send(
    &ctx,
    request().method("POST").path("/api/auth/register").json(&json!({
      "email": "JAMIE@example.com",
      "username": "someone",
      "password": "secret"
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["error"], "User with this email or username already exists");
}

#[tokio::test]
async fn test_padded_email_cannot_bypass_login() {
  let ctx = context();
  register(&ctx, "victim@example.com", "victim").await;

  let (status, body) = send(
    &ctx,
    request().method("POST").path("/api/auth/login").json(&json!({
      "email": " Victim@example.com ",
      "password": "wrong"
    })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["error"], "Invalid email or password");

  let (status, body) = send(
    &ctx,
    request().method("POST").path("/api/auth/login").json(&json!({
      "email": " victim@example.com",
      "password": "secret"
    })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["user"]["username"], "victim");

  let (status, _) = send(
    &ctx,
    request().method("POST").path("/api/auth/register").json(&json!({
      "email": "victim@example.com ",
      "username": "victim ",
      "password": "secret"
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
  let ctx = context();

  let (status, body) = send(&ctx, request().method("GET").path("/api/portfolio/summary")).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["error"], "Not authenticated");

  let (status, _) = send(
    &ctx,
    request()
      .method("GET")
      .path("/api/wallet/balance")
      .header("authorization", "Bearer not-a-token"),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_market_data_routes() {
  let ctx = context();

  let (status, body) = send(&ctx, request().method("GET").path("/api/stocks")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 12);

  let (status, body) = send(&ctx, request().method("GET").path("/api/stocks/search?q=apple")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body[0]["symbol"], "AAPL");

  let (_, body) = send(&ctx, request().method("GET").path("/api/stocks/search")).await;
  assert!(body.as_array().unwrap().is_empty());

  let (status, body) = send(&ctx, request().method("GET").path("/api/stocks/quote/msft")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["symbol"], "MSFT");

  let (status, body) = send(&ctx, request().method("GET").path("/api/stocks/quote/ZZZZ")).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "Stock not found: ZZZZ");

  let (_, body) = send(&ctx, request().method("GET").path("/api/stocks/AAPL/history?period=1W")).await;
  assert_eq!(body.as_array().unwrap().len(), 8);

  let (_, body) = send(&ctx, request().method("GET").path("/api/stocks/movers")).await;
  assert_eq!(body["gainers"].as_array().unwrap().len(), 3);
  assert_eq!(body["losers"].as_array().unwrap().len(), 3);

  let (status, body) = send(&ctx, request().method("GET").path("/api/market/status")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["exchange"], "NYSE");

  let (_, body) = send(&ctx, request().method("GET").path("/api/news?symbol=tsla&limit=5")).await;
  let news = body.as_array().unwrap();
  assert!(!news.is_empty());
  assert!(news.iter().all(|n| n["symbols"].as_array().unwrap().contains(&json!("TSLA"))));
}

#[tokio::test]
async fn test_deposit_validation() {
  let ctx = context();
  let token = register(&ctx, "saver@example.com", "saver").await;

  let (status, body) = send(
    &ctx,
    request()
      .method("POST")
      .path("/api/wallet/deposit")
      .header("authorization", bearer(&token))
      .json(&json!({ "amount": 0 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Invalid deposit amount");

  let (status, body) = send(
    &ctx,
    request()
      .method("POST")
      .path("/api/wallet/deposit")
      .header("authorization", bearer(&token))
      .json(&json!({ "amount": 2000000 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Maximum deposit is $1,000,000");
}

#[tokio::test]
async fn test_trading_flow() {
  let ctx = context();
  let token = funded_user(&ctx, 10000.0).await;

  let (status, body) = send(
    &ctx,
    request()
      .method("POST")
      .path("/api/trades/buy")
      .header("authorization", bearer(&token))
      .json(&json!({ "symbol": "aapl", "quantity": 10 })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["order"]["status"], "FILLED");
  assert_eq!(body["order"]["symbol"], "AAPL");
  assert!((body["new_balance"].as_f64().unwrap() - 8245.70).abs() < 1e-6);

  let (status, body) = send(
    &ctx,
    request()
      .method("POST")
      .path("/api/trades/sell")
      .header("authorization", bearer(&token))
      .json(&json!({ "symbol": "AAPL", "quantity": 11 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Insufficient shares. You own 10 shares of AAPL");

  let (status, body) = send(
    &ctx,
    request()
      .method("POST")
      .path("/api/trades/buy")
      .header("authorization", bearer(&token))
      .json(&json!({ "symbol": "NVDA", "quantity": 1000 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Insufficient funds");

  let (status, body) = send(
    &ctx,
    request()
      .method("POST")
      .path("/api/trades/preview")
      .header("authorization", bearer(&token))
      .json(&json!({ "symbol": "AAPL", "quantity": 4, "side": "SELL" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["shares_owned"], 10);
  assert_eq!(body["can_execute"], true);

  let (_, body) = send(
    &ctx,
    request()
      .method("GET")
      .path("/api/trades/position/aapl")
      .header("authorization", bearer(&token)),
  )
  .await;
  assert_eq!(body["position"]["quantity"], 10);

  let (_, body) = send(
    &ctx,
    request()
      .method("GET")
      .path("/api/portfolio/summary")
      .header("authorization", bearer(&token)),
  )
  .await;
  assert_eq!(body["position_count"], 1);

  let (_, body) = send(
    &ctx,
    request()
      .method("GET")
      .path("/api/trades/orders?status=ALL&limit=5")
      .header("authorization", bearer(&token)),
  )
  .await;
  assert_eq!(body.as_array().unwrap().len(), 1);

  let (_, body) = send(
    &ctx,
    request()
      .method("GET")
      .path("/api/portfolio/transactions?type=DEPOSIT")
      .header("authorization", bearer(&token)),
  )
  .await;
  assert_eq!(body["total"], 1);
  assert_eq!(body["total_pages"], 1);

  let (_, body) = send(
    &ctx,
    request()
      .method("GET")
      .path("/api/portfolio/allocation?by=ticker")
      .header("authorization", bearer(&token)),
  )
  .await;
  let names: Vec<&str> = body.as_array().unwrap().iter().map(|s| s["name"].as_str().unwrap()).collect();
  assert_eq!(names, vec!["AAPL", "Cash"]);
}

#[tokio::test]
async fn test_oversized_limit_order_is_rejected() {
  let ctx = context();
  let token = funded_user(&ctx, 10000.0).await;

  let (status, body) = send(
    &ctx,
    request()
      .method("POST")
      .path("/api/trades/buy")
      .header("authorization", bearer(&token))
      .json(&json!({
        "symbol": "AAPL",
        "quantity": 10,
        "order_type": "LIMIT",
        "limit_price": 5e28
      })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Order total is too large");

  let (status, body) = send(
    &ctx,
    request().method("GET").path("/api/wallet/balance").header("authorization", bearer(&token)),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["cash"], 10000.0);
}

#[tokio::test]
async fn test_export_csv() {
  let ctx = context();
  let token = funded_user(&ctx, 5000.0).await;

  let routes = create_routes(ctx.clone());
  let response = request()
    .method("GET")
    .path("/api/portfolio/export/transactions")
    .header("authorization", bearer(&token))
    .reply(&routes)
    .await;

  assert_eq!(response.status(), StatusCode::OK);
  assert_eq!(response.headers()["content-type"], "text/csv; charset=utf-8");

  let body = String::from_utf8(response.body().to_vec()).unwrap();
  let lines: Vec<&str> = body.lines().collect();
  assert_eq!(lines[0], "date,type,symbol,quantity,price,total,status");
  assert!(lines[1].contains(",DEPOSIT,,,,5000,COMPLETED"));
}

#[tokio::test]
async fn test_watchlist_routes() {
  let ctx = context();
  let token = register(&ctx, "watcher@example.com", "watcher").await;

  let add = || {
    request()
      .method("POST")
      .path("/api/watchlist")
      .header("authorization", bearer(&token))
      .json(&json!({ "symbol": "nvda" }))
  };

  let (status, body) = send(&ctx, add()).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["success"], true);
  assert_eq!(body["item"]["symbol"], "NVDA");

  let (status, body) = send(&ctx, add()).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["error"], "Stock is already in your watchlist");

  let (_, body) = send(
    &ctx,
    request()
      .method("GET")
      .path("/api/watchlist/NVDA")
      .header("authorization", bearer(&token)),
  )
  .await;
  assert_eq!(body["in_watchlist"], true);

  let (status, body) = send(
    &ctx,
    request()
      .method("PATCH")
      .path("/api/watchlist/NVDA")
      .header("authorization", bearer(&token))
      .json(&json!({ "has_alert": true, "alert_price": 500.0, "alert_direction": "above" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["item"]["has_alert"], true);

  let (status, body) = send(
    &ctx,
    request()
      .method("DELETE")
      .path("/api/watchlist/nvda")
      .header("authorization", bearer(&token)),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["symbol"], "NVDA");

  let (status, body) = send(
    &ctx,
    request()
      .method("DELETE")
      .path("/api/watchlist/nvda")
      .header("authorization", bearer(&token)),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "Stock is not in your watchlist");
}

#[tokio::test]
async fn test_alert_routes() {
  let ctx = context();
  let token = register(&ctx, "alerts@example.com", "alerts").await;

  let (status, body) = send(
    &ctx,
    request()
      .method("POST")
      .path("/api/alerts")
      .header("authorization", bearer(&token))
      .json(&json!({ "symbol": "AAPL", "target_price": 100.0, "direction": "above" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["alert"]["is_triggered"], true);
  let alert_id = body["alert"]["id"].as_str().unwrap().to_string();

  let (_, body) = send(
    &ctx,
    request()
      .method("GET")
      .path("/api/alerts/triggered")
      .header("authorization", bearer(&token)),
  )
  .await;
  assert_eq!(body.as_array().unwrap().len(), 1);

  let (_, body) = send(
    &ctx,
    request()
      .method("GET")
      .path("/api/alerts/symbol/aapl")
      .header("authorization", bearer(&token)),
  )
  .await;
  assert_eq!(body.as_array().unwrap().len(), 1);

  let (status, body) = send(
    &ctx,
    request()
      .method("POST")
      .path("/api/alerts")
      .header("authorization", bearer(&token))
      .json(&json!({ "symbol": "AAPL", "target_price": -1.0, "direction": "below" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Target price must be positive");

  let (status, body) = send(
    &ctx,
    request()
      .method("DELETE")
      .path(&format!("/api/alerts/{}", alert_id))
      .header("authorization", bearer(&token)),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["alert_id"], alert_id.as_str());

  let (status, body) = send(
    &ctx,
    request()
      .method("DELETE")
      .path(&format!("/api/alerts/{}", alert_id))
      .header("authorization", bearer(&token)),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "Alert not found");
}

#[tokio::test]
async fn test_rejections_are_json() {
  let ctx = context();

  let (status, body) = send(&ctx, request().method("GET").path("/api/nowhere")).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "Not found");

  let (status, body) = send(
    &ctx,
    request()
      .method("POST")
      .path("/api/auth/login")
      .header("content-type", "application/json")
      .body("{not json"),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}
