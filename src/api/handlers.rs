// REST API 핸들러

use std::convert::Infallible;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use warp::http::StatusCode;
use warp::reply::{json, with_header, with_status, Json, Reply, Response, WithStatus};
use warp::Rejection;

use crate::app::AppContext;
use crate::error::SimError;
use crate::export;
use crate::market_data::market_status;
use crate::market_data::news::DEFAULT_NEWS_LIMIT;
use crate::models::alert::NewAlert;
use crate::models::news::NewsQuery;
use crate::models::order::{OrderRequest, PreviewRequest};
use crate::models::portfolio::AllocationBasis;
use crate::models::stock::Period;
use crate::models::transaction::{TransactionFilter, TransactionStatus};
use crate::models::user::{LoginRequest, ProfileUpdate, RegisterRequest};
use crate::models::watchlist::{AddWatchlistRequest, WatchlistUpdate};
use crate::order_core::DEFAULT_ORDER_LIMIT;
use crate::portfolio::service::DEFAULT_PAGE_SIZE;
use crate::utils::{logging, today};

pub type Context = Arc<AppContext>;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
  pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
  pub period: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
  #[serde(rename = "type")]
  pub kind: Option<String>,
  pub page: Option<usize>,
  pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct AllocationQuery {
  pub by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
  pub status: Option<String>,
  pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
  pub amount: Decimal,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
  error: String,
}

/// 오류 종류별 HTTP 상태 코드
pub fn status_for(err: &SimError) -> StatusCode {
  match err {
    SimError::StockNotFound(_) | SimError::NotFound(_) => StatusCode::NOT_FOUND,
    SimError::InvalidParameter(_) | SimError::InsufficientFunds | SimError::InsufficientShares { .. } => {
      StatusCode::BAD_REQUEST
    }
    SimError::NotAuthenticated | SimError::InvalidCredentials => StatusCode::UNAUTHORIZED,
    SimError::Duplicate(_) => StatusCode::CONFLICT,
    SimError::StorageError(_)
    | SimError::IoError(_)
    | SimError::SerializationError(_)
    | SimError::CsvError(_)
    | SimError::ConfigError(_)
    | SimError::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

/// `{"error": message}` 응답
pub fn error_reply(err: &SimError) -> WithStatus<Json> {
  let status = status_for(err);
  if status == StatusCode::INTERNAL_SERVER_ERROR {
    logging::log_error("API 요청 처리", err);
  }
  with_status(json(&ErrorBody { error: err.to_string() }), status)
}

fn respond<T: Serialize>(result: Result<T, SimError>, status: StatusCode) -> WithStatus<Json> {
  match result {
    Ok(body) => with_status(json(&body), status),
    Err(e) => error_reply(&e),
  }
}

/// `Authorization: Bearer <token>` 헤더에서 토큰 추출
fn bearer_token(authorization: Option<&str>) -> Option<&str> {
  let value = authorization?.trim();
  let token = value
    .strip_prefix("Bearer ")
    .or_else(|| value.strip_prefix("bearer "))?
    .trim();
  if token.is_empty() {
    None
  } else {
    Some(token)
  }
}

fn require_token(authorization: &Option<String>) -> Result<&str, SimError> {
  bearer_token(authorization.as_deref()).ok_or(SimError::NotAuthenticated)
}

async fn authorize(ctx: &AppContext, authorization: &Option<String>) -> Result<Uuid, SimError> {
  let token = require_token(authorization)?;
  ctx.auth.authenticate(token).await
}

/// 인증 실패 시 핸들러에서 바로 오류 응답을 반환
macro_rules! authorized {
  ($ctx:expr, $authorization:expr) => {
    match authorize(&$ctx, &$authorization).await {
      Ok(user_id) => user_id,
      Err(e) => return Ok(error_reply(&e)),
    }
  };
}

pub async fn health_handler() -> Result<impl Reply, Infallible> {
  Ok(json(&json!({ "status": "ok", "version": crate::VERSION })))
}

// ---- 계정 ----

pub async fn register(request: RegisterRequest, ctx: Context) -> Result<impl Reply, Rejection> {
  Ok(respond(ctx.auth.register(request).await, StatusCode::CREATED))
}

pub async fn login(request: LoginRequest, ctx: Context) -> Result<impl Reply, Rejection> {
  Ok(respond(ctx.auth.login(request).await, StatusCode::OK))
}

pub async fn logout(authorization: Option<String>, ctx: Context) -> Result<impl Reply, Rejection> {
  if let Some(token) = bearer_token(authorization.as_deref()) {
    if let Err(e) = ctx.auth.logout(token).await {
      return Ok(error_reply(&e));
    }
  }
  Ok(with_status(json(&json!({ "success": true })), StatusCode::OK))
}

pub async fn current_user(authorization: Option<String>, ctx: Context) -> Result<impl Reply, Rejection> {
  let token = match require_token(&authorization) {
    Ok(token) => token,
    Err(e) => return Ok(error_reply(&e)),
  };
  let result = ctx.auth.current_user(token).await.map(|user| json!({ "user": user }));
  Ok(respond(result, StatusCode::OK))
}

pub async fn update_profile(
  authorization: Option<String>,
  updates: ProfileUpdate,
  ctx: Context,
) -> Result<impl Reply, Rejection> {
  let token = match require_token(&authorization) {
    Ok(token) => token,
    Err(e) => return Ok(error_reply(&e)),
  };
  let result = ctx.auth.update_profile(token, updates).await.map(|user| json!({ "user": user }));
  Ok(respond(result, StatusCode::OK))
}

// ---- 시세 ----

pub async fn list_stocks(ctx: Context) -> Result<impl Reply, Rejection> {
  Ok(json(&ctx.catalog.all()))
}

pub async fn search_stocks(query: SearchQuery, ctx: Context) -> Result<impl Reply, Rejection> {
  let q = query.q.unwrap_or_default();
  Ok(json(&ctx.catalog.search(q.trim())))
}

pub async fn top_movers(ctx: Context) -> Result<impl Reply, Rejection> {
  Ok(json(&ctx.catalog.top_movers()))
}

pub async fn stock_quote(symbol: String, ctx: Context) -> Result<impl Reply, Rejection> {
  Ok(respond(ctx.catalog.quote(&symbol), StatusCode::OK))
}

pub async fn stock_history(symbol: String, query: PeriodQuery, ctx: Context) -> Result<impl Reply, Rejection> {
  let period = query.period.as_deref().map(Period::parse).unwrap_or_default();
  Ok(json(&ctx.catalog.history(&symbol, period, today())))
}

pub async fn get_market_status() -> Result<impl Reply, Rejection> {
  Ok(json(&market_status(Utc::now())))
}

pub async fn get_news(query: NewsQuery, ctx: Context) -> Result<impl Reply, Rejection> {
  let news = ctx.news.query(
    query.symbol.as_deref(),
    query.category.as_deref(),
    query.limit.unwrap_or(DEFAULT_NEWS_LIMIT),
    Utc::now(),
  );
  Ok(json(&news))
}

// ---- 지갑 ----

pub async fn deposit(
  authorization: Option<String>,
  request: DepositRequest,
  ctx: Context,
) -> Result<impl Reply, Rejection> {
  let user_id = authorized!(ctx, authorization);
  Ok(respond(ctx.portfolios.deposit(&user_id, request.amount).await, StatusCode::OK))
}

pub async fn balance(authorization: Option<String>, ctx: Context) -> Result<impl Reply, Rejection> {
  let user_id = authorized!(ctx, authorization);
  Ok(respond(ctx.portfolios.balance(&user_id).await, StatusCode::OK))
}

// ---- 포트폴리오 ----

pub async fn portfolio_summary(authorization: Option<String>, ctx: Context) -> Result<impl Reply, Rejection> {
  let user_id = authorized!(ctx, authorization);
  Ok(respond(ctx.portfolios.summary(&user_id).await, StatusCode::OK))
}

pub async fn portfolio_positions(authorization: Option<String>, ctx: Context) -> Result<impl Reply, Rejection> {
  let user_id = authorized!(ctx, authorization);
  Ok(respond(ctx.portfolios.positions(&user_id).await, StatusCode::OK))
}

pub async fn portfolio_transactions(
  authorization: Option<String>,
  query: TransactionQuery,
  ctx: Context,
) -> Result<impl Reply, Rejection> {
  let user_id = authorized!(ctx, authorization);
  let filter = TransactionFilter::parse(query.kind.as_deref());
  let page = query.page.unwrap_or(1);
  let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);

  Ok(respond(ctx.portfolios.transactions(&user_id, filter, page, limit).await, StatusCode::OK))
}

pub async fn portfolio_performance(
  authorization: Option<String>,
  query: PeriodQuery,
  ctx: Context,
) -> Result<impl Reply, Rejection> {
  let user_id = authorized!(ctx, authorization);
  let period = query.period.as_deref().map(Period::parse).unwrap_or_default();
  Ok(respond(ctx.portfolios.performance(&user_id, period).await, StatusCode::OK))
}

pub async fn portfolio_allocation(
  authorization: Option<String>,
  query: AllocationQuery,
  ctx: Context,
) -> Result<impl Reply, Rejection> {
  let user_id = authorized!(ctx, authorization);
  let basis = AllocationBasis::parse(query.by.as_deref());
  Ok(respond(ctx.portfolios.allocation(&user_id, basis).await, StatusCode::OK))
}

pub async fn export_transactions(authorization: Option<String>, ctx: Context) -> Result<Response, Rejection> {
  let user_id = match authorize(&ctx, &authorization).await {
    Ok(user_id) => user_id,
    Err(e) => return Ok(error_reply(&e).into_response()),
  };

  let csv = match ctx.portfolios.portfolio(&user_id).await {
    Ok(portfolio) => export::transactions_csv(&portfolio.transactions),
    Err(e) => Err(e),
  };
  Ok(csv_reply(csv, "transactions.csv"))
}

pub async fn export_holdings(authorization: Option<String>, ctx: Context) -> Result<Response, Rejection> {
  let user_id = match authorize(&ctx, &authorization).await {
    Ok(user_id) => user_id,
    Err(e) => return Ok(error_reply(&e).into_response()),
  };

  let csv = match ctx.portfolios.positions(&user_id).await {
    Ok(positions) => export::holdings_csv(&positions),
    Err(e) => Err(e),
  };
  Ok(csv_reply(csv, "holdings.csv"))
}

fn csv_reply(result: Result<String, SimError>, filename: &str) -> Response {
  match result {
    Ok(body) => {
      let reply = with_header(body, "content-type", "text/csv; charset=utf-8");
      with_header(reply, "content-disposition", format!("attachment; filename=\"{}\"", filename)).into_response()
    }
    Err(e) => error_reply(&e).into_response(),
  }
}

// ---- 주문 ----

pub async fn buy(authorization: Option<String>, order: OrderRequest, ctx: Context) -> Result<impl Reply, Rejection> {
  let user_id = authorized!(ctx, authorization);
  Ok(respond(ctx.orders.execute_buy(&user_id, order).await, StatusCode::OK))
}

pub async fn sell(authorization: Option<String>, order: OrderRequest, ctx: Context) -> Result<impl Reply, Rejection> {
  let user_id = authorized!(ctx, authorization);
  Ok(respond(ctx.orders.execute_sell(&user_id, order).await, StatusCode::OK))
}

pub async fn preview(
  authorization: Option<String>,
  request: PreviewRequest,
  ctx: Context,
) -> Result<impl Reply, Rejection> {
  let user_id = authorized!(ctx, authorization);
  Ok(respond(ctx.orders.preview(&user_id, request).await, StatusCode::OK))
}

pub async fn list_orders(
  authorization: Option<String>,
  query: OrdersQuery,
  ctx: Context,
) -> Result<impl Reply, Rejection> {
  let user_id = authorized!(ctx, authorization);
  let status = parse_status(query.status.as_deref());
  let limit = query.limit.unwrap_or(DEFAULT_ORDER_LIMIT);
  Ok(respond(ctx.orders.orders(&user_id, status, limit).await, StatusCode::OK))
}

pub async fn position_for(
  symbol: String,
  authorization: Option<String>,
  ctx: Context,
) -> Result<impl Reply, Rejection> {
  let user_id = authorized!(ctx, authorization);
  let result = ctx
    .orders
    .position_for(&user_id, &symbol)
    .await
    .map(|position| json!({ "symbol": symbol.to_uppercase(), "position": position }));
  Ok(respond(result, StatusCode::OK))
}

/// 주문 상태 필터. 없거나 ALL이면 전체
fn parse_status(value: Option<&str>) -> Option<TransactionStatus> {
  match value.map(|v| v.to_uppercase()).as_deref() {
    Some("PENDING") => Some(TransactionStatus::Pending),
    Some("COMPLETED") => Some(TransactionStatus::Completed),
    Some("FAILED") => Some(TransactionStatus::Failed),
    _ => None,
  }
}

// ---- 관심 종목 ----

pub async fn watchlist(authorization: Option<String>, ctx: Context) -> Result<impl Reply, Rejection> {
  let user_id = authorized!(ctx, authorization);
  Ok(respond(ctx.watchlist.list(&user_id).await, StatusCode::OK))
}

pub async fn add_to_watchlist(
  authorization: Option<String>,
  request: AddWatchlistRequest,
  ctx: Context,
) -> Result<impl Reply, Rejection> {
  let user_id = authorized!(ctx, authorization);
  let result = ctx
    .watchlist
    .add(&user_id, &request.symbol)
    .await
    .map(|item| json!({ "success": true, "item": item }));
  Ok(respond(result, StatusCode::CREATED))
}

pub async fn remove_from_watchlist(
  symbol: String,
  authorization: Option<String>,
  ctx: Context,
) -> Result<impl Reply, Rejection> {
  let user_id = authorized!(ctx, authorization);
  let result = ctx
    .watchlist
    .remove(&user_id, &symbol)
    .await
    .map(|symbol| json!({ "success": true, "symbol": symbol }));
  Ok(respond(result, StatusCode::OK))
}

pub async fn in_watchlist(
  symbol: String,
  authorization: Option<String>,
  ctx: Context,
) -> Result<impl Reply, Rejection> {
  let user_id = authorized!(ctx, authorization);
  let result = ctx
    .watchlist
    .contains(&user_id, &symbol)
    .await
    .map(|found| json!({ "symbol": symbol.to_uppercase(), "in_watchlist": found }));
  Ok(respond(result, StatusCode::OK))
}

pub async fn update_watchlist_item(
  symbol: String,
  authorization: Option<String>,
  updates: WatchlistUpdate,
  ctx: Context,
) -> Result<impl Reply, Rejection> {
  let user_id = authorized!(ctx, authorization);
  let result = ctx
    .watchlist
    .update(&user_id, &symbol, updates)
    .await
    .map(|item| json!({ "success": true, "item": item }));
  Ok(respond(result, StatusCode::OK))
}

// ---- 가격 알림 ----

pub async fn alerts(authorization: Option<String>, ctx: Context) -> Result<impl Reply, Rejection> {
  let user_id = authorized!(ctx, authorization);
  Ok(respond(ctx.alerts.list(&user_id).await, StatusCode::OK))
}

pub async fn create_alert(
  authorization: Option<String>,
  request: NewAlert,
  ctx: Context,
) -> Result<impl Reply, Rejection> {
  let user_id = authorized!(ctx, authorization);
  let result = ctx
    .alerts
    .create(&user_id, request)
    .await
    .map(|alert| json!({ "success": true, "alert": alert }));
  Ok(respond(result, StatusCode::CREATED))
}

pub async fn delete_alert(
  alert_id: Uuid,
  authorization: Option<String>,
  ctx: Context,
) -> Result<impl Reply, Rejection> {
  let user_id = authorized!(ctx, authorization);
  let result = ctx
    .alerts
    .delete(&user_id, &alert_id)
    .await
    .map(|_| json!({ "success": true, "alert_id": alert_id }));
  Ok(respond(result, StatusCode::OK))
}

pub async fn alerts_for_symbol(
  symbol: String,
  authorization: Option<String>,
  ctx: Context,
) -> Result<impl Reply, Rejection> {
  let user_id = authorized!(ctx, authorization);
  Ok(respond(ctx.alerts.for_symbol(&user_id, &symbol).await, StatusCode::OK))
}

pub async fn triggered_alerts(authorization: Option<String>, ctx: Context) -> Result<impl Reply, Rejection> {
  let user_id = authorized!(ctx, authorization);
  Ok(respond(ctx.alerts.triggered(&user_id).await, StatusCode::OK))
}

// ---- 거부 처리 ----

/// 라우트 불일치, 본문/쿼리 파싱 실패를 JSON 오류로 변환
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
  let (status, message) = if err.is_not_found() {
    (StatusCode::NOT_FOUND, "Not found".to_string())
  } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
    (StatusCode::BAD_REQUEST, format!("Invalid request body: {}", e))
  } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
    (StatusCode::BAD_REQUEST, format!("Invalid query: {}", e))
  } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
    (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
  } else {
    log::error!("처리되지 않은 요청 거부: {:?}", err);
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
  };

  Ok(with_status(json(&ErrorBody { error: message }), status))
}
