use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;
use warp::{Filter, Rejection};

use crate::api::handlers::{self, Context};
use crate::app::AppContext;

/// 시뮬레이터 REST API 라우트 생성
pub fn create_routes(
    ctx: Arc<AppContext>,
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
    // 헬스체크 라우트
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::health_handler);

    let latency = with_latency(ctx.config.simulated_latency_ms);
    let api = warp::path("api")
        .and(latency)
        .and(
            auth_routes(ctx.clone())
                .or(stock_routes(ctx.clone()))
                .or(wallet_routes(ctx.clone()))
                .or(portfolio_routes(ctx.clone()))
                .or(trade_routes(ctx.clone()))
                .or(watchlist_routes(ctx.clone()))
                .or(alert_routes(ctx)),
        );

    // 모든 라우트 결합
    health.or(api).recover(handlers::handle_rejection)
}

fn with_context(ctx: Context) -> impl Filter<Extract = (Context,), Error = Infallible> + Clone {
    warp::any().map(move || ctx.clone())
}

/// `Authorization` 헤더 (없으면 None)
fn with_auth() -> impl Filter<Extract = (Option<String>,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization")
}

/// 모의 네트워크 지연
fn with_latency(latency_ms: u64) -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::any()
        .and_then(move || async move {
            if latency_ms > 0 {
                tokio::time::sleep(Duration::from_millis(latency_ms)).await;
            }
            Ok::<_, Rejection>(())
        })
        .untuple_one()
}

// 계정 라우트
fn auth_routes(ctx: Context) -> impl Filter<Extract = impl warp::Reply, Error = Rejection> + Clone {
    let register = warp::path!("auth" / "register")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_context(ctx.clone()))
        .and_then(handlers::register);

    let login = warp::path!("auth" / "login")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_context(ctx.clone()))
        .and_then(handlers::login);

    let logout = warp::path!("auth" / "logout")
        .and(warp::post())
        .and(with_auth())
        .and(with_context(ctx.clone()))
        .and_then(handlers::logout);

    let me = warp::path!("auth" / "me");

    let current_user = me
        .and(warp::get())
        .and(with_auth())
        .and(with_context(ctx.clone()))
        .and_then(handlers::current_user);

    let update_profile = me
        .and(warp::patch())
        .and(with_auth())
        .and(warp::body::json())
        .and(with_context(ctx))
        .and_then(handlers::update_profile);

    register.or(login).or(logout).or(current_user).or(update_profile)
}

// 시세, 장 상태, 뉴스 라우트 (인증 불필요)
fn stock_routes(ctx: Context) -> impl Filter<Extract = impl warp::Reply, Error = Rejection> + Clone {
    let list = warp::path!("stocks")
        .and(warp::get())
        .and(with_context(ctx.clone()))
        .and_then(handlers::list_stocks);

    let search = warp::path!("stocks" / "search")
        .and(warp::get())
        .and(warp::query::<handlers::SearchQuery>())
        .and(with_context(ctx.clone()))
        .and_then(handlers::search_stocks);

    let movers = warp::path!("stocks" / "movers")
        .and(warp::get())
        .and(with_context(ctx.clone()))
        .and_then(handlers::top_movers);

    let quote = warp::path!("stocks" / "quote" / String)
        .and(warp::get())
        .and(with_context(ctx.clone()))
        .and_then(handlers::stock_quote);

    let history = warp::path!("stocks" / String / "history")
        .and(warp::get())
        .and(warp::query::<handlers::PeriodQuery>())
        .and(with_context(ctx.clone()))
        .and_then(handlers::stock_history);

    let market_status = warp::path!("market" / "status")
        .and(warp::get())
        .and_then(handlers::get_market_status);

    let news = warp::path!("news")
        .and(warp::get())
        .and(warp::query::<crate::models::news::NewsQuery>())
        .and(with_context(ctx))
        .and_then(handlers::get_news);

    list.or(search)
        .or(movers)
        .or(quote)
        .or(history)
        .or(market_status)
        .or(news)
}

// 지갑 라우트
fn wallet_routes(ctx: Context) -> impl Filter<Extract = impl warp::Reply, Error = Rejection> + Clone {
    let deposit = warp::path!("wallet" / "deposit")
        .and(warp::post())
        .and(with_auth())
        .and(warp::body::json())
        .and(with_context(ctx.clone()))
        .and_then(handlers::deposit);

    let balance = warp::path!("wallet" / "balance")
        .and(warp::get())
        .and(with_auth())
        .and(with_context(ctx))
        .and_then(handlers::balance);

    deposit.or(balance)
}

// 포트폴리오 라우트
fn portfolio_routes(ctx: Context) -> impl Filter<Extract = impl warp::Reply, Error = Rejection> + Clone {
    let summary = warp::path!("portfolio" / "summary")
        .and(warp::get())
        .and(with_auth())
        .and(with_context(ctx.clone()))
        .and_then(handlers::portfolio_summary);

    let positions = warp::path!("portfolio" / "positions")
        .and(warp::get())
        .and(with_auth())
        .and(with_context(ctx.clone()))
        .and_then(handlers::portfolio_positions);

    let transactions = warp::path!("portfolio" / "transactions")
        .and(warp::get())
        .and(with_auth())
        .and(warp::query::<handlers::TransactionQuery>())
        .and(with_context(ctx.clone()))
        .and_then(handlers::portfolio_transactions);

    let performance = warp::path!("portfolio" / "performance")
        .and(warp::get())
        .and(with_auth())
        .and(warp::query::<handlers::PeriodQuery>())
        .and(with_context(ctx.clone()))
        .and_then(handlers::portfolio_performance);

    let allocation = warp::path!("portfolio" / "allocation")
        .and(warp::get())
        .and(with_auth())
        .and(warp::query::<handlers::AllocationQuery>())
        .and(with_context(ctx.clone()))
        .and_then(handlers::portfolio_allocation);

    let export_transactions = warp::path!("portfolio" / "export" / "transactions")
        .and(warp::get())
        .and(with_auth())
        .and(with_context(ctx.clone()))
        .and_then(handlers::export_transactions);

    let export_holdings = warp::path!("portfolio" / "export" / "holdings")
        .and(warp::get())
        .and(with_auth())
        .and(with_context(ctx))
        .and_then(handlers::export_holdings);

    summary
        .or(positions)
        .or(transactions)
        .or(performance)
        .or(allocation)
        .or(export_transactions)
        .or(export_holdings)
}

// 주문 라우트
fn trade_routes(ctx: Context) -> impl Filter<Extract = impl warp::Reply, Error = Rejection> + Clone {
    let buy = warp::path!("trades" / "buy")
        .and(warp::post())
        .and(with_auth())
        .and(warp::body::json())
        .and(with_context(ctx.clone()))
        .and_then(handlers::buy);

    let sell = warp::path!("trades" / "sell")
        .and(warp::post())
        .and(with_auth())
        .and(warp::body::json())
        .and(with_context(ctx.clone()))
        .and_then(handlers::sell);

    let preview = warp::path!("trades" / "preview")
        .and(warp::post())
        .and(with_auth())
        .and(warp::body::json())
        .and(with_context(ctx.clone()))
        .and_then(handlers::preview);

    let orders = warp::path!("trades" / "orders")
        .and(warp::get())
        .and(with_auth())
        .and(warp::query::<handlers::OrdersQuery>())
        .and(with_context(ctx.clone()))
        .and_then(handlers::list_orders);

    let position = warp::path!("trades" / "position" / String)
        .and(warp::get())
        .and(with_auth())
        .and(with_context(ctx))
        .and_then(handlers::position_for);

    buy.or(sell).or(preview).or(orders).or(position)
}

// 관심 종목 라우트
fn watchlist_routes(ctx: Context) -> impl Filter<Extract = impl warp::Reply, Error = Rejection> + Clone {
    let list = warp::path!("watchlist")
        .and(warp::get())
        .and(with_auth())
        .and(with_context(ctx.clone()))
        .and_then(handlers::watchlist);

    let add = warp::path!("watchlist")
        .and(warp::post())
        .and(with_auth())
        .and(warp::body::json())
        .and(with_context(ctx.clone()))
        .and_then(handlers::add_to_watchlist);

    let contains = warp::path!("watchlist" / String)
        .and(warp::get())
        .and(with_auth())
        .and(with_context(ctx.clone()))
        .and_then(handlers::in_watchlist);

    let remove = warp::path!("watchlist" / String)
        .and(warp::delete())
        .and(with_auth())
        .and(with_context(ctx.clone()))
        .and_then(handlers::remove_from_watchlist);

    let update = warp::path!("watchlist" / String)
        .and(warp::patch())
        .and(with_auth())
        .and(warp::body::json())
        .and(with_context(ctx))
        .and_then(handlers::update_watchlist_item);

    list.or(add).or(contains).or(remove).or(update)
}

// 가격 알림 라우트
fn alert_routes(ctx: Context) -> impl Filter<Extract = impl warp::Reply, Error = Rejection> + Clone {
    let list = warp::path!("alerts")
        .and(warp::get())
        .and(with_auth())
        .and(with_context(ctx.clone()))
        .and_then(handlers::alerts);

    let create = warp::path!("alerts")
        .and(warp::post())
        .and(with_auth())
        .and(warp::body::json())
        .and(with_context(ctx.clone()))
        .and_then(handlers::create_alert);

    let triggered = warp::path!("alerts" / "triggered")
        .and(warp::get())
        .and(with_auth())
        .and(with_context(ctx.clone()))
        .and_then(handlers::triggered_alerts);

    let for_symbol = warp::path!("alerts" / "symbol" / String)
        .and(warp::get())
        .and(with_auth())
        .and(with_context(ctx.clone()))
        .and_then(handlers::alerts_for_symbol);

    let delete = warp::path!("alerts" / Uuid)
        .and(warp::delete())
        .and(with_auth())
        .and(with_context(ctx))
        .and_then(handlers::delete_alert);

    list.or(create).or(triggered).or(for_symbol).or(delete)
}
