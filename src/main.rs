/**
* filename : main
* author : HAMA
* date: 2025. 5. 8.
* description: 시뮬레이터 REST 서버 실행
**/

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context as _;
use warp::Filter;

use stocksim::api::routes;
use stocksim::config::Config;
use stocksim::utils::logging;
use stocksim::AppContext;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // 설정 로드
    let config = Config::load()?;

    // 로깅 초기화
    logging::init(&config.logging.level)?;
    log::info!("모의 주식 거래 시뮬레이터 시작 (v{})", stocksim::VERSION);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("invalid server address {}:{}", config.server.host, config.server.port))?;

    let ctx = Arc::new(AppContext::from_config(config)?);
    log::info!("저장소 및 서비스 초기화 완료");

    // 명령줄 인수 확인
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "demo" {
        seed_demo(&ctx).await?;
    }

    // API 라우트 초기화
    let routes = routes::create_routes(ctx.clone()).with(warp::log("stocksim::api"));
    log::info!("API 라우트 초기화 완료");

    // Warp 서버 시작
    log::info!("서버 시작: http://{}/", addr);
    warp::serve(routes).run(addr).await;

    Ok(())
}

/// 데모 계정과 포트폴리오 생성
async fn seed_demo(ctx: &AppContext) -> Result<(), anyhow::Error> {
    let session = ctx
        .auth
        .login(stocksim::models::user::LoginRequest {
            email: "demo@stocksim.dev".to_string(),
            password: String::new(),
        })
        .await
        .context("demo login failed")?;

    ctx.portfolios.seed_demo(&session.user.id).await?;
    log::info!("데모 계정 준비 완료: {} (토큰: {})", session.user.email, session.token);

    Ok(())
}
