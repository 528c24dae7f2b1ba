//! 보유 종목 평가 및 자산 배분

use rust_decimal::Decimal;

use crate::error::SimError;
use crate::market_data::provider::QuoteProvider;
use crate::models::portfolio::{AllocationSlice, Portfolio, PortfolioSummary};
use crate::models::position::{EnrichedPosition, Position, PositionValuation};
use crate::models::stock::Stock;
use crate::utils::math::{percent_change, percent_of};

const CASH_SLICE: &str = "Cash";
const OTHER_SECTOR: &str = "Other";

/// 현재가로 보유 종목 평가. 시세가 없으면 평가 정보 없이 반환
pub fn enrich(position: &Position, stock: Option<&Stock>) -> EnrichedPosition {
    let valuation = stock.map(|stock| {
        let quantity = Decimal::from(position.quantity);
        let market_value = position.market_value(stock.price);
        let cost_basis = position.cost_basis();

        PositionValuation {
            current_price: stock.price,
            market_value,
            cost_basis,
            gain_loss: market_value - cost_basis,
            gain_loss_percent: percent_change(position.avg_cost, stock.price),
            day_change: stock.change * quantity,
            sector: stock.sector.clone(),
        }
    });

    EnrichedPosition {
        position: position.clone(),
        valuation,
    }
}

/// 전체 보유 종목 평가
pub async fn enrich_all(
    quotes: &dyn QuoteProvider,
    positions: &[Position],
) -> Result<Vec<EnrichedPosition>, SimError> {
    let mut enriched = Vec::with_capacity(positions.len());

    for position in positions {
        let stock = quotes.lookup(&position.symbol).await?;
        enriched.push(enrich(position, stock.as_ref()));
    }

    Ok(enriched)
}

/// 평가 금액 합계 (시세 없는 종목 제외)
pub fn invested_value(positions: &[EnrichedPosition]) -> Decimal {
    positions
        .iter()
        .filter_map(|p| p.valuation.as_ref())
        .map(|v| v.market_value)
        .sum()
}

/// 포트폴리오 요약 계산
pub fn summarize(portfolio: &Portfolio, positions: &[EnrichedPosition]) -> PortfolioSummary {
    let valuations: Vec<&PositionValuation> = positions.iter().filter_map(|p| p.valuation.as_ref()).collect();

    let invested_value: Decimal = valuations.iter().map(|v| v.market_value).sum();
    let cost_basis: Decimal = valuations.iter().map(|v| v.cost_basis).sum();
    let today_change: Decimal = valuations.iter().map(|v| v.day_change).sum();

    let total_value = portfolio.cash + invested_value;
    let total_gain_loss = invested_value - cost_basis;
    let overall_return = total_value - portfolio.initial_deposit;

    PortfolioSummary {
        total_value,
        cash: portfolio.cash,
        invested_value,
        cost_basis,
        total_gain_loss,
        total_gain_loss_percent: percent_of(total_gain_loss, cost_basis),
        overall_return,
        overall_return_percent: percent_of(overall_return, portfolio.initial_deposit),
        position_count: positions.len(),
        today_change,
    }
}

/// 섹터별 자산 배분 (현금 포함)
pub fn allocation_by_sector(positions: &[EnrichedPosition], cash: Decimal) -> Vec<AllocationSlice> {
    let mut groups: Vec<(String, Decimal)> = Vec::new();

    for valuation in positions.iter().filter_map(|p| p.valuation.as_ref()) {
        let sector = if valuation.sector.is_empty() { OTHER_SECTOR } else { valuation.sector.as_str() };

        match groups.iter_mut().find(|(name, _)| name == sector) {
            Some((_, value)) => *value += valuation.market_value,
            None => groups.push((sector.to_string(), valuation.market_value)),
        }
    }

    build_slices(groups, cash)
}

/// 종목별 자산 배분 (현금 포함)
pub fn allocation_by_ticker(positions: &[EnrichedPosition], cash: Decimal) -> Vec<AllocationSlice> {
    let groups = positions
        .iter()
        .filter_map(|p| p.valuation.as_ref().map(|v| (p.position.symbol.clone(), v.market_value)))
        .collect();

    build_slices(groups, cash)
}

fn build_slices(groups: Vec<(String, Decimal)>, cash: Decimal) -> Vec<AllocationSlice> {
    let invested: Decimal = groups.iter().map(|(_, value)| *value).sum();
    let total_value = invested + cash;

    if total_value.is_zero() {
        return vec![AllocationSlice {
            name: CASH_SLICE.to_string(),
            value: Decimal::ZERO,
            percent: Decimal::ONE_HUNDRED,
        }];
    }

    let mut slices: Vec<AllocationSlice> = groups
        .into_iter()
        .map(|(name, value)| AllocationSlice {
            name,
            value,
            percent: percent_of(value, total_value),
        })
        .collect();

    if cash > Decimal::ZERO {
        slices.push(AllocationSlice {
            name: CASH_SLICE.to_string(),
            value: cash,
            percent: percent_of(cash, total_value),
        });
    }

    slices
}
