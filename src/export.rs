//! CSV 내보내기 (거래 내역, 보유 종목)

use std::io::Write;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::SimError;
use crate::models::position::{EnrichedPosition, PositionValuation};
use crate::models::transaction::{Transaction, TransactionStatus, TransactionType};

#[derive(Serialize)]
struct TransactionRow<'a> {
    date: String,
    #[serde(rename = "type")]
    transaction_type: &'static str,
    symbol: &'a str,
    quantity: Option<u32>,
    price: String,
    total: String,
    status: &'static str,
}

#[derive(Serialize)]
struct HoldingRow<'a> {
    symbol: &'a str,
    name: &'a str,
    quantity: u32,
    avg_cost: String,
    current_price: String,
    market_value: String,
    gain_loss: String,
    gain_loss_percent: String,
}

/// 거래 내역 CSV (원장 순서 그대로)
pub fn write_transactions<W: Write>(writer: W, transactions: &[Transaction]) -> Result<(), SimError> {
    let mut csv = csv::Writer::from_writer(writer);

    for tx in transactions {
        csv.serialize(TransactionRow {
            date: tx.date.to_rfc3339(),
            transaction_type: type_label(tx.transaction_type),
            symbol: tx.symbol.as_deref().unwrap_or(""),
            quantity: tx.quantity,
            price: tx.price.map(|p| p.round_dp(2).to_string()).unwrap_or_default(),
            total: tx.total.round_dp(2).to_string(),
            status: status_label(tx.status),
        })?;
    }

    csv.flush()?;
    Ok(())
}

/// 보유 종목 CSV. 시세가 없는 종목은 평가 열을 비워 둔다
pub fn write_holdings<W: Write>(writer: W, positions: &[EnrichedPosition]) -> Result<(), SimError> {
    let mut csv = csv::Writer::from_writer(writer);

    for p in positions {
        let valuation = p.valuation.as_ref();
        let field = |f: fn(&PositionValuation) -> Decimal| {
            valuation.map(|v| f(v).round_dp(2).to_string()).unwrap_or_default()
        };

        csv.serialize(HoldingRow {
            symbol: &p.position.symbol,
            name: &p.position.name,
            quantity: p.position.quantity,
            avg_cost: p.position.avg_cost.round_dp(2).to_string(),
            current_price: field(|v| v.current_price),
            market_value: field(|v| v.market_value),
            gain_loss: field(|v| v.gain_loss),
            gain_loss_percent: field(|v| v.gain_loss_percent),
        })?;
    }

    csv.flush()?;
    Ok(())
}

pub fn transactions_csv(transactions: &[Transaction]) -> Result<String, SimError> {
    let mut buffer = Vec::new();
    write_transactions(&mut buffer, transactions)?;
    into_string(buffer)
}

pub fn holdings_csv(positions: &[EnrichedPosition]) -> Result<String, SimError> {
    let mut buffer = Vec::new();
    write_holdings(&mut buffer, positions)?;
    into_string(buffer)
}

fn into_string(buffer: Vec<u8>) -> Result<String, SimError> {
    String::from_utf8(buffer).map_err(|e| SimError::StorageError(format!("CSV output is not UTF-8: {}", e)))
}

fn type_label(kind: TransactionType) -> &'static str {
    match kind {
        TransactionType::Buy => "BUY",
        TransactionType::Sell => "SELL",
        TransactionType::Deposit => "DEPOSIT",
    }
}

fn status_label(status: TransactionStatus) -> &'static str {
    match status {
        TransactionStatus::Pending => "PENDING",
        TransactionStatus::Completed => "COMPLETED",
        TransactionStatus::Failed => "FAILED",
    }
}
