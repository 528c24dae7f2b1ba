use rust_decimal::Decimal;

use crate::error::SimError;
use crate::models::order::{OrderRequest, OrderSide, OrderType};
use crate::models::stock::Stock;

/// 주문 검증기 인터페이스
pub trait OrderValidator: Send + Sync {
    /// 주문 검증 (현재 시세 기준)
    fn validate(&self, side: OrderSide, order: &OrderRequest, quote: &Stock) -> Result<(), SimError>;
}

/// 기본 주문 검증기 - 수량 범위
pub struct BasicOrderValidator {
    max_quantity: u32,
}

impl BasicOrderValidator {
    pub fn new(max_quantity: u32) -> Self {
        BasicOrderValidator { max_quantity }
    }
}

impl OrderValidator for BasicOrderValidator {
    fn validate(&self, _side: OrderSide, order: &OrderRequest, _quote: &Stock) -> Result<(), SimError> {
        if order.quantity == 0 {
            return Err(SimError::InvalidParameter("Order quantity must be positive".to_string()));
        }

        if order.quantity > self.max_quantity {
            return Err(SimError::InvalidParameter(format!(
                "Order quantity too large, maximum: {}",
                self.max_quantity
            )));
        }

        Ok(())
    }
}

/// 지정가 주문 검증기
///
/// 지정가는 양수여야 하고, 즉시 체결 가능한 가격이어야 한다
/// (매수 지정가 ≥ 현재가, 매도 지정가 ≤ 현재가).
pub struct LimitPriceValidator;

impl OrderValidator for LimitPriceValidator {
    fn validate(&self, side: OrderSide, order: &OrderRequest, quote: &Stock) -> Result<(), SimError> {
        if order.order_type != OrderType::Limit {
            return Ok(());
        }

        let limit_price = match order.limit_price {
            Some(price) if price > Decimal::ZERO => price,
            _ => {
                return Err(SimError::InvalidParameter(
                    "Limit orders require a positive limit price".to_string(),
                ))
            }
        };

        let marketable = match side {
            OrderSide::Buy => limit_price >= quote.price,
            OrderSide::Sell => limit_price <= quote.price,
        };

        if !marketable {
            return Err(SimError::InvalidParameter(format!(
                "Limit price {} is not marketable at current price {}",
                limit_price, quote.price
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::catalog::StockCatalog;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn aapl() -> Stock {
        StockCatalog::default().quote("AAPL").unwrap()
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(100, true)]
    #[case(101, false)]
    fn test_quantity_bounds(#[case] quantity: u32, #[case] ok: bool) {
        let validator = BasicOrderValidator::new(100);
        let order = OrderRequest::market("AAPL", quantity);

        assert_eq!(validator.validate(OrderSide::Buy, &order, &aapl()).is_ok(), ok);
    }

    #[rstest]
    #[case(OrderSide::Buy, dec!(180), true)]
    #[case(OrderSide::Buy, dec!(175.43), true)]
    #[case(OrderSide::Buy, dec!(170), false)]
    #[case(OrderSide::Sell, dec!(170), true)]
    #[case(OrderSide::Sell, dec!(180), false)]
    fn test_limit_marketability(#[case] side: OrderSide, #[case] limit: Decimal, #[case] ok: bool) {
        let order = OrderRequest::limit("AAPL", 1, limit);
        assert_eq!(LimitPriceValidator.validate(side, &order, &aapl()).is_ok(), ok);
    }

    #[test]
    fn test_limit_requires_price() {
        let mut order = OrderRequest::limit("AAPL", 1, dec!(180));
        order.limit_price = None;

        let err = LimitPriceValidator.validate(OrderSide::Buy, &order, &aapl()).unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter(_)));

        let market = OrderRequest::market("AAPL", 1);
        assert!(LimitPriceValidator.validate(OrderSide::Buy, &market, &aapl()).is_ok());
    }
}
