use tracing::info;
use uuid::Uuid;

use super::{Broker, ProviderError};
use crate::models::Order;

/// Broker stand-in that records orders instead of routing them. The
/// balance is fixed at construction; fills are not simulated.
#[derive(Debug, Clone)]
pub struct PaperBroker {
    balance: f64,
    orders: Vec<Order>,
}

impl PaperBroker {
    pub fn new(balance: f64) -> Self {
        Self {
            balance,
            orders: Vec::new(),
        }
    }

    /// Orders accepted so far, in submission order.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }
}

impl Broker for PaperBroker {
    fn place_order(&mut self, order: &Order) -> Result<String, ProviderError> {
        if order.qty <= 0 {
            return Err(ProviderError::OrderRejected(format!(
                "non-positive qty {} for {}",
                order.qty, order.symbol
            )));
        }
        let order_id = Uuid::new_v4().to_string();
        info!(
            "📋 Paper order {}: {} {} {} @ {:.2}",
            order_id, order.side, order.qty, order.symbol, order.price
        );
        self.orders.push(order.clone());
        Ok(order_id)
    }

    fn get_balance(&self) -> Result<f64, ProviderError> {
        Ok(self.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderSide;

    #[test]
    fn test_records_accepted_orders() {
        let mut broker = PaperBroker::new(50_000.0);
        let order = Order::new("AAPL", 10, OrderSide::Buy, 180.0);
        let id = broker.place_order(&order).unwrap();
        assert!(!id.is_empty());
        assert_eq!(broker.orders(), &[order]);
    }

    #[test]
    fn test_rejects_non_positive_qty() {
        let mut broker = PaperBroker::new(50_000.0);
        let order = Order::new("AAPL", 0, OrderSide::Buy, 180.0);
        let err = broker.place_order(&order).unwrap_err();
        assert!(matches!(err, ProviderError::OrderRejected(_)));
        assert!(broker.orders().is_empty());
    }

    #[test]
    fn test_balance_is_fixed() {
        let broker = PaperBroker::new(12_345.0);
        assert_eq!(broker.get_balance().unwrap(), 12_345.0);
    }

    #[test]
    fn test_order_ids_are_unique() {
        let mut broker = PaperBroker::new(50_000.0);
        let order = Order::new("MSFT", 5, OrderSide::Sell, 400.0);
        let a = broker.place_order(&order).unwrap();
        let b = broker.place_order(&order).unwrap();
        assert_ne!(a, b);
    }
}
