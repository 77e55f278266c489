use crate::models::{Order, OrderSide};

/// Entry order plus its three protective legs. The stop covers the
/// full quantity; the two targets split it.
#[derive(Debug, Clone, PartialEq)]
pub struct BracketOrder {
    pub entry: Order,
    pub stop: Order,
    pub target1: Order,
    pub target2: Order,
}

impl BracketOrder {
    /// All four legs in submission order.
    pub fn orders(&self) -> [&Order; 4] {
        [&self.entry, &self.stop, &self.target1, &self.target2]
    }
}

/// Build a long bracket at explicit price levels. The first target
/// takes half the position (rounded down), the runner takes the rest.
pub fn build_bracket(
    symbol: &str,
    qty: i64,
    entry_price: f64,
    stop_price: f64,
    target1_price: f64,
    target2_price: f64,
) -> BracketOrder {
    let half = qty / 2;
    BracketOrder {
        entry: Order::new(symbol, qty, OrderSide::Buy, entry_price),
        stop: Order::new(symbol, qty, OrderSide::Sell, stop_price),
        target1: Order::new(symbol, half, OrderSide::Sell, target1_price),
        target2: Order::new(symbol, qty - half, OrderSide::Sell, target2_price),
    }
}
