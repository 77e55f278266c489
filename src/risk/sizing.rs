// Position sizing helpers. Both functions floor to whole shares and
// never return a negative quantity.

/// Share quantity for a fixed portfolio fraction of the balance.
/// Non-positive prices and non-finite intermediate results size to 0.
pub fn portfolio_qty(balance: f64, portfolio_pct: f64, price: f64) -> i64 {
    if price <= 0.0 {
        return 0;
    }
    let qty = balance * portfolio_pct / price;
    if !qty.is_finite() {
        return 0;
    }
    (qty.floor() as i64).max(0)
}

/// Share quantity that risks `risk_per_trade` of equity between the
/// entry and its protective stop. A stop at or above the entry sizes
/// to 0.
pub fn position_size(equity: f64, entry: f64, stop: f64, risk_per_trade: f64) -> i64 {
    let risk_per_share = entry - stop;
    if risk_per_share <= 0.0 {
        return 0;
    }
    let qty = equity * risk_per_trade / risk_per_share;
    if !qty.is_finite() {
        return 0;
    }
    (qty.floor() as i64).max(0)
}
