//! Market-order price rewrite and multi-level drain.

use crate::support::{make_exchange, register};
use xchange::{OrderType, RequestAction, Side};

#[test]
fn market_order_rewrites_price_and_drains_multiple_levels() {
    let exchange = make_exchange(1);
    exchange.trade_new_symbol("SPY");
    let seller = register(&exchange, "SELLER");
    let buyer = register(&exchange, "P1");

    for (price, qty) in [(9_500, 10), (9_900, 5)] {
        exchange
            .place_order(
                &seller,
                RequestAction::Add,
                None,
                Some("SPY"),
                Some(Side::Sell),
                Some(OrderType::GoodTillCancel),
                Some(price),
                Some(qty),
                None,
                None,
            )
            .unwrap();
    }

    exchange
        .place_order(
            &buyer,
            RequestAction::Add,
            None,
            Some("SPY"),
            Some(Side::Buy),
            Some(OrderType::Market),
            Some(0),
            Some(20),
            None,
            None,
        )
        .unwrap();

    let book = exchange.get_order_book("SPY").unwrap();
    let trades = book.trades();
    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].settlement_price(), 9_500);
    assert_eq!(trades[1].settlement_price(), 9_900);

    // residual 5 resting on bid side at the rewritten worst price, reclassified GTC
    let resting = book.level(Side::Buy, 9_900).unwrap();
    assert_eq!(resting.aggregate_quantity(), 5);
}
