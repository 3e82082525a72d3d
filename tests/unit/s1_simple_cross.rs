//! Simple cross: a resting ask fully filled by a marketable bid.

use crate::support::{make_exchange, register};
use xchange::{OrderType, RequestAction, Side};

#[test]
fn simple_cross_settles_at_passive_price() {
    let exchange = make_exchange(1);
    exchange.trade_new_symbol("SPY");
    let p1 = register(&exchange, "P1");
    let p2 = register(&exchange, "P2");

    exchange
        .place_order(
            &p1,
            RequestAction::Add,
            None,
            Some("SPY"),
            Some(Side::Buy),
            Some(OrderType::GoodTillCancel),
            Some(10_000),
            Some(20),
            None,
            None,
        )
        .unwrap();
    exchange
        .place_order(
            &p2,
            RequestAction::Add,
            None,
            Some("SPY"),
            Some(Side::Sell),
            Some(OrderType::GoodTillCancel),
            Some(9_500),
            Some(15),
            None,
            None,
        )
        .unwrap();

    let book = exchange.get_order_book("SPY").unwrap();
    let trades = book.trades();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].settlement_price(), 9_500);
    assert_eq!(trades[0].quantity(), 15);

    assert_eq!(book.level(Side::Buy, 10_000).unwrap().aggregate_quantity(), 5);
    assert!(book.level(Side::Sell, 9_500).is_none());
}
