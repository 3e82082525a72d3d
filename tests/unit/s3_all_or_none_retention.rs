//! AllOrNone retention until sufficient opposing liquidity exists.

use crate::support::{make_exchange, register};
use xchange::{OrderType, RequestAction, Side};

#[test]
fn all_or_none_is_retained_until_enough_liquidity_exists() {
    let exchange = make_exchange(1);
    exchange.trade_new_symbol("SPY");
    let seller = register(&exchange, "SELLER");
    let buyer = register(&exchange, "P1");

    // asks total 8, within the AllOrNone bid's limit price
    for (price, qty) in [(9_500, 5), (9_800, 3)] {
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
            Some(OrderType::AllOrNone),
            Some(10_000),
            Some(10),
            None,
            None,
        )
        .unwrap();

    let book = exchange.get_order_book("SPY").unwrap();
    assert!(book.trades().is_empty());
    assert!(book.level(Side::Buy, 10_000).is_none());

    // asks grow to 11, still no re-evaluation until the bid side flushes again
    exchange
        .place_order(
            &seller,
            RequestAction::Add,
            None,
            Some("SPY"),
            Some(Side::Sell),
            Some(OrderType::GoodTillCancel),
            Some(9_000),
            Some(3),
            None,
            None,
        )
        .unwrap();
    assert!(book.trades().is_empty());

    // any further submission on the bid side forces a re-evaluation of the
    // retained AllOrNone order, which now finds enough opposing liquidity
    exchange
        .place_order(
            &buyer,
            RequestAction::Add,
            None,
            Some("SPY"),
            Some(Side::Buy),
            Some(OrderType::GoodTillCancel),
            Some(100),
            Some(1),
            None,
            None,
        )
        .unwrap();

    let trades = book.trades();
    let total_qty: u64 = trades.iter().map(|t| t.quantity()).sum();
    assert_eq!(total_qty, 10);
    assert!(book.level(Side::Buy, 10_000).is_none());
}
