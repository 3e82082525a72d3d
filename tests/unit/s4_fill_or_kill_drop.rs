//! FillOrKill dropped at first flush when unmatchable.

use crate::support::{make_exchange, register};
use xchange::{OrderType, RequestAction, Side};

#[test]
fn fill_or_kill_is_dropped_at_first_flush_when_unmatchable() {
    let exchange = make_exchange(1);
    exchange.trade_new_symbol("SPY");
    let seller = register(&exchange, "SELLER");
    let buyer = register(&exchange, "P1");

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

    let fok_id = exchange
        .place_order(
            &buyer,
            RequestAction::Add,
            None,
            Some("SPY"),
            Some(Side::Buy),
            Some(OrderType::FillOrKill),
            Some(10_000),
            Some(10),
            None,
            None,
        )
        .unwrap()
        .expect("minted an id");

    let book = exchange.get_order_book("SPY").unwrap();
    assert!(book.trades().is_empty());
    assert!(book.level(Side::Buy, 10_000).is_none());

    // dropped, never resting: a modify against it is neither accepted nor panics
    let modify = exchange.place_order(
        &buyer,
        RequestAction::Modify,
        Some(fok_id),
        Some("SPY"),
        Some(Side::Buy),
        Some(OrderType::FillOrKill),
        Some(10_000),
        Some(5),
        None,
        None,
    );
    assert!(modify.is_ok());
}
