//! Illegal side-changing modify is rejected and leaves the book unchanged.

use crate::support::{make_exchange, register};
use xchange::{ExchangeError, OrderType, RequestAction, Side};

#[test]
fn modify_changing_side_is_rejected_and_book_is_unchanged() {
    let exchange = make_exchange(1);
    exchange.trade_new_symbol("SPY");
    let p1 = register(&exchange, "P1");

    let old_id = exchange
        .place_order(
            &p1,
            RequestAction::Add,
            None,
            Some("SPY"),
            Some(Side::Buy),
            Some(OrderType::GoodTillCancel),
            Some(10_000),
            Some(10),
            None,
            None,
        )
        .unwrap()
        .expect("minted an id");

    let book = exchange.get_order_book("SPY").unwrap();
    assert!(book.level(Side::Buy, 10_000).is_some());

    let result = exchange.place_order(
        &p1,
        RequestAction::Modify,
        Some(old_id),
        Some("SPY"),
        Some(Side::Sell),
        Some(OrderType::GoodTillCancel),
        Some(10_000),
        Some(10),
        None,
        None,
    );

    assert_eq!(result, Err(ExchangeError::IllegalModify));
    // rejected before any book mutation: the original bid still rests
    assert_eq!(book.level(Side::Buy, 10_000).unwrap().aggregate_quantity(), 10);
}
