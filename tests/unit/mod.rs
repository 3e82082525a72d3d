//! Integration suite for end-to-end order-flow scenarios. OrderID
//! round-trip is covered inline in `src/ids.rs` and again as a property in
//! `tests/property_tests.rs`.

mod support;

mod s1_simple_cross;
mod s2_market_rewrite;
mod s3_all_or_none_retention;
mod s4_fill_or_kill_drop;
mod s5_flush_by_count;
mod s6_modify_illegal;
