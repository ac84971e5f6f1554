//! Property-based tests
//!
//! Uses proptest to check pagination arithmetic and search tokenization
//! over generated inputs.

mod pagination_proptest;
mod search_proptest;
