//! Hotel back-office ledger: a loyalty tier engine and a billing ledger that
//! keeps bills, payments and food-order charges consistent.
//!
//! The crate is split into `domain` (entities, rules and store ports),
//! `application` (services over the ports), `infrastructure` (store adapters)
//! and `interfaces` (journal input and CSV reports).

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
pub mod logging;
