//! Domain layer: loyalty tiers, bills, food orders and the store ports they
//! are persisted through. Nothing in here performs I/O.

pub mod bill;
pub mod command;
pub mod food_order;
pub mod identity;
pub mod loyalty;
pub mod money;
pub mod ports;
pub mod tier;
