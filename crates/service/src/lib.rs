//! Service layer for the menu and order book.
//! - `storage` owns every byte read from or written to disk.
//! - `menu` and `orders` hold the business rules on top of it.
//! - `guard` decides who may reach privileged operations.

pub mod errors;
pub mod guard;
pub mod json;
pub mod menu;
pub mod orders;
pub mod runtime;
pub mod storage;
