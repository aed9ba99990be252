//! Bodega
//!
//! Bodega is a promotion-aware checkout engine for a small convenience store, with an interactive console front end.

pub mod catalog;
pub mod console;
pub mod fixtures;
pub mod inventory;
pub mod membership;
pub mod orders;
pub mod prelude;
pub mod prices;
pub mod products;
pub mod promotions;
pub mod receipt;
pub mod requests;
pub mod session;
