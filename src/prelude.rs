//! Bodega prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    catalog::{CatalogError, build_inventory, load_inventory, parse_products, parse_promotions},
    console::ConsoleIo,
    inventory::{Inventory, InventoryError, OrderError, PromotionAssessment},
    membership::{Membership, MembershipError},
    orders::{Order, OrderLine},
    prices::{Price, format_won},
    products::{Product, ProductError},
    promotions::{Promotion, PromotionBook, PromotionError, PromotionKey},
    receipt::Receipt,
    requests::{OrderRequest, RequestError, parse_order},
    session::{Session, SessionError, StoreIo},
};
