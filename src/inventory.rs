//! Inventory

use chrono::NaiveDate;
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;
use tracing::debug;

use crate::{
    orders::OrderLine,
    prices::Price,
    products::{Product, ProductError},
    promotions::{Promotion, PromotionBook, PromotionKey},
    requests::OrderRequest,
};

/// Errors related to inventory construction or mutation.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Two plain records share a name.
    #[error("duplicate plain record for product {name:?}")]
    DuplicateProduct {
        /// The repeated product name
        name: String,
    },

    /// Two promotional records share a name.
    #[error("duplicate promotional record for product {name:?}")]
    DuplicatePromotion {
        /// The repeated product name
        name: String,
    },

    /// Wrapped product construction error.
    #[error(transparent)]
    Product(#[from] ProductError),

    /// Internal inventory invariant was violated (this is a bug).
    #[error("inventory invariant violated: {message}")]
    InvariantViolation {
        /// What invariant was violated
        message: &'static str,
    },
}

/// Errors raised while checking an order against the inventory.
#[derive(Debug, Error)]
pub enum OrderError {
    /// No record carries the requested name.
    #[error("unknown product {name:?}")]
    UnknownProduct {
        /// The requested product name
        name: String,
    },

    /// Combined stock cannot cover the requested quantity.
    #[error("not enough stock of {name:?} to cover the order")]
    OutOfStock {
        /// The requested product name
        name: String,
    },
}

/// How a request against promotional stock plays out on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionAssessment {
    /// Promotional stock cannot cover the whole request; part of it would be
    /// charged at full price.
    InsufficientStock {
        /// Units that would not get the promotion price
        full_price_quantity: u32,
        /// Units drawn from promotional stock
        promotion_quantity: u32,
        /// Units drawn from plain stock
        normal_quantity: u32,
        /// Free units inside the promotional part
        free_quantity: u32,
        /// Unit price of the promotional record
        unit_price: Price,
    },

    /// The request qualifies for more free units than it asked for.
    BelowQuantity {
        /// Units requested, all from promotional stock
        promotion_quantity: u32,
        /// Extra free units the shopper may take on top
        additional_quantity: u32,
        /// Unit price of the promotional record
        unit_price: Price,
    },

    /// The request is served from promotional stock as-is.
    ExactQuantity {
        /// Units requested, all from promotional stock
        promotion_quantity: u32,
        /// Free units inside the request
        free_quantity: u32,
        /// Unit price of the promotional record
        unit_price: Price,
    },
}

/// Positions of the records listed under one product name.
#[derive(Debug, Clone, Copy)]
struct Listing {
    promotional: Option<usize>,
    plain: usize,
}

/// The store's stock: product records with their promotions, indexed by name.
///
/// Every name resolves to exactly one plain record and at most one
/// promotional record. A product listed only promotionally gets a plain
/// record with zero stock materialized at construction, so the plain variant
/// is always addressable.
#[derive(Debug)]
pub struct Inventory {
    records: Vec<Product>,
    index: FxHashMap<String, Listing>,
    promotions: PromotionBook,
}

impl Inventory {
    /// Build an inventory from product records and the promotions they
    /// reference.
    ///
    /// # Errors
    ///
    /// Returns an [`InventoryError`] if a name carries two plain or two
    /// promotional records, or a record references a promotion missing from
    /// the book.
    pub fn from_products(
        products: impl Into<Vec<Product>>,
        promotions: PromotionBook,
    ) -> Result<Self, InventoryError> {
        let products = products.into();

        let plain_names = reject_duplicates(&products, &promotions)?;
        let records = materialize_plain_records(products, &plain_names)?;
        let index = index_records(&records)?;

        Ok(Inventory {
            records,
            index,
            promotions,
        })
    }

    /// All records in listing order, promotional variants ahead of their
    /// plain counterparts.
    pub fn products(&self) -> &[Product] {
        &self.records
    }

    /// Fetch a promotion by key.
    pub fn promotion(&self, key: PromotionKey) -> Option<&Promotion> {
        self.promotions.get(key)
    }

    /// Check that every request can be served from current stock. Checks
    /// feasibility only and never mutates.
    ///
    /// All names are checked for existence before any stock is considered,
    /// so an order with both an unknown name and an infeasible quantity
    /// reports the unknown name.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] naming the first unknown product or the
    /// first product whose stock cannot cover the request.
    pub fn validate_order(
        &self,
        requests: &[OrderRequest],
        today: NaiveDate,
    ) -> Result<(), OrderError> {
        for request in requests {
            self.listing(request.name())?;
        }

        for request in requests {
            self.validate_request(request, today)?;
        }

        Ok(())
    }

    /// Assess how promotional stock would serve the request today.
    ///
    /// Returns `None` unless the product has a promotional record whose
    /// promotion is active today and whose stock is above zero; callers then
    /// fall back to [`Inventory::plain_line`].
    pub fn resolve_promotion(
        &self,
        request: &OrderRequest,
        today: NaiveDate,
    ) -> Option<PromotionAssessment> {
        let listing = self.index.get(request.name())?;
        let record = self.record(listing.promotional?);
        let promotion = self.active_promotion(record, today)?;

        let stock = record.quantity();
        if stock == 0 {
            return None;
        }

        let quantity = request.quantity();
        if stock < quantity {
            return Some(insufficient_stock(stock, quantity, promotion, record.price()));
        }

        Some(covered(stock, quantity, promotion, record.price()))
    }

    /// Order line for the request served entirely from the plain record.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::UnknownProduct`] if no record carries the name.
    pub fn plain_line(&self, request: &OrderRequest) -> Result<OrderLine, OrderError> {
        let listing = self.listing(request.name())?;
        let record = self.record(listing.plain);

        Ok(OrderLine::plain(
            record.name(),
            request.quantity(),
            record.price(),
        ))
    }

    /// Remove the stock consumed by the given order lines.
    ///
    /// Per line: the promotional record loses `promotion_quantity` units when
    /// the promotion applied, and the plain record loses `normal_quantity`
    /// units when that is above zero. Lines that applied no promotion and
    /// drew nothing from plain stock leave the inventory untouched.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::InvariantViolation`] if a line names a
    /// missing record or would drive stock negative. Lines must come from a
    /// validated order; no re-validation happens here.
    pub fn deduct(&mut self, lines: &[OrderLine]) -> Result<(), InventoryError> {
        for line in lines {
            self.deduct_line(line)?;
        }

        Ok(())
    }

    fn deduct_line(&mut self, line: &OrderLine) -> Result<(), InventoryError> {
        let Some(listing) = self.index.get(line.name()).copied() else {
            return Err(InventoryError::InvariantViolation {
                message: "order line names a product missing from inventory",
            });
        };

        if line.promotion_applied() {
            let Some(position) = listing.promotional else {
                return Err(InventoryError::InvariantViolation {
                    message: "promotion applied without a promotional record",
                });
            };

            if !self.record_mut(position).deduct(line.promotion_quantity()) {
                return Err(InventoryError::InvariantViolation {
                    message: "promotional stock would go negative",
                });
            }

            debug!(
                name = line.name(),
                units = line.promotion_quantity(),
                "deducted promotional stock"
            );
        }

        if line.normal_quantity() > 0 {
            if !self.record_mut(listing.plain).deduct(line.normal_quantity()) {
                return Err(InventoryError::InvariantViolation {
                    message: "plain stock would go negative",
                });
            }

            debug!(
                name = line.name(),
                units = line.normal_quantity(),
                "deducted plain stock"
            );
        }

        Ok(())
    }

    fn validate_request(&self, request: &OrderRequest, today: NaiveDate) -> Result<(), OrderError> {
        let listing = self.listing(request.name())?;
        let plain_stock = self.record(listing.plain).quantity();

        if let Some(position) = listing.promotional {
            let record = self.record(position);
            if self.active_promotion(record, today).is_some() {
                let shortfall = request.quantity().saturating_sub(record.quantity());
                if shortfall > plain_stock {
                    return Err(OrderError::OutOfStock {
                        name: request.name().to_owned(),
                    });
                }
                return Ok(());
            }
        }

        if plain_stock < request.quantity() {
            return Err(OrderError::OutOfStock {
                name: request.name().to_owned(),
            });
        }

        Ok(())
    }

    fn listing(&self, name: &str) -> Result<Listing, OrderError> {
        let Some(listing) = self.index.get(name) else {
            return Err(OrderError::UnknownProduct {
                name: name.to_owned(),
            });
        };

        Ok(*listing)
    }

    fn active_promotion(&self, record: &Product, today: NaiveDate) -> Option<&Promotion> {
        let promotion = self.promotions.get(record.promotion()?)?;

        promotion.is_active(today).then_some(promotion)
    }

    fn record(&self, position: usize) -> &Product {
        let Some(record) = self.records.get(position) else {
            unreachable!("index positions always point into the record list")
        };

        record
    }

    fn record_mut(&mut self, position: usize) -> &mut Product {
        let Some(record) = self.records.get_mut(position) else {
            unreachable!("index positions always point into the record list")
        };

        record
    }
}

/// Reject duplicate plain and promotional records, returning the names that
/// already have a plain record.
fn reject_duplicates(
    products: &[Product],
    promotions: &PromotionBook,
) -> Result<FxHashSet<String>, InventoryError> {
    let mut plain_names = FxHashSet::default();
    let mut promotional_names = FxHashSet::default();

    for product in products {
        if let Some(key) = product.promotion() {
            if promotions.get(key).is_none() {
                return Err(InventoryError::InvariantViolation {
                    message: "product references a promotion missing from the book",
                });
            }
            if !promotional_names.insert(product.name().to_owned()) {
                return Err(InventoryError::DuplicatePromotion {
                    name: product.name().to_owned(),
                });
            }
        } else if !plain_names.insert(product.name().to_owned()) {
            return Err(InventoryError::DuplicateProduct {
                name: product.name().to_owned(),
            });
        }
    }

    Ok(plain_names)
}

/// Give every promotion-only product a zero-stock plain record directly
/// after its promotional record, preserving listing order.
fn materialize_plain_records(
    products: Vec<Product>,
    plain_names: &FxHashSet<String>,
) -> Result<Vec<Product>, InventoryError> {
    let mut records = Vec::with_capacity(products.len());

    for product in products {
        let needs_plain = product.has_promotion() && !plain_names.contains(product.name());

        if needs_plain {
            let plain = Product::new(product.name(), product.price(), 0, None)?;
            records.push(product);
            records.push(plain);
        } else {
            records.push(product);
        }
    }

    Ok(records)
}

fn index_records(records: &[Product]) -> Result<FxHashMap<String, Listing>, InventoryError> {
    let mut index = FxHashMap::default();

    for (position, record) in records.iter().enumerate() {
        if !record.has_promotion() {
            index.insert(
                record.name().to_owned(),
                Listing {
                    promotional: None,
                    plain: position,
                },
            );
        }
    }

    for (position, record) in records.iter().enumerate() {
        if record.has_promotion() {
            let Some(listing) = index.get_mut(record.name()) else {
                return Err(InventoryError::InvariantViolation {
                    message: "promotional record without a plain counterpart",
                });
            };
            listing.promotional = Some(position);
        }
    }

    Ok(index)
}

/// Assessment when promotional stock falls short of the request.
fn insufficient_stock(
    stock: u32,
    quantity: u32,
    promotion: &Promotion,
    unit_price: Price,
) -> PromotionAssessment {
    // The bundle counts the free unit, hence the `buy + 1` divisor.
    let bundle = u64::from(promotion.buy()) + 1;
    let free_quantity = narrowed(u64::from(stock) / bundle);
    let leftover = narrowed(u64::from(stock) % bundle);
    let normal_quantity = quantity - stock;

    PromotionAssessment::InsufficientStock {
        full_price_quantity: normal_quantity + leftover,
        promotion_quantity: stock,
        normal_quantity,
        free_quantity,
        unit_price,
    }
}

/// Assessment when promotional stock covers the request.
fn covered(
    stock: u32,
    quantity: u32,
    promotion: &Promotion,
    unit_price: Price,
) -> PromotionAssessment {
    let earned =
        narrowed(u64::from(quantity) / u64::from(promotion.buy()) * u64::from(promotion.get()));

    if quantity < stock && quantity % promotion.buy() == 0 {
        return PromotionAssessment::BelowQuantity {
            promotion_quantity: quantity,
            additional_quantity: earned,
            unit_price,
        };
    }

    PromotionAssessment::ExactQuantity {
        promotion_quantity: quantity,
        free_quantity: earned,
        unit_price,
    }
}

fn narrowed(value: u64) -> u32 {
    let Ok(value) = u32::try_from(value) else {
        unreachable!("quantities derived from u32 stock always fit back into u32")
    };

    value
}
