//! Session

use std::io;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    inventory::{Inventory, InventoryError, OrderError, PromotionAssessment},
    membership::Membership,
    orders::{Order, OrderLine},
    receipt::Receipt,
    requests::{OrderRequest, parse_order},
};

/// Console boundary of a checkout session.
///
/// Implementations own the prompt wording. Yes-or-no prompts keep asking
/// until the shopper answers exactly `Y` or `N`.
pub trait StoreIo {
    /// Show the welcome banner and the current stock.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] if the console cannot be written.
    fn show_catalog(&mut self, inventory: &Inventory) -> io::Result<()>;

    /// Prompt for and read one raw order string.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] if the console cannot be read or written.
    fn read_order(&mut self) -> io::Result<String>;

    /// Ask whether to buy `quantity` units of `name` at full price.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] if the console cannot be read or written.
    fn confirm_full_price(&mut self, name: &str, quantity: u32) -> io::Result<bool>;

    /// Ask whether to take `quantity` more free units of `name`.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] if the console cannot be read or written.
    fn confirm_bonus(&mut self, name: &str, quantity: u32) -> io::Result<bool>;

    /// Ask whether to apply the membership discount.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] if the console cannot be read or written.
    fn confirm_membership(&mut self) -> io::Result<bool>;

    /// Print the receipt.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] if the console cannot be written.
    fn show_receipt(&mut self, receipt: &Receipt<'_>) -> io::Result<()>;

    /// Ask whether to start another transaction.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] if the console cannot be read or written.
    fn confirm_continue(&mut self) -> io::Result<bool>;

    /// Report a recoverable input error.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] if the console cannot be written.
    fn show_error(&mut self, message: &str) -> io::Result<()>;
}

/// Errors that end a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The console could not be read or written.
    #[error("console io failed")]
    Io(#[from] io::Error),

    /// Wrapped inventory error.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Wrapped order error that escaped validation.
    #[error(transparent)]
    Order(#[from] OrderError),
}

/// Interactive checkout loop over an inventory.
///
/// Each transaction shows the catalog, collects a valid order, resolves
/// every line against today's promotions, prints the receipt, and only then
/// deducts the sold stock.
#[derive(Debug)]
pub struct Session<Io> {
    inventory: Inventory,
    membership: Membership,
    today: NaiveDate,
    io: Io,
}

impl<Io: StoreIo> Session<Io> {
    /// Create a session over the given inventory and console.
    pub fn new(inventory: Inventory, membership: Membership, today: NaiveDate, io: Io) -> Self {
        Session {
            inventory,
            membership,
            today,
            io,
        }
    }

    /// The inventory in its current state.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// The console behind the session.
    pub fn io(&self) -> &Io {
        &self.io
    }

    /// Run transactions until the shopper stops.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if the console fails or the inventory
    /// rejects a deduction.
    pub fn run(&mut self) -> Result<(), SessionError> {
        loop {
            self.io.show_catalog(&self.inventory)?;

            let requests = self.collect_requests()?;
            let lines = self.resolve_lines(&requests)?;
            let membership_elected = self.io.confirm_membership()?;

            let order = Order::new(lines, self.membership, membership_elected);

            self.io.show_receipt(&Receipt::new(&order))?;
            self.inventory.deduct(order.lines())?;

            info!(amount = order.final_amount(), "completed transaction");

            if !self.io.confirm_continue()? {
                return Ok(());
            }
        }
    }

    /// Read order strings until one parses and validates against stock.
    fn collect_requests(&mut self) -> Result<Vec<OrderRequest>, SessionError> {
        loop {
            let input = self.io.read_order()?;

            let requests = match parse_order(&input) {
                Ok(requests) => requests,
                Err(error) => {
                    debug!(%error, "rejected order input");
                    self.io.show_error(&error.to_string())?;
                    continue;
                }
            };

            match self.inventory.validate_order(&requests, self.today) {
                Ok(()) => return Ok(requests),
                Err(error) => {
                    debug!(%error, "rejected order input");
                    self.io.show_error(&error.to_string())?;
                }
            }
        }
    }

    fn resolve_lines(&mut self, requests: &[OrderRequest]) -> Result<Vec<OrderLine>, SessionError> {
        let mut lines = Vec::with_capacity(requests.len());

        for request in requests {
            lines.push(self.resolve_line(request)?);
        }

        Ok(lines)
    }

    /// Turn one validated request into an order line, prompting where the
    /// promotion leaves the shopper a choice.
    fn resolve_line(&mut self, request: &OrderRequest) -> Result<OrderLine, SessionError> {
        let Some(assessment) = self.inventory.resolve_promotion(request, self.today) else {
            return Ok(self.inventory.plain_line(request)?);
        };

        match assessment {
            PromotionAssessment::InsufficientStock {
                full_price_quantity,
                promotion_quantity,
                normal_quantity,
                free_quantity,
                unit_price,
            } => {
                if self.io.confirm_full_price(request.name(), full_price_quantity)? {
                    Ok(OrderLine::mixed(
                        request.name(),
                        promotion_quantity,
                        normal_quantity,
                        free_quantity,
                        unit_price,
                    ))
                } else {
                    Ok(OrderLine::promotion_only(
                        request.name(),
                        promotion_quantity,
                        free_quantity,
                        unit_price,
                    ))
                }
            }
            PromotionAssessment::BelowQuantity {
                promotion_quantity,
                additional_quantity,
                unit_price,
            } => {
                if self.io.confirm_bonus(request.name(), additional_quantity)? {
                    Ok(OrderLine::with_additional(
                        request.name(),
                        promotion_quantity,
                        additional_quantity,
                        unit_price,
                    ))
                } else {
                    Ok(OrderLine::without_promotion(
                        request.name(),
                        promotion_quantity,
                        unit_price,
                    ))
                }
            }
            PromotionAssessment::ExactQuantity {
                promotion_quantity,
                free_quantity,
                unit_price,
            } => Ok(OrderLine::exact(
                request.name(),
                promotion_quantity,
                free_quantity,
                unit_price,
            )),
        }
    }
}
