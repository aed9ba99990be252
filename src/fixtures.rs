//! Fixtures

use std::{collections::VecDeque, io};

use crate::{
    catalog::{CatalogError, build_inventory},
    inventory::Inventory,
    receipt::Receipt,
    session::StoreIo,
};

/// Products catalog bundled with the binary.
pub const PRODUCTS_CATALOG: &str = include_str!("../resources/products.csv");

/// Promotions catalog bundled with the binary.
pub const PROMOTIONS_CATALOG: &str = include_str!("../resources/promotions.csv");

/// Build the inventory shipped with the binary.
///
/// # Errors
///
/// Returns a [`CatalogError`] if the bundled catalogs fail to parse.
pub fn builtin_inventory() -> Result<Inventory, CatalogError> {
    build_inventory(PRODUCTS_CATALOG, PROMOTIONS_CATALOG)
}

/// Scripted console for exercising sessions in tests.
///
/// Answers prompts from a queue of scripted lines and records everything the
/// session showed, with prompts tagged by kind so tests can assert on the
/// questions asked.
#[derive(Debug, Default)]
pub struct ScriptedIo {
    inputs: VecDeque<String>,
    shown: Vec<String>,
}

impl ScriptedIo {
    /// Create a scripted console that answers prompts with `inputs` in order.
    pub fn new(inputs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        ScriptedIo {
            inputs: inputs.into_iter().map(Into::into).collect(),
            shown: Vec::new(),
        }
    }

    /// Everything shown to the shopper, in order.
    pub fn shown(&self) -> &[String] {
        &self.shown
    }

    /// Whether any shown entry contains `needle`.
    pub fn saw(&self, needle: &str) -> bool {
        self.shown.iter().any(|entry| entry.contains(needle))
    }

    /// How many shown entries contain `needle`.
    pub fn count(&self, needle: &str) -> usize {
        self.shown
            .iter()
            .filter(|entry| entry.contains(needle))
            .count()
    }

    fn next_input(&mut self) -> io::Result<String> {
        let Some(input) = self.inputs.pop_front() else {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "script ran out of answers",
            ));
        };

        Ok(input)
    }

    fn confirm(&mut self) -> io::Result<bool> {
        loop {
            match self.next_input()?.as_str() {
                "Y" => return Ok(true),
                "N" => return Ok(false),
                _ => {}
            }
        }
    }
}

impl StoreIo for ScriptedIo {
    fn show_catalog(&mut self, inventory: &Inventory) -> io::Result<()> {
        self.shown
            .push(format!("[catalog] {} records", inventory.products().len()));

        Ok(())
    }

    fn read_order(&mut self) -> io::Result<String> {
        let input = self.next_input()?;
        self.shown.push(format!("[order] {input}"));

        Ok(input)
    }

    fn confirm_full_price(&mut self, name: &str, quantity: u32) -> io::Result<bool> {
        self.shown.push(format!("[full-price] {name} {quantity}"));

        self.confirm()
    }

    fn confirm_bonus(&mut self, name: &str, quantity: u32) -> io::Result<bool> {
        self.shown.push(format!("[bonus] {name} {quantity}"));

        self.confirm()
    }

    fn confirm_membership(&mut self) -> io::Result<bool> {
        self.shown.push("[membership]".to_owned());

        self.confirm()
    }

    fn show_receipt(&mut self, receipt: &Receipt<'_>) -> io::Result<()> {
        let mut rendered = Vec::new();
        receipt.write_to(&mut rendered)?;

        match String::from_utf8(rendered) {
            Ok(receipt_text) => self.shown.push(receipt_text),
            Err(source) => {
                return Err(io::Error::new(io::ErrorKind::InvalidData, source));
            }
        }

        Ok(())
    }

    fn confirm_continue(&mut self) -> io::Result<bool> {
        self.shown.push("[continue]".to_owned());

        self.confirm()
    }

    fn show_error(&mut self, message: &str) -> io::Result<()> {
        self.shown.push(format!("[error] {message}"));

        Ok(())
    }
}
