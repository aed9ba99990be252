//! Catalog

use std::{
    fs, io,
    num::ParseIntError,
    path::{Path, PathBuf},
    str::FromStr,
};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use crate::{
    inventory::{Inventory, InventoryError},
    prices::Price,
    products::{Product, ProductError},
    promotions::{Promotion, PromotionBook, PromotionError, PromotionKey},
};

/// Columns of a products file row: name, price, quantity, promotion.
const PRODUCT_COLUMNS: usize = 4;

/// Columns of a promotions file row: name, buy, get, start date, end date.
const PROMOTION_COLUMNS: usize = 5;

/// Field value marking the absence of a promotion.
const NO_PROMOTION: &str = "null";

/// Catalog Parsing Errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A catalog file could not be read.
    #[error("failed to read catalog file {}", path.display())]
    Read {
        /// Path of the unreadable file
        path: PathBuf,
        /// Underlying IO error
        source: io::Error,
    },

    /// The catalog text had no lines at all.
    #[error("catalog file is empty")]
    Empty,

    /// A data row had the wrong number of comma-separated columns.
    #[error("line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        /// 1-based line number in the file
        line: usize,
        /// Columns the format requires
        expected: usize,
        /// Columns the row actually had
        found: usize,
    },

    /// A numeric field did not parse.
    #[error("line {line}: invalid {field}")]
    InvalidNumber {
        /// 1-based line number in the file
        line: usize,
        /// Which field failed to parse
        field: &'static str,
        /// Underlying parse error
        source: ParseIntError,
    },

    /// A date field did not parse as `yyyy-mm-dd`.
    #[error("line {line}: invalid {field}")]
    InvalidDate {
        /// 1-based line number in the file
        line: usize,
        /// Which field failed to parse
        field: &'static str,
        /// Underlying parse error
        source: chrono::ParseError,
    },

    /// A product referenced a promotion the promotions file never defined.
    #[error("line {line}: unknown promotion {name:?}")]
    UnknownPromotion {
        /// 1-based line number in the file
        line: usize,
        /// The unresolved promotion name
        name: String,
    },

    /// Wrapped promotion construction error.
    #[error(transparent)]
    Promotion(#[from] PromotionError),

    /// Wrapped product construction error.
    #[error(transparent)]
    Product(#[from] ProductError),

    /// Wrapped inventory construction error.
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

/// Parse the promotions catalog.
///
/// The first line is a header; it must carry the right number of columns but
/// its content is otherwise ignored. Later definitions of a name already in
/// the book are discarded.
///
/// # Errors
///
/// Returns a [`CatalogError`] if the text is empty or a row is malformed.
pub fn parse_promotions(text: &str) -> Result<PromotionBook, CatalogError> {
    let mut book = PromotionBook::new();

    for (line, row) in data_rows(text, PROMOTION_COLUMNS)? {
        book.insert(promotion_row(line, row)?);
    }

    Ok(book)
}

/// Parse the products catalog against an already-parsed promotion book.
///
/// The first line is a header; it must carry the right number of columns but
/// its content is otherwise ignored. A promotion column of `null` means the
/// record has no promotion; any other value must name a promotion in the
/// book.
///
/// # Errors
///
/// Returns a [`CatalogError`] if the text is empty, a row is malformed, or a
/// row references an unknown promotion.
pub fn parse_products(
    text: &str,
    promotions: &PromotionBook,
) -> Result<Vec<Product>, CatalogError> {
    let mut products = Vec::new();

    for (line, row) in data_rows(text, PRODUCT_COLUMNS)? {
        products.push(product_row(line, row, promotions)?);
    }

    Ok(products)
}

/// Build a ready-to-sell inventory from catalog texts.
///
/// # Errors
///
/// Returns a [`CatalogError`] if either text fails to parse or the records
/// do not form a valid inventory.
pub fn build_inventory(
    products_text: &str,
    promotions_text: &str,
) -> Result<Inventory, CatalogError> {
    let promotions = parse_promotions(promotions_text)?;
    let products = parse_products(products_text, &promotions)?;

    Ok(Inventory::from_products(products, promotions)?)
}

/// Read both catalog files and build the inventory.
///
/// # Errors
///
/// Returns a [`CatalogError`] if either file cannot be read or parsed.
pub fn load_inventory(
    products_path: impl AsRef<Path>,
    promotions_path: impl AsRef<Path>,
) -> Result<Inventory, CatalogError> {
    let products_text = read_catalog(products_path.as_ref())?;
    let promotions_text = read_catalog(promotions_path.as_ref())?;

    info!(
        products = %products_path.as_ref().display(),
        promotions = %promotions_path.as_ref().display(),
        "loaded catalog files"
    );

    build_inventory(&products_text, &promotions_text)
}

fn read_catalog(path: &Path) -> Result<String, CatalogError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(source) => Err(CatalogError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Data rows of a catalog text with their 1-based line numbers. The header
/// line is checked for its column count and then discarded.
fn data_rows(text: &str, columns: usize) -> Result<Vec<(usize, &str)>, CatalogError> {
    let mut lines = text.lines();

    let Some(header) = lines.next() else {
        return Err(CatalogError::Empty);
    };

    let found = header.split(',').count();
    if found != columns {
        return Err(CatalogError::ColumnCount {
            line: 1,
            expected: columns,
            found,
        });
    }

    Ok(lines.enumerate().map(|(offset, row)| (offset + 2, row)).collect())
}

fn promotion_row(line: usize, row: &str) -> Result<Promotion, CatalogError> {
    let fields: Vec<&str> = row.split(',').collect();
    let [name, buy, get, start_date, end_date] = fields.as_slice() else {
        return Err(CatalogError::ColumnCount {
            line,
            expected: PROMOTION_COLUMNS,
            found: fields.len(),
        });
    };

    let buy = parse_number(line, "buy quantity", buy)?;
    let get = parse_number(line, "get quantity", get)?;
    let start_date = parse_date(line, "start date", start_date)?;
    let end_date = parse_date(line, "end date", end_date)?;

    Ok(Promotion::new(*name, buy, get, start_date, end_date)?)
}

fn product_row(
    line: usize,
    row: &str,
    promotions: &PromotionBook,
) -> Result<Product, CatalogError> {
    let fields: Vec<&str> = row.split(',').collect();
    let [name, price, quantity, promotion] = fields.as_slice() else {
        return Err(CatalogError::ColumnCount {
            line,
            expected: PRODUCT_COLUMNS,
            found: fields.len(),
        });
    };

    let price = Price::new(parse_number(line, "price", price)?);
    let quantity = parse_number(line, "quantity", quantity)?;
    let promotion = promotion_reference(line, promotion, promotions)?;

    Ok(Product::new(*name, price, quantity, promotion)?)
}

fn promotion_reference(
    line: usize,
    name: &str,
    promotions: &PromotionBook,
) -> Result<Option<PromotionKey>, CatalogError> {
    if name == NO_PROMOTION {
        return Ok(None);
    }

    let Some(key) = promotions.find(name) else {
        return Err(CatalogError::UnknownPromotion {
            line,
            name: name.to_owned(),
        });
    };

    Ok(Some(key))
}

fn parse_number<T>(line: usize, field: &'static str, value: &str) -> Result<T, CatalogError>
where
    T: FromStr<Err = ParseIntError>,
{
    match value.parse() {
        Ok(value) => Ok(value),
        Err(source) => Err(CatalogError::InvalidNumber {
            line,
            field,
            source,
        }),
    }
}

fn parse_date(line: usize, field: &'static str, value: &str) -> Result<NaiveDate, CatalogError> {
    match value.parse() {
        Ok(date) => Ok(date),
        Err(source) => Err(CatalogError::InvalidDate {
            line,
            field,
            source,
        }),
    }
}
