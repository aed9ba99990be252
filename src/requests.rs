//! Order requests

use std::num::ParseIntError;

use rustc_hash::FxHashSet;
use thiserror::Error;

/// Errors raised while parsing or validating an order request.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The input names no products at all.
    #[error("order input must name at least one product")]
    Empty,

    /// A product name is blank.
    #[error("order item name must not be blank")]
    BlankName,

    /// A quantity is zero.
    #[error("order quantity must be greater than zero")]
    ZeroQuantity,

    /// A segment is not of the form `[Name-quantity]`.
    #[error("order item {segment:?} is not of the form [Name-quantity]")]
    Malformed {
        /// The offending segment as entered
        segment: String,
    },

    /// A quantity is not a whole number in range.
    #[error("order quantity in {segment:?} is not a whole number in range")]
    InvalidQuantity {
        /// The offending segment as entered
        segment: String,
        /// The underlying parse failure
        #[source]
        source: ParseIntError,
    },

    /// A product appears more than once.
    #[error("product {name:?} appears more than once in the order")]
    Duplicate {
        /// The repeated product name
        name: String,
    },
}

/// A requested product and quantity, before resolution against inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    name: String,
    quantity: u32,
}

impl OrderRequest {
    /// Create a request for a quantity of the named product.
    ///
    /// # Errors
    ///
    /// Returns a [`RequestError`] if the name is blank or the quantity is
    /// zero.
    pub fn new(name: impl Into<String>, quantity: u32) -> Result<Self, RequestError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(RequestError::BlankName);
        }

        if quantity == 0 {
            return Err(RequestError::ZeroQuantity);
        }

        Ok(OrderRequest { name, quantity })
    }

    /// Requested product name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Requested quantity.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Parse a raw order string of the form `[Name-quantity],[Name-quantity]`.
///
/// Every segment must be bracket-framed with exactly one `-` between name
/// and quantity, and no product may appear twice.
///
/// # Errors
///
/// Returns a [`RequestError`] describing the first offending segment, the
/// first repeated name, or an empty input.
pub fn parse_order(input: &str) -> Result<Vec<OrderRequest>, RequestError> {
    if input.trim().is_empty() {
        return Err(RequestError::Empty);
    }

    let requests = input
        .split(',')
        .map(parse_segment)
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen = FxHashSet::default();
    for request in &requests {
        if !seen.insert(request.name()) {
            return Err(RequestError::Duplicate {
                name: request.name().to_owned(),
            });
        }
    }

    Ok(requests)
}

fn parse_segment(segment: &str) -> Result<OrderRequest, RequestError> {
    let Some(inner) = segment.strip_prefix('[').and_then(|s| s.strip_suffix(']')) else {
        return Err(RequestError::Malformed {
            segment: segment.to_owned(),
        });
    };

    let mut parts = inner.split('-');
    let (Some(name), Some(quantity), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(RequestError::Malformed {
            segment: segment.to_owned(),
        });
    };

    let quantity = match quantity.parse::<u32>() {
        Ok(value) => value,
        Err(source) => {
            return Err(RequestError::InvalidQuantity {
                segment: segment.to_owned(),
                source,
            });
        }
    };

    OrderRequest::new(name, quantity)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_a_well_formed_order() -> TestResult {
        let requests = parse_order("[Cola-2],[Cider-1]")?;

        assert_eq!(
            requests,
            [
                OrderRequest::new("Cola", 2)?,
                OrderRequest::new("Cider", 1)?,
            ]
        );

        Ok(())
    }

    #[test]
    fn a_single_item_parses() -> TestResult {
        let requests = parse_order("[Orange Juice-3]")?;

        assert_eq!(requests, [OrderRequest::new("Orange Juice", 3)?]);

        Ok(())
    }

    #[test]
    fn missing_brackets_are_malformed() {
        assert!(matches!(
            parse_order("Cola-2],[Cider-1]"),
            Err(RequestError::Malformed { .. })
        ));
        assert!(matches!(
            parse_order("[Cola-2"),
            Err(RequestError::Malformed { .. })
        ));
    }

    #[test]
    fn comma_inside_a_segment_breaks_the_framing() {
        // The list splits on commas before framing, so "[Cola,2]" can never
        // be a single segment.
        let result = parse_order("[Cola,2],[Cider-1]");

        assert!(matches!(result, Err(RequestError::Malformed { .. })));
    }

    #[test]
    fn wrong_hyphen_count_is_malformed() {
        assert!(matches!(
            parse_order("[Cola2]"),
            Err(RequestError::Malformed { .. })
        ));
        assert!(matches!(
            parse_order("[Cola--1]"),
            Err(RequestError::Malformed { .. })
        ));
    }

    #[test]
    fn surrounding_whitespace_is_not_forgiven() {
        let result = parse_order("[Cola-2], [Cider-1]");

        assert!(matches!(result, Err(RequestError::Malformed { .. })));
    }

    #[test]
    fn non_numeric_quantity_is_invalid() {
        let result = parse_order("[Cola-two]");

        assert!(matches!(result, Err(RequestError::InvalidQuantity { .. })));
    }

    #[test]
    fn oversized_quantity_is_invalid() {
        let result = parse_order("[Cola-99999999999]");

        assert!(matches!(result, Err(RequestError::InvalidQuantity { .. })));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let result = parse_order("[Cola-0]");

        assert!(matches!(result, Err(RequestError::ZeroQuantity)));
    }

    #[test]
    fn duplicate_products_are_rejected() {
        let result = parse_order("[Cola-2],[Cola-1]");

        match result {
            Err(RequestError::Duplicate { name }) => assert_eq!(name, "Cola"),
            other => panic!("expected Duplicate error, got {other:?}"),
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(parse_order(""), Err(RequestError::Empty)));
        assert!(matches!(parse_order("   "), Err(RequestError::Empty)));
    }

    #[test]
    fn blank_name_is_rejected() {
        let result = parse_order("[-2]");

        assert!(matches!(result, Err(RequestError::BlankName)));
    }

    #[test]
    fn request_validates_quantity_directly() {
        assert!(matches!(
            OrderRequest::new("Cola", 0),
            Err(RequestError::ZeroQuantity)
        ));
        assert!(matches!(
            OrderRequest::new("", 1),
            Err(RequestError::BlankName)
        ));
    }
}
