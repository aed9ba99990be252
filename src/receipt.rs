//! Receipt

use std::io;

use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use crate::{
    orders::{Order, OrderLine},
    prices::format_won,
};

const STORE_HEADER: &str = "==============[ W Convenience Store ]==============";
const GIFTS_HEADER: &str = "====================[ Gifts ]======================";
const TOTALS_RULE: &str = "===================================================";

/// Printable receipt for a resolved order.
///
/// Shows every line at its listed price, the free units granted by applied
/// promotions, and the discount breakdown down to the amount due. Discount
/// rows are printed even when they come to zero.
#[derive(Debug, Clone, Copy)]
pub struct Receipt<'a> {
    order: &'a Order,
}

impl<'a> Receipt<'a> {
    /// Create a receipt over a resolved order.
    #[must_use]
    pub fn new(order: &'a Order) -> Self {
        Self { order }
    }

    /// Render the receipt into a writer.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] if writing to `out` fails.
    pub fn write_to(&self, mut out: impl io::Write) -> io::Result<()> {
        self.write_items(&mut out)?;
        self.write_gifts(&mut out)?;
        self.write_totals(&mut out)
    }

    fn write_items(&self, out: &mut impl io::Write) -> io::Result<()> {
        let mut builder = Builder::default();

        builder.push_record(["Product", "Qty", "Amount"]);

        for line in self.order.lines() {
            builder.push_record([
                line.name().to_owned(),
                line.total_quantity().to_string(),
                format_won(line.amount()),
            ]);
        }

        writeln!(out, "\n{STORE_HEADER}")?;
        writeln!(out, "{}", right_aligned(builder))
    }

    fn write_gifts(&self, out: &mut impl io::Write) -> io::Result<()> {
        let gifts: Vec<&OrderLine> = self.order.promotion_items().collect();

        writeln!(out, "{GIFTS_HEADER}")?;

        if gifts.is_empty() {
            return Ok(());
        }

        let mut builder = Builder::default();

        for line in gifts {
            builder.push_record([line.name().to_owned(), line.free_quantity().to_string()]);
        }

        writeln!(out, "{}", right_aligned(builder))
    }

    fn write_totals(&self, out: &mut impl io::Write) -> io::Result<()> {
        let order = self.order;
        let mut builder = Builder::default();

        builder.push_record([
            "Total".to_owned(),
            order.total_quantity().to_string(),
            format_won(order.total_amount()),
        ]);

        builder.push_record([
            "Promotion discount".to_owned(),
            String::new(),
            format!("-{}", format_won(order.promotion_discount())),
        ]);

        builder.push_record([
            "Membership discount".to_owned(),
            String::new(),
            format!("-{}", format_won(order.membership_discount())),
        ]);

        builder.push_record([
            "Amount due".to_owned(),
            String::new(),
            format_won(order.final_amount()),
        ]);

        writeln!(out, "{TOTALS_RULE}")?;
        writeln!(out, "{}", right_aligned(builder))
    }
}

/// Build the table with quantity and amount columns right-aligned.
fn right_aligned(builder: Builder) -> String {
    let mut table = builder.build();

    table.with(Style::blank());
    table.modify(Columns::new(1..3), Alignment::right());

    table.to_string()
}
