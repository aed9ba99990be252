//! Console

use std::io::{self, BufRead, Write};

use crate::{
    inventory::Inventory, prices::format_won, products::Product, receipt::Receipt,
    session::StoreIo,
};

const ORDER_PROMPT: &str =
    "Enter the products and quantities you would like to buy. (e.g. [Cola-2],[Potato Chips-1])";

const MEMBERSHIP_PROMPT: &str = "Would you like the membership discount? (Y/N)";

const CONTINUE_PROMPT: &str = "Thank you. Is there anything else you would like to buy? (Y/N)";

const YES_OR_NO: &str = "Please answer Y or N.";

/// Console IO over a buffered reader and a writer.
///
/// Prompts are preceded by a blank line, and yes-or-no questions are asked
/// again until the answer is exactly `Y` or `N`.
#[derive(Debug)]
pub struct ConsoleIo<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> ConsoleIo<R, W> {
    /// Create a console over the given reader and writer.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Give back the reader and writer.
    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();

        if self.reader.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "console input ended",
            ));
        }

        Ok(line.trim_end_matches(['\r', '\n']).to_owned())
    }

    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        loop {
            writeln!(self.writer, "\n{prompt}")?;

            match self.read_line()?.as_str() {
                "Y" => return Ok(true),
                "N" => return Ok(false),
                _ => self.show_error(YES_OR_NO)?,
            }
        }
    }
}

impl<R: BufRead, W: Write> StoreIo for ConsoleIo<R, W> {
    fn show_catalog(&mut self, inventory: &Inventory) -> io::Result<()> {
        writeln!(self.writer, "\nWelcome to W Convenience Store.")?;
        writeln!(self.writer, "Here are the products we currently carry.\n")?;

        for product in inventory.products() {
            let line = catalog_line(product, inventory);
            writeln!(self.writer, "{line}")?;
        }

        Ok(())
    }

    fn read_order(&mut self) -> io::Result<String> {
        writeln!(self.writer, "\n{ORDER_PROMPT}")?;

        self.read_line()
    }

    fn confirm_full_price(&mut self, name: &str, quantity: u32) -> io::Result<bool> {
        self.confirm(&format!(
            "The promotion does not cover {quantity} units of {name}. Buy them at full price anyway? (Y/N)"
        ))
    }

    fn confirm_bonus(&mut self, name: &str, quantity: u32) -> io::Result<bool> {
        self.confirm(&format!(
            "You can take {quantity} more units of {name} free of charge. Add them? (Y/N)"
        ))
    }

    fn confirm_membership(&mut self) -> io::Result<bool> {
        self.confirm(MEMBERSHIP_PROMPT)
    }

    fn show_receipt(&mut self, receipt: &Receipt<'_>) -> io::Result<()> {
        receipt.write_to(&mut self.writer)
    }

    fn confirm_continue(&mut self) -> io::Result<bool> {
        self.confirm(CONTINUE_PROMPT)
    }

    fn show_error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.writer, "\n[ERROR] {message}")
    }
}

/// One catalog line: name, price, stock level, and the promotion name when
/// the record carries one.
fn catalog_line(product: &Product, inventory: &Inventory) -> String {
    let mut line = format!(
        "- {} {} won {}",
        product.name(),
        format_won(*product.price()),
        stock_display(product.quantity())
    );

    if let Some(key) = product.promotion()
        && let Some(promotion) = inventory.promotion(key)
    {
        line.push(' ');
        line.push_str(promotion.name());
    }

    line
}

fn stock_display(quantity: u32) -> String {
    if quantity == 0 {
        return "out of stock".to_owned();
    }

    format!("{quantity} units")
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use testresult::TestResult;

    use crate::catalog::build_inventory;

    use super::*;

    fn console(input: &str) -> ConsoleIo<Cursor<Vec<u8>>, Vec<u8>> {
        ConsoleIo::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn written(console: ConsoleIo<Cursor<Vec<u8>>, Vec<u8>>) -> TestResult<String> {
        let (_, writer) = console.into_parts();

        Ok(String::from_utf8(writer)?)
    }

    #[test]
    fn read_order_prompts_and_trims_the_line() -> TestResult {
        let mut console = console("[Cola-2]\n");

        let input = console.read_order()?;

        assert_eq!(input, "[Cola-2]");
        assert!(written(console)?.contains(ORDER_PROMPT));

        Ok(())
    }

    #[test]
    fn confirm_accepts_only_exact_answers() -> TestResult {
        let mut console = console("y\nmaybe\nY\n");

        let answer = console.confirm_membership()?;

        assert!(answer);

        let output = written(console)?;
        assert_eq!(output.matches(MEMBERSHIP_PROMPT).count(), 3);
        assert_eq!(output.matches("[ERROR]").count(), 2);

        Ok(())
    }

    #[test]
    fn confirm_full_price_names_the_uncovered_units() -> TestResult {
        let mut console = console("N\n");

        let answer = console.confirm_full_price("Cola", 6)?;

        assert!(!answer);
        assert!(
            written(console)?
                .contains("The promotion does not cover 6 units of Cola")
        );

        Ok(())
    }

    #[test]
    fn confirm_bonus_names_the_free_units() -> TestResult {
        let mut console = console("Y\n");

        let answer = console.confirm_bonus("Cola", 1)?;

        assert!(answer);
        assert!(written(console)?.contains("You can take 1 more units of Cola"));

        Ok(())
    }

    #[test]
    fn catalog_shows_prices_stock_and_promotions() -> TestResult {
        let products = "\
name,price,quantity,promotion
Cola,1000,10,Soda 2+1
Cola,1000,5,null
Water,500,0,null
";
        let promotions = "\
name,buy,get,start_date,end_date
Soda 2+1,2,1,2026-01-01,2026-12-31
";
        let inventory = build_inventory(products, promotions)?;
        let mut console = console("");

        console.show_catalog(&inventory)?;

        let output = written(console)?;
        assert!(output.contains("Welcome to W Convenience Store."));
        assert!(output.contains("- Cola 1,000 won 10 units Soda 2+1"));
        assert!(output.contains("- Cola 1,000 won 5 units"));
        assert!(output.contains("- Water 500 won out of stock"));

        Ok(())
    }

    #[test]
    fn exhausted_input_is_an_eof_error() {
        let mut console = console("");

        let result = console.read_order();

        match result {
            Err(error) => assert_eq!(error.kind(), io::ErrorKind::UnexpectedEof),
            Ok(input) => panic!("expected EOF, read {input:?}"),
        }
    }

    #[test]
    fn errors_are_prefixed_and_separated() -> TestResult {
        let mut console = console("");

        console.show_error("unknown product \"Ghost\"")?;

        assert!(written(console)?.contains("\n[ERROR] unknown product \"Ghost\""));

        Ok(())
    }
}
