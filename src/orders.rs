//! Orders

use smallvec::SmallVec;

use crate::{membership::Membership, prices::Price};

/// One resolved line of an order: the units bought, how they split between
/// promotional and plain stock, and how many of them are free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    name: String,
    total_quantity: u32,
    unit_price: Price,
    promotion_quantity: u32,
    normal_quantity: u32,
    free_quantity: u32,
    promotion_applied: bool,
}

impl OrderLine {
    /// Promotion-covered units only; the shopper declined the remainder that
    /// would have been charged at full price.
    pub fn promotion_only(
        name: impl Into<String>,
        promotion_quantity: u32,
        free_quantity: u32,
        unit_price: Price,
    ) -> Self {
        OrderLine {
            name: name.into(),
            total_quantity: promotion_quantity,
            unit_price,
            promotion_quantity,
            normal_quantity: 0,
            free_quantity,
            promotion_applied: true,
        }
    }

    /// Promotion-covered units plus the remainder bought at full price from
    /// plain stock.
    pub fn mixed(
        name: impl Into<String>,
        promotion_quantity: u32,
        normal_quantity: u32,
        free_quantity: u32,
        unit_price: Price,
    ) -> Self {
        OrderLine {
            name: name.into(),
            total_quantity: promotion_quantity + normal_quantity,
            unit_price,
            promotion_quantity,
            normal_quantity,
            free_quantity,
            promotion_applied: true,
        }
    }

    /// The requested units plus the free units the shopper accepted on top of
    /// the request.
    pub fn with_additional(
        name: impl Into<String>,
        requested_quantity: u32,
        additional_quantity: u32,
        unit_price: Price,
    ) -> Self {
        OrderLine {
            name: name.into(),
            total_quantity: requested_quantity + additional_quantity,
            unit_price,
            promotion_quantity: requested_quantity + additional_quantity,
            normal_quantity: 0,
            free_quantity: additional_quantity,
            promotion_applied: true,
        }
    }

    /// The requested units with the bonus offer declined; the promotion does
    /// not apply to this line.
    pub fn without_promotion(name: impl Into<String>, quantity: u32, unit_price: Price) -> Self {
        OrderLine {
            name: name.into(),
            total_quantity: quantity,
            unit_price,
            promotion_quantity: quantity,
            normal_quantity: 0,
            free_quantity: 0,
            promotion_applied: false,
        }
    }

    /// The requested units with the promotion applying as-is, no decision
    /// needed.
    pub fn exact(
        name: impl Into<String>,
        quantity: u32,
        free_quantity: u32,
        unit_price: Price,
    ) -> Self {
        OrderLine {
            name: name.into(),
            total_quantity: quantity,
            unit_price,
            promotion_quantity: quantity,
            normal_quantity: 0,
            free_quantity,
            promotion_applied: true,
        }
    }

    /// A purchase from plain stock with no promotion in play.
    pub fn plain(name: impl Into<String>, quantity: u32, unit_price: Price) -> Self {
        OrderLine {
            name: name.into(),
            total_quantity: quantity,
            unit_price,
            promotion_quantity: 0,
            normal_quantity: quantity,
            free_quantity: 0,
            promotion_applied: false,
        }
    }

    /// Product name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Units bought in total on this line.
    pub fn total_quantity(&self) -> u32 {
        self.total_quantity
    }

    /// Unit price.
    pub fn unit_price(&self) -> Price {
        self.unit_price
    }

    /// Units drawn from promotional stock.
    pub fn promotion_quantity(&self) -> u32 {
        self.promotion_quantity
    }

    /// Units drawn from plain stock.
    pub fn normal_quantity(&self) -> u32 {
        self.normal_quantity
    }

    /// Units given away for free.
    pub fn free_quantity(&self) -> u32 {
        self.free_quantity
    }

    /// Whether the promotion applies to this line.
    pub fn promotion_applied(&self) -> bool {
        self.promotion_applied
    }

    /// Amount charged for this line before discounts.
    pub fn amount(&self) -> u64 {
        u64::from(self.total_quantity) * *self.unit_price
    }
}

/// A complete order ready for the receipt: resolved lines plus the
/// membership decision.
#[derive(Debug)]
pub struct Order {
    lines: SmallVec<[OrderLine; 10]>,
    membership: Membership,
    membership_elected: bool,
}

impl Order {
    /// Create a new order from resolved lines.
    pub fn new(
        lines: impl Into<SmallVec<[OrderLine; 10]>>,
        membership: Membership,
        membership_elected: bool,
    ) -> Self {
        Order {
            lines: lines.into(),
            membership,
            membership_elected,
        }
    }

    /// The resolved order lines.
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Lines that earned free units through an applied promotion.
    pub fn promotion_items(&self) -> impl Iterator<Item = &OrderLine> {
        self.lines
            .iter()
            .filter(|line| line.promotion_applied() && line.free_quantity() > 0)
    }

    /// Whether the shopper elected the membership discount.
    pub fn membership_elected(&self) -> bool {
        self.membership_elected
    }

    /// Amount for all lines before any discount.
    pub fn total_amount(&self) -> u64 {
        self.lines.iter().map(OrderLine::amount).sum()
    }

    /// Value of the free units on lines with an applied promotion.
    pub fn promotion_discount(&self) -> u64 {
        self.lines
            .iter()
            .filter(|line| line.promotion_applied())
            .map(|line| u64::from(line.free_quantity()) * *line.unit_price())
            .sum()
    }

    /// Membership discount over the amount paid outside any promotion. Zero
    /// unless the shopper elected it.
    pub fn membership_discount(&self) -> u64 {
        if !self.membership_elected {
            return 0;
        }

        self.membership.discount_for(self.normal_amount())
    }

    /// Amount due after both discounts.
    pub fn final_amount(&self) -> u64 {
        self.total_amount() - self.promotion_discount() - self.membership_discount()
    }

    /// Units bought across all lines.
    pub fn total_quantity(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.total_quantity()))
            .sum()
    }

    /// Amount on lines the promotion did not apply to.
    fn normal_amount(&self) -> u64 {
        self.lines
            .iter()
            .filter(|line| !line.promotion_applied())
            .map(|line| u64::from(line.normal_quantity()) * *line.unit_price())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::*;

    fn cola_and_cider() -> SmallVec<[OrderLine; 10]> {
        smallvec![
            OrderLine::mixed("Cola", 3, 7, 1, Price::new(1000)),
            OrderLine::plain("Cider", 5, Price::new(1000)),
        ]
    }

    #[test]
    fn promotion_only_caps_the_total_at_the_promotion_quantity() {
        let line = OrderLine::promotion_only("Cola", 4, 1, Price::new(1000));

        assert_eq!(line.total_quantity(), 4);
        assert_eq!(line.promotion_quantity(), 4);
        assert_eq!(line.normal_quantity(), 0);
        assert_eq!(line.free_quantity(), 1);
        assert!(line.promotion_applied());
    }

    #[test]
    fn mixed_totals_both_stock_sources() {
        let line = OrderLine::mixed("Cola", 5, 5, 1, Price::new(1000));

        assert_eq!(line.total_quantity(), 10);
        assert_eq!(line.promotion_quantity(), 5);
        assert_eq!(line.normal_quantity(), 5);
        assert_eq!(line.free_quantity(), 1);
        assert!(line.promotion_applied());
    }

    #[test]
    fn with_additional_extends_the_request_by_the_bonus() {
        let line = OrderLine::with_additional("Cola", 2, 1, Price::new(1000));

        assert_eq!(line.total_quantity(), 3);
        assert_eq!(line.promotion_quantity(), 3);
        assert_eq!(line.normal_quantity(), 0);
        assert_eq!(line.free_quantity(), 1);
        assert!(line.promotion_applied());
    }

    #[test]
    fn without_promotion_keeps_the_request_but_drops_the_offer() {
        let line = OrderLine::without_promotion("Cola", 2, Price::new(1000));

        assert_eq!(line.total_quantity(), 2);
        assert_eq!(line.promotion_quantity(), 2);
        assert_eq!(line.normal_quantity(), 0);
        assert_eq!(line.free_quantity(), 0);
        assert!(!line.promotion_applied());
    }

    #[test]
    fn exact_keeps_the_request_with_its_free_units() {
        let line = OrderLine::exact("Cola", 9, 3, Price::new(1000));

        assert_eq!(line.total_quantity(), 9);
        assert_eq!(line.promotion_quantity(), 9);
        assert_eq!(line.normal_quantity(), 0);
        assert_eq!(line.free_quantity(), 3);
        assert!(line.promotion_applied());
    }

    #[test]
    fn plain_draws_everything_from_plain_stock() {
        let line = OrderLine::plain("Water", 4, Price::new(500));

        assert_eq!(line.total_quantity(), 4);
        assert_eq!(line.promotion_quantity(), 0);
        assert_eq!(line.normal_quantity(), 4);
        assert_eq!(line.free_quantity(), 0);
        assert!(!line.promotion_applied());
    }

    #[test]
    fn every_policy_splits_the_total_between_stock_sources() {
        let lines = [
            OrderLine::promotion_only("Cola", 4, 1, Price::new(1000)),
            OrderLine::mixed("Cola", 5, 5, 1, Price::new(1000)),
            OrderLine::with_additional("Cola", 2, 1, Price::new(1000)),
            OrderLine::without_promotion("Cola", 2, Price::new(1000)),
            OrderLine::exact("Cola", 9, 3, Price::new(1000)),
            OrderLine::plain("Water", 4, Price::new(500)),
        ];

        for line in &lines {
            assert_eq!(
                line.total_quantity(),
                line.promotion_quantity() + line.normal_quantity(),
                "line for {} should split cleanly",
                line.name()
            );
        }
    }

    #[test]
    fn line_amount_multiplies_quantity_by_unit_price() {
        let line = OrderLine::plain("Lunch Box", 3, Price::new(6400));

        assert_eq!(line.amount(), 19_200);
    }

    #[test]
    fn total_amount_sums_all_lines() {
        let order = Order::new(cola_and_cider(), Membership::standard(), true);

        assert_eq!(order.total_amount(), 15_000);
    }

    #[test]
    fn promotion_discount_counts_free_units_on_applied_lines() {
        let order = Order::new(cola_and_cider(), Membership::standard(), true);

        assert_eq!(order.promotion_discount(), 1_000);
    }

    #[test]
    fn membership_discount_covers_only_non_promotional_lines() {
        let elected = Order::new(cola_and_cider(), Membership::standard(), true);
        let declined = Order::new(cola_and_cider(), Membership::standard(), false);

        // Only the cider line escapes the promotion: 5,000 won at 30%.
        assert_eq!(elected.membership_discount(), 1_500);
        assert_eq!(declined.membership_discount(), 0);
    }

    #[test]
    fn final_amount_subtracts_both_discounts() {
        let order = Order::new(cola_and_cider(), Membership::standard(), true);

        assert_eq!(order.final_amount(), 15_000 - 1_000 - 1_500);
    }

    #[test]
    fn total_quantity_sums_line_totals() {
        let order = Order::new(cola_and_cider(), Membership::standard(), true);

        assert_eq!(order.total_quantity(), 15);
    }

    #[test]
    fn promotion_items_lists_applied_lines_with_free_units() {
        let lines: SmallVec<[OrderLine; 10]> = smallvec![
            OrderLine::mixed("Cola", 3, 7, 1, Price::new(1000)),
            OrderLine::without_promotion("Cup Noodles", 2, Price::new(1700)),
            OrderLine::exact("Cider", 4, 0, Price::new(1000)),
            OrderLine::plain("Water", 5, Price::new(500)),
        ];
        let order = Order::new(lines, Membership::standard(), false);

        let names: Vec<&str> = order.promotion_items().map(OrderLine::name).collect();

        assert_eq!(names, ["Cola"]);
    }
}
