// 💰 Budget Aggregator
//
// venue_total: menu prices of every venue that has one
// other_total: the legacy `amount` field of every expense
// grand_total: venue_total + other_total
//
// Expenses are entered with `price`, not `amount`, so other_total is zero for
// anything entered through the form. That long-standing total is kept as is;
// `listed_expense_total` reports the sum of prices next to it so the gap is
// visible instead of being papered over.

use serde::Serialize;

use crate::entities::{Expense, Venue};
use crate::store::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetSummary {
    pub venue_total: f64,
    pub other_total: f64,
    pub grand_total: f64,
    /// Sum of expense prices; not part of grand_total
    pub listed_expense_total: f64,
}

impl BudgetSummary {
    pub fn compute(venues: &[Venue], expenses: &[Expense]) -> Self {
        let venue_total: f64 = venues
            .iter()
            .map(|v| v.menu_price)
            .filter(|price| *price != 0.0)
            .sum();

        let other_total: f64 = expenses.iter().filter_map(|e| e.amount).sum();
        let listed_expense_total: f64 = expenses.iter().map(|e| e.price).sum();

        BudgetSummary {
            venue_total,
            other_total,
            grand_total: venue_total + other_total,
            listed_expense_total,
        }
    }

    /// Expense prices not reflected in `grand_total`.
    pub fn unaccounted(&self) -> f64 {
        (self.listed_expense_total - self.other_total).max(0.0)
    }
}

/// Load venues and expenses and total them.
pub fn summarize(store: &RecordStore) -> BudgetSummary {
    let venues = store.load::<Venue>().records;
    let expenses = store.load::<Expense>().records;
    BudgetSummary::compute(&venues, &expenses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_date;
    use crate::entities::{ExpenseFields, VenueFields};

    fn venue(menu_price: f64) -> Venue {
        Venue::new(VenueFields {
            name: "V".to_string(),
            address: String::new(),
            date: parse_date("2026-05-01").unwrap(),
            capacity: 100,
            menu_price,
            contact: String::new(),
        })
    }

    fn expense(price: f64, amount: Option<f64>) -> Expense {
        let mut e = Expense::new(ExpenseFields {
            name: "E".to_string(),
            price,
            description: String::new(),
        });
        e.amount = amount;
        e
    }

    #[test]
    fn test_venue_total_skips_unpriced() {
        let summary = BudgetSummary::compute(&[venue(80.0), venue(0.0), venue(45.5)], &[]);

        assert_eq!(summary.venue_total, 125.5);
        assert_eq!(summary.grand_total, 125.5);
    }

    #[test]
    fn test_other_total_reads_amount_not_price() {
        let summary = BudgetSummary::compute(
            &[venue(100.0)],
            &[expense(400.0, None), expense(250.0, Some(200.0))],
        );

        assert_eq!(summary.other_total, 200.0);
        assert_eq!(summary.grand_total, 300.0);
        assert_eq!(summary.listed_expense_total, 650.0);
        assert_eq!(summary.unaccounted(), 450.0);
    }

    #[test]
    fn test_empty_budget() {
        let summary = BudgetSummary::compute(&[], &[]);
        assert_eq!(summary.grand_total, 0.0);
        assert_eq!(summary.unaccounted(), 0.0);
    }

    #[test]
    fn test_summarize_from_store() {
        let store = RecordStore::in_memory();
        store.save(&[venue(90.0)]).unwrap();
        store.save(&[expense(10.0, Some(5.0))]).unwrap();

        let summary = summarize(&store);
        assert_eq!(summary.venue_total, 90.0);
        assert_eq!(summary.other_total, 5.0);
        assert_eq!(summary.grand_total, 95.0);
    }
}
