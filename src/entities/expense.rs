// 💸 Expense Entity - non-venue costs (dress, flowers, band, ...)
//
// Expenses are entered with a `price`. Older budget code summed an `amount`
// field that the entry form never writes; `amount` is kept so those records
// and that total keep meaning what they meant. See the budget module.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{PlannerError, Result};
use crate::store::{new_id, Record, RecordStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Stable identity (UUID)
    #[serde(default)]
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub price: f64,

    #[serde(default)]
    pub description: String,

    /// Legacy field read by the budget total; never written by the form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

impl Record for Expense {
    const COLLECTION: &'static str = "expense";
    const FILE: &'static str = "expenses.json";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseFields {
    pub name: String,
    pub price: f64,
    pub description: String,
}

impl Expense {
    pub fn new(fields: ExpenseFields) -> Self {
        Expense {
            id: new_id(),
            name: fields.name,
            price: fields.price,
            description: fields.description,
            amount: None,
        }
    }
}

// ============================================================================
// EXPENSE SERVICE
// ============================================================================

#[derive(Debug, Clone)]
pub struct ExpenseService {
    store: RecordStore,
}

impl ExpenseService {
    pub fn new(store: RecordStore) -> Self {
        ExpenseService { store }
    }

    pub fn list(&self) -> Vec<Expense> {
        self.store.load::<Expense>().records
    }

    pub fn get(&self, id: &str) -> Result<Expense> {
        self.list()
            .into_iter()
            .find(|e| e.id == id)
            .ok_or_else(|| PlannerError::not_found(Expense::COLLECTION, id))
    }

    pub fn add(&self, fields: ExpenseFields) -> Result<Expense> {
        let expense = Expense::new(fields);

        let mut expenses = self.store.load_for_update::<Expense>()?;
        expenses.push(expense.clone());
        self.store.save(&expenses)?;

        info!(id = %expense.id, price = expense.price, "Added expense {}", expense.name);
        Ok(expense)
    }

    /// Overwrite name, price and description. A legacy `amount` is left as is.
    pub fn edit(&self, id: &str, fields: ExpenseFields) -> Result<Expense> {
        let mut expenses = self.store.load_for_update::<Expense>()?;
        let expense = expenses
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| PlannerError::not_found(Expense::COLLECTION, id))?;

        expense.name = fields.name;
        expense.price = fields.price;
        expense.description = fields.description;
        let updated = expense.clone();

        self.store.save(&expenses)?;
        info!(id = %id, "Updated expense");
        Ok(updated)
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut expenses = self.store.load_for_update::<Expense>()?;
        let before = expenses.len();
        expenses.retain(|e| e.id != id);

        if expenses.len() == before {
            return Ok(false);
        }

        self.store.save(&expenses)?;
        info!(id = %id, "Deleted expense");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, price: f64) -> ExpenseFields {
        ExpenseFields {
            name: name.to_string(),
            price,
            description: String::new(),
        }
    }

    #[test]
    fn test_new_expense_has_no_amount() {
        let expense = Expense::new(fields("Flowers", 400.0));
        let json = serde_json::to_value(&expense).unwrap();

        assert_eq!(json["price"], 400.0);
        assert!(json.get("amount").is_none());
    }

    #[test]
    fn test_legacy_amount_survives_edit() {
        let store = RecordStore::in_memory();
        let mut legacy = Expense::new(fields("Band", 900.0));
        legacy.amount = Some(850.0);
        store.save(&[legacy.clone()]).unwrap();

        let service = ExpenseService::new(store);
        let edited = service.edit(&legacy.id, fields("Band", 950.0)).unwrap();

        assert_eq!(edited.price, 950.0);
        assert_eq!(edited.amount, Some(850.0));
    }

    #[test]
    fn test_add_edit_delete() {
        let service = ExpenseService::new(RecordStore::in_memory());

        let dress = service.add(fields("Dress", 1200.0)).unwrap();
        service.add(fields("Cake", 300.0)).unwrap();

        service.edit(&dress.id, fields("Dress + veil", 1350.0)).unwrap();
        assert_eq!(service.get(&dress.id).unwrap().price, 1350.0);

        assert!(service.delete(&dress.id).unwrap());
        assert!(!service.delete(&dress.id).unwrap());
        assert_eq!(service.list().len(), 1);
    }

    #[test]
    fn test_edit_unknown_is_not_found() {
        let service = ExpenseService::new(RecordStore::in_memory());
        assert!(service.edit("nope", fields("X", 1.0)).unwrap_err().is_not_found());
    }
}
