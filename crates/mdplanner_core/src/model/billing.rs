//! Customers and billing ledgers.
//!
//! # Invariants
//! - Amounts are plain `f64` values rounded to cents only on render.
//! - `paid_amount` only grows through recorded payments.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub phone: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub company: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub street: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub city: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub state: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub postal_code: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub country: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
    pub created: String,
}

impl Customer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BillingRate {
    pub id: String,
    pub name: String,
    pub hourly_rate: f64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub assignee: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Quote {
    pub id: String,
    pub number: String,
    pub customer_id: String,
    pub title: String,
    /// `draft`, `sent`, `accepted`, or `rejected`.
    pub status: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub valid_until: String,
    pub subtotal: f64,
    pub tax_rate: f64,
    pub tax: f64,
    pub total: f64,
    pub created: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sent_at: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub accepted_at: String,
}

impl Default for Quote {
    fn default() -> Self {
        Self {
            id: String::new(),
            number: String::new(),
            customer_id: String::new(),
            title: String::new(),
            status: "draft".to_string(),
            valid_until: String::new(),
            subtotal: 0.0,
            tax_rate: 0.0,
            tax: 0.0,
            total: 0.0,
            created: String::new(),
            notes: String::new(),
            sent_at: String::new(),
            accepted_at: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Invoice {
    pub id: String,
    pub number: String,
    pub customer_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub quote_id: String,
    pub title: String,
    /// `draft`, `sent`, `partial`, `paid`, or `overdue`.
    pub status: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub due_date: String,
    pub subtotal: f64,
    pub tax_rate: f64,
    pub tax: f64,
    pub total: f64,
    pub paid_amount: f64,
    pub created: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sent_at: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub paid_at: String,
}

impl Default for Invoice {
    fn default() -> Self {
        Self {
            id: String::new(),
            number: String::new(),
            customer_id: String::new(),
            quote_id: String::new(),
            title: String::new(),
            status: "draft".to_string(),
            due_date: String::new(),
            subtotal: 0.0,
            tax_rate: 0.0,
            tax: 0.0,
            total: 0.0,
            paid_amount: 0.0,
            created: String::new(),
            notes: String::new(),
            sent_at: String::new(),
            paid_at: String::new(),
        }
    }
}

impl Invoice {
    /// Applies one payment: `paid` once fully covered, `partial` otherwise.
    pub fn apply_payment(&mut self, amount: f64, date: &str) {
        self.paid_amount += amount;
        if self.paid_amount >= self.total {
            self.status = "paid".to_string();
            self.paid_at = date.to_string();
        } else {
            self.status = "partial".to_string();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Payment {
    pub id: String,
    pub invoice_id: String,
    pub amount: f64,
    pub date: String,
    /// `bank`, `card`, `cash`, or `other`.
    pub method: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

impl Default for Payment {
    fn default() -> Self {
        Self {
            id: String::new(),
            invoice_id: String::new(),
            amount: 0.0,
            date: String::new(),
            method: "bank".to_string(),
            reference: String::new(),
            notes: String::new(),
        }
    }
}

/// `Q-0001` style number for the `count + 1`-th quote.
pub fn quote_number(count: usize) -> String {
    format!("Q-{:04}", count + 1)
}

/// `INV-0001` style number for the `count + 1`-th invoice.
pub fn invoice_number(count: usize) -> String {
    format!("INV-{:04}", count + 1)
}

#[cfg(test)]
mod tests {
    use super::{invoice_number, quote_number, Invoice};

    #[test]
    fn numbers_are_zero_padded() {
        assert_eq!(quote_number(0), "Q-0001");
        assert_eq!(invoice_number(41), "INV-0042");
    }

    #[test]
    fn partial_then_full_payment() {
        let mut invoice = Invoice {
            total: 100.0,
            ..Invoice::default()
        };
        invoice.apply_payment(40.0, "2026-03-01");
        assert_eq!(invoice.status, "partial");
        assert!(invoice.paid_at.is_empty());

        invoice.apply_payment(60.0, "2026-03-05");
        assert_eq!(invoice.status, "paid");
        assert_eq!(invoice.paid_at, "2026-03-05");
        assert_eq!(invoice.paid_amount, 100.0);
    }
}
