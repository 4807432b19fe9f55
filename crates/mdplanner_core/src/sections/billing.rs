//! Customers, Billing Rates, Quotes, Invoices, and Payments codecs.
//!
//! # Responsibility
//! - Map customers to heading records with their notes as body.
//! - Map rates, quotes, invoices, and payments to `- {...}` ledger bullets.
//!
//! # Invariants
//! - Amounts render with two decimals.
//! - Free-text values are made separator-safe before rendering.

use crate::entity::{
    heading_codec, ledger_codec, EntityLayout, HeadingEntity, IdScheme, LedgerEntity, RawRecord,
    Record,
};
use crate::markup::config::{format_amount, ConfigMap};
use crate::model::billing::{BillingRate, Customer, Invoice, Payment, Quote};

macro_rules! random_id_record {
    ($($kind:ty => $kind_name:literal, $section:literal);+ $(;)?) => {
        $(
            impl Record for $kind {
                const KIND: &'static str = $kind_name;
                const SECTION: &'static str = $section;
                const ID_SCHEME: IdScheme = IdScheme::Random;

                fn id(&self) -> &str {
                    &self.id
                }

                fn set_id(&mut self, id: String) {
                    self.id = id;
                }
            }
        )+
    };
}

random_id_record! {
    Customer => "customer", "Customers";
    BillingRate => "billing rate", "Billing Rates";
    Quote => "quote", "Quotes";
    Invoice => "invoice", "Invoices";
    Payment => "payment", "Payments";
}

impl HeadingEntity for Customer {
    const LAYOUT: EntityLayout = EntityLayout::described();

    fn from_raw(raw: RawRecord) -> Self {
        let config = &raw.config;
        Self {
            id: raw.id_text(),
            name: raw.title.clone(),
            email: config.text("email"),
            phone: config.text("phone"),
            company: config.text("company"),
            street: config.text("street"),
            city: config.text("city"),
            state: config.text("state"),
            postal_code: config.text("postalCode"),
            country: config.text("country"),
            notes: raw.body_text(),
            created: config.text("created"),
        }
    }

    fn to_raw(&self) -> RawRecord {
        let config = ConfigMap::new()
            .with_text("email", &self.email)
            .with_text("phone", &self.phone)
            .with_text("company", &self.company)
            .with_text("street", &self.street)
            .with_text("city", &self.city)
            .with_text("state", &self.state)
            .with_text("postalCode", &self.postal_code)
            .with_text("country", &self.country)
            .with_nonempty("created", &self.created);
        RawRecord::new(&self.name)
            .with_id(&self.id)
            .with_config(config)
            .with_body(&self.notes)
    }
}

heading_codec!(Customer);

impl LedgerEntity for BillingRate {
    fn from_config(config: &ConfigMap) -> Self {
        Self {
            id: config.text("id"),
            name: config.text("name"),
            hourly_rate: config.float("hourlyRate", 0.0),
            assignee: config.text("assignee"),
            is_default: config.boolean("isDefault", false),
        }
    }

    fn to_config(&self) -> ConfigMap {
        ConfigMap::new()
            .with("id", &self.id)
            .with_text("name", &self.name)
            .with("hourlyRate", format_amount(self.hourly_rate))
            .with_text("assignee", &self.assignee)
            .with("isDefault", self.is_default.to_string())
    }
}

impl LedgerEntity for Quote {
    fn from_config(config: &ConfigMap) -> Self {
        Self {
            id: config.text("id"),
            number: config.text("number"),
            customer_id: config.text("customerId"),
            title: config.text("title"),
            status: config.text_or("status", "draft"),
            valid_until: config.text("validUntil"),
            subtotal: config.float("subtotal", 0.0),
            tax_rate: config.float("taxRate", 0.0),
            tax: config.float("tax", 0.0),
            total: config.float("total", 0.0),
            created: config.text("created"),
            notes: config.text("notes"),
            sent_at: config.text("sentAt"),
            accepted_at: config.text("acceptedAt"),
        }
    }

    fn to_config(&self) -> ConfigMap {
        ConfigMap::new()
            .with("id", &self.id)
            .with_nonempty("number", &self.number)
            .with_nonempty("customerId", &self.customer_id)
            .with_text("title", &self.title)
            .with("status", &self.status)
            .with_nonempty("validUntil", &self.valid_until)
            .with("subtotal", format_amount(self.subtotal))
            .with("taxRate", format_amount(self.tax_rate))
            .with("tax", format_amount(self.tax))
            .with("total", format_amount(self.total))
            .with_nonempty("created", &self.created)
            .with_text("notes", &self.notes)
            .with_nonempty("sentAt", &self.sent_at)
            .with_nonempty("acceptedAt", &self.accepted_at)
    }
}

impl LedgerEntity for Invoice {
    fn from_config(config: &ConfigMap) -> Self {
        Self {
            id: config.text("id"),
            number: config.text("number"),
            customer_id: config.text("customerId"),
            quote_id: config.text("quoteId"),
            title: config.text("title"),
            status: config.text_or("status", "draft"),
            due_date: config.text("dueDate"),
            subtotal: config.float("subtotal", 0.0),
            tax_rate: config.float("taxRate", 0.0),
            tax: config.float("tax", 0.0),
            total: config.float("total", 0.0),
            paid_amount: config.float("paidAmount", 0.0),
            created: config.text("created"),
            notes: config.text("notes"),
            sent_at: config.text("sentAt"),
            paid_at: config.text("paidAt"),
        }
    }

    fn to_config(&self) -> ConfigMap {
        ConfigMap::new()
            .with("id", &self.id)
            .with_nonempty("number", &self.number)
            .with_nonempty("customerId", &self.customer_id)
            .with_nonempty("quoteId", &self.quote_id)
            .with_text("title", &self.title)
            .with("status", &self.status)
            .with_nonempty("dueDate", &self.due_date)
            .with("subtotal", format_amount(self.subtotal))
            .with("taxRate", format_amount(self.tax_rate))
            .with("tax", format_amount(self.tax))
            .with("total", format_amount(self.total))
            .with("paidAmount", format_amount(self.paid_amount))
            .with_nonempty("created", &self.created)
            .with_text("notes", &self.notes)
            .with_nonempty("sentAt", &self.sent_at)
            .with_nonempty("paidAt", &self.paid_at)
    }
}

impl LedgerEntity for Payment {
    fn from_config(config: &ConfigMap) -> Self {
        Self {
            id: config.text("id"),
            invoice_id: config.text("invoiceId"),
            amount: config.float("amount", 0.0),
            date: config.text("date"),
            method: config.text_or("method", "bank"),
            reference: config.text("reference"),
            notes: config.text("notes"),
        }
    }

    fn to_config(&self) -> ConfigMap {
        ConfigMap::new()
            .with("id", &self.id)
            .with("invoiceId", &self.invoice_id)
            .with("amount", format_amount(self.amount))
            .with_nonempty("date", &self.date)
            .with("method", &self.method)
            .with_text("reference", &self.reference)
            .with_text("notes", &self.notes)
    }
}

ledger_codec!(BillingRate, Quote, Invoice, Payment);
