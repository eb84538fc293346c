use serde::Serialize;

use crate::model::{DocumentData, LineItem, TemplateSettings};

/// Derived document totals. Never stored; recomputed on every read.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl Totals {
    /// Sum of item amounts, plus document-level tax when `show_tax` is on.
    pub fn calculate(items: &[LineItem], template: &TemplateSettings) -> Self {
        let subtotal: f64 = items.iter().map(|i| i.amount).sum();
        let tax = if template.show_tax {
            subtotal * (template.tax_rate / 100.0)
        } else {
            0.0
        };

        Self {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }

    pub fn for_document(doc: &DocumentData) -> Self {
        Self::calculate(&doc.items, &doc.template)
    }
}
