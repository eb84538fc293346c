//! HTML rendering of a document in one of the two layouts.
//!
//! The output is a self-contained page sized to the chosen paper; printing
//! and PDF conversion are left to whatever opens the file.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use tracing::info;

use crate::error::RenderError;
use crate::model::{
    DocumentData, PaperSize, TemplateLabels, TemplateType, effective_currency,
};
use crate::storage::PersistedState;
use crate::totals::Totals;

const STANDARD_TEMPLATE: &str = include_str!("../templates/standard.html.tera");
const COMPACT_TEMPLATE: &str = include_str!("../templates/compact.html.tera");

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Ask the viewer to open its print dialog once the page loads.
    pub auto_print: bool,
}

#[derive(Serialize)]
struct Row {
    description: String,
    quantity: String,
    rate: String,
    amount: String,
}

#[derive(Serialize)]
struct RenderContext<'a> {
    doc: &'a DocumentData,
    labels: &'a TemplateLabels,
    rows: Vec<Row>,
    date: String,
    due_date: String,
    subtotal: String,
    tax: String,
    total: String,
    tax_rate: String,
    show_tax: bool,
    page_width: &'static str,
    page_height: &'static str,
    font_family: &'static str,
    font_size: &'static str,
    auto_print: bool,
}

pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (template_name(TemplateType::Standard), STANDARD_TEMPLATE),
            (template_name(TemplateType::Compact), COMPACT_TEMPLATE),
        ])?;
        Ok(Self { tera })
    }

    /// Render with the layout stored on the document's template.
    pub fn render(
        &self,
        doc: &DocumentData,
        paper_size: PaperSize,
        options: RenderOptions,
    ) -> Result<String, RenderError> {
        let template = &doc.template;
        let currency = template.currency.as_str();
        let totals = Totals::for_document(doc);
        let (page_width, page_height) = paper_size.dimensions();

        let rows = doc
            .items
            .iter()
            .map(|item| {
                let item_currency = effective_currency(item, template);
                Row {
                    description: item.description.clone(),
                    quantity: format_quantity(item.quantity),
                    rate: format_money(item_currency, item.rate),
                    amount: format_money(item_currency, item.amount),
                }
            })
            .collect();

        let ctx = RenderContext {
            doc,
            labels: &template.labels,
            rows,
            date: doc.date.format("%Y-%m-%d").to_string(),
            due_date: doc.due_date.format("%Y-%m-%d").to_string(),
            subtotal: format_money(currency, totals.subtotal),
            tax: format_money(currency, totals.tax),
            total: format_money(currency, totals.total),
            tax_rate: format_quantity(template.tax_rate),
            show_tax: template.show_tax,
            page_width,
            page_height,
            font_family: template.font_family.css_stack(),
            font_size: template.font_size.css_size(),
            auto_print: options.auto_print,
        };

        let context = Context::from_serialize(&ctx)?;
        Ok(self
            .tera
            .render(template_name(template.template_type), &context)?)
    }

    pub fn render_state(
        &self,
        state: &PersistedState,
        options: RenderOptions,
    ) -> Result<String, RenderError> {
        self.render(&state.document_data, state.paper_size, options)
    }

    /// Write the rendered page to `<output_dir>/<document number>.html`.
    pub fn export(
        &self,
        state: &PersistedState,
        output_dir: &Path,
        options: RenderOptions,
    ) -> Result<PathBuf, RenderError> {
        let html = self.render_state(state, options)?;
        let path = output_dir.join(format!(
            "{}.html",
            file_stem(&state.document_data.document_number)
        ));

        let write_err = |source| RenderError::Write {
            path: path.clone(),
            source,
        };
        fs::create_dir_all(output_dir).map_err(write_err)?;
        fs::write(&path, html).map_err(write_err)?;

        info!(path = %path.display(), "document exported");
        Ok(path)
    }
}

fn template_name(template_type: TemplateType) -> &'static str {
    match template_type {
        TemplateType::Standard => "standard.html",
        TemplateType::Compact => "compact.html",
    }
}

pub fn format_money(currency: &str, value: f64) -> String {
    format!("{}{:.2}", currency, value)
}

/// Whole numbers without decimals, fractions as entered.
pub fn format_quantity(value: f64) -> String {
    format!("{}", value)
}

/// Safe file name from a document number; empty numbers become `document`.
pub fn file_stem(document_number: &str) -> String {
    let stem: String = document_number
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() { "document".to_string() } else { stem }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentType, LineItem, Locale, TemplateType, line_amount};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn sample_doc() -> DocumentData {
        let mut doc = DocumentData::new(Locale::En, NaiveDate::from_ymd_opt(2025, 2, 3).unwrap());
        doc.from_company = "Northwind".to_string();
        doc.to_company = "Contoso <Ltd>".to_string();
        doc.items = vec![
            LineItem {
                description: "Design work".to_string(),
                quantity: 2.0,
                rate: 50.0,
                amount: line_amount(2.0, 50.0),
                ..LineItem::blank()
            },
            LineItem {
                description: "Hosting".to_string(),
                quantity: 1.5,
                rate: 10.0,
                amount: line_amount(1.5, 10.0),
                currency: Some("€".to_string()),
                tax_rate: Some(20.0),
                ..LineItem::blank()
            },
        ];
        doc
    }

    #[test]
    fn test_standard_layout() {
        let renderer = Renderer::new().unwrap();
        let html = renderer
            .render(&sample_doc(), PaperSize::A4, RenderOptions::default())
            .unwrap();

        assert!(html.contains("INVOICE"));
        assert!(html.contains("Design work"));
        assert!(html.contains("$100.00"));
        assert!(html.contains("€15.00"));
        assert!(html.contains("$115.00"));
        assert!(html.contains("$11.50"));
        assert!(html.contains("$126.50"));
        assert!(html.contains("Tax (10%)"));
        assert!(html.contains("2025-03-05"));
        assert!(html.contains("210mm"));
        assert!(!html.contains("window.print()"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let renderer = Renderer::new().unwrap();
        let html = renderer
            .render(&sample_doc(), PaperSize::A4, RenderOptions::default())
            .unwrap();
        assert!(html.contains("Contoso &lt;Ltd&gt;"));
        assert!(!html.contains("Contoso <Ltd>"));
    }

    #[test]
    fn test_compact_layout_rows_show_document_tax_rate() {
        let mut doc = sample_doc();
        doc.template.template_type = TemplateType::Compact;
        let renderer = Renderer::new().unwrap();
        let html = renderer
            .render(&doc, PaperSize::Letter, RenderOptions { auto_print: true })
            .unwrap();

        assert!(html.contains("class=\"items\""));
        assert_eq!(html.matches("<td class=\"num\">10%</td>").count(), 2);
        assert!(!html.contains("20%"));
        assert!(html.contains("8.5in"));
        assert!(html.contains("window.print()"));
        assert!(html.contains("$126.50"));
    }

    #[test]
    fn test_compact_rows_follow_document_rate_changes() {
        let mut doc = sample_doc();
        doc.template.template_type = TemplateType::Compact;
        doc.items[0].tax_rate = Some(10.0);
        doc.template.tax_rate = 20.0;
        let renderer = Renderer::new().unwrap();
        let html = renderer
            .render(&doc, PaperSize::A4, RenderOptions::default())
            .unwrap();

        assert_eq!(html.matches("<td class=\"num\">20%</td>").count(), 2);
        assert!(!html.contains("<td class=\"num\">10%</td>"));
        assert!(html.contains("$23.00"));
    }

    #[test]
    fn test_hidden_tax_line() {
        let mut doc = sample_doc();
        doc.template.show_tax = false;
        let renderer = Renderer::new().unwrap();
        let html = renderer
            .render(&doc, PaperSize::A4, RenderOptions::default())
            .unwrap();
        assert!(!html.contains("Tax (10%)"));
        assert!(html.contains("$115.00"));
    }

    #[test]
    fn test_purchase_order_labels_rendered() {
        let mut doc = sample_doc();
        doc.document_type = DocumentType::PurchaseOrder;
        doc.template.labels = crate::labels::resolve(Locale::De, DocumentType::PurchaseOrder);
        let renderer = Renderer::new().unwrap();
        let html = renderer
            .render(&doc, PaperSize::A4, RenderOptions::default())
            .unwrap();
        assert!(html.contains("BESTELLUNG"));
        assert!(html.contains("Lieferdatum"));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempdir().unwrap();
        let mut state = PersistedState::default();
        state.document_data = sample_doc();
        state.document_data.document_number = "INV/2025 01".to_string();

        let renderer = Renderer::new().unwrap();
        let path = renderer
            .export(&state, &dir.path().join("out"), RenderOptions::default())
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "INV_2025_01.html");
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("Northwind"));
    }

    #[test]
    fn test_formatting_helpers() {
        assert_eq!(format_money("$", 10.0), "$10.00");
        assert_eq!(format_money("£", 0.126), "£0.13");
        assert_eq!(format_quantity(3.0), "3");
        assert_eq!(format_quantity(2.5), "2.5");
        assert_eq!(file_stem("  "), "document");
        assert_eq!(file_stem("PO-001"), "PO-001");
    }
}
