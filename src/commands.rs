//! Typed edit commands.
//!
//! Every editable field has its own variant, so an update can only ever carry
//! a value of the right type. The `*Key` enums name the fields for text input
//! (CLI arguments, prompts) and turn raw strings into commands.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use crate::error::CommandError;
use crate::model::{
    DocumentData, FontFamily, FontSize, LineItem, TemplateLabels, TemplateSettings,
    clamp_non_negative, clamp_percentage, parse_number, parse_percentage,
};

// Key enums accept `due-date`, `due_date`, `dueDate` and `DUEDATE` alike.
macro_rules! field_keys {
    ($name:ident, $kind:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CommandError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalize_key(s);
                $name::ALL
                    .iter()
                    .copied()
                    .find(|k| normalize_key(k.as_str()) == wanted)
                    .ok_or_else(|| CommandError::UnknownKey {
                        kind: $kind,
                        key: s.to_string(),
                        options: $name::ALL
                            .iter()
                            .map(|k| k.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| CommandError::InvalidDate(raw.to_string()))
}

fn parse_flag(field: &'static str, raw: &str) -> Result<bool, CommandError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(CommandError::InvalidValue {
            field,
            value: raw.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

fn parse_choice<T>(field: &'static str, raw: &str) -> Result<T, CommandError>
where
    T: FromStr<Err = String>,
{
    raw.parse::<T>().map_err(|reason| CommandError::InvalidValue {
        field,
        value: raw.to_string(),
        reason,
    })
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

field_keys!(DocumentFieldKey, "document field" {
    DocumentNumber => "document-number",
    Date => "date",
    DueDate => "due-date",
    FromCompany => "from-company",
    FromAddress => "from-address",
    FromEmail => "from-email",
    FromPhone => "from-phone",
    ToCompany => "to-company",
    ToAddress => "to-address",
    ToEmail => "to-email",
    ToPhone => "to-phone",
    Notes => "notes",
    Terms => "terms",
    Footer => "footer",
});

impl DocumentFieldKey {
    pub fn is_date(&self) -> bool {
        matches!(self, DocumentFieldKey::Date | DocumentFieldKey::DueDate)
    }
}

/// Replacement of one top-level document field.
///
/// Type, locale, items and template are not here: each has its own store
/// operation that keeps the dependent fields consistent.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentField {
    DocumentNumber(String),
    Date(NaiveDate),
    DueDate(NaiveDate),
    FromCompany(String),
    FromAddress(String),
    FromEmail(String),
    FromPhone(String),
    ToCompany(String),
    ToAddress(String),
    ToEmail(String),
    ToPhone(String),
    Notes(String),
    Terms(String),
    Footer(String),
}

impl DocumentField {
    pub fn parse(key: DocumentFieldKey, raw: &str) -> Result<Self, CommandError> {
        let text = raw.to_string();
        Ok(match key {
            DocumentFieldKey::DocumentNumber => DocumentField::DocumentNumber(text),
            DocumentFieldKey::Date => DocumentField::Date(parse_date(raw)?),
            DocumentFieldKey::DueDate => DocumentField::DueDate(parse_date(raw)?),
            DocumentFieldKey::FromCompany => DocumentField::FromCompany(text),
            DocumentFieldKey::FromAddress => DocumentField::FromAddress(text),
            DocumentFieldKey::FromEmail => DocumentField::FromEmail(text),
            DocumentFieldKey::FromPhone => DocumentField::FromPhone(text),
            DocumentFieldKey::ToCompany => DocumentField::ToCompany(text),
            DocumentFieldKey::ToAddress => DocumentField::ToAddress(text),
            DocumentFieldKey::ToEmail => DocumentField::ToEmail(text),
            DocumentFieldKey::ToPhone => DocumentField::ToPhone(text),
            DocumentFieldKey::Notes => DocumentField::Notes(text),
            DocumentFieldKey::Terms => DocumentField::Terms(text),
            DocumentFieldKey::Footer => DocumentField::Footer(text),
        })
    }

    pub(crate) fn apply(self, doc: &mut DocumentData) {
        match self {
            DocumentField::DocumentNumber(v) => doc.document_number = v,
            DocumentField::Date(v) => doc.date = v,
            DocumentField::DueDate(v) => doc.due_date = v,
            DocumentField::FromCompany(v) => doc.from_company = v,
            DocumentField::FromAddress(v) => doc.from_address = v,
            DocumentField::FromEmail(v) => doc.from_email = v,
            DocumentField::FromPhone(v) => doc.from_phone = v,
            DocumentField::ToCompany(v) => doc.to_company = v,
            DocumentField::ToAddress(v) => doc.to_address = v,
            DocumentField::ToEmail(v) => doc.to_email = v,
            DocumentField::ToPhone(v) => doc.to_phone = v,
            DocumentField::Notes(v) => doc.notes = v,
            DocumentField::Terms(v) => doc.terms = v,
            DocumentField::Footer(v) => doc.footer = v,
        }
    }
}

field_keys!(TemplateFieldKey, "template field" {
    LogoUrl => "logo-url",
    PrimaryColor => "primary-color",
    AccentColor => "accent-color",
    TaxRate => "tax-rate",
    ShowTax => "show-tax",
    Currency => "currency",
    FontFamily => "font-family",
    FontSize => "font-size",
});

/// Replacement of one template setting. Labels and the layout variant go
/// through their own store operations.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateField {
    LogoUrl(String),
    PrimaryColor(String),
    AccentColor(String),
    TaxRate(f64),
    ShowTax(bool),
    Currency(String),
    FontFamily(FontFamily),
    FontSize(FontSize),
}

impl TemplateField {
    pub fn parse(key: TemplateFieldKey, raw: &str) -> Result<Self, CommandError> {
        Ok(match key {
            TemplateFieldKey::LogoUrl => TemplateField::LogoUrl(raw.trim().to_string()),
            TemplateFieldKey::PrimaryColor => TemplateField::PrimaryColor(raw.trim().to_string()),
            TemplateFieldKey::AccentColor => TemplateField::AccentColor(raw.trim().to_string()),
            TemplateFieldKey::TaxRate => TemplateField::TaxRate(parse_percentage(raw)),
            TemplateFieldKey::ShowTax => TemplateField::ShowTax(parse_flag("show-tax", raw)?),
            TemplateFieldKey::Currency => TemplateField::Currency(raw.trim().to_string()),
            TemplateFieldKey::FontFamily => {
                TemplateField::FontFamily(parse_choice("font-family", raw)?)
            }
            TemplateFieldKey::FontSize => TemplateField::FontSize(parse_choice("font-size", raw)?),
        })
    }

    pub(crate) fn apply(self, template: &mut TemplateSettings) {
        match self {
            TemplateField::LogoUrl(v) => template.logo_url = v,
            TemplateField::PrimaryColor(v) => template.primary_color = v,
            TemplateField::AccentColor(v) => template.accent_color = v,
            TemplateField::TaxRate(v) => template.tax_rate = clamp_percentage(v),
            TemplateField::ShowTax(v) => template.show_tax = v,
            TemplateField::Currency(v) => template.currency = v,
            TemplateField::FontFamily(v) => template.font_family = v,
            TemplateField::FontSize(v) => template.font_size = v,
        }
    }
}

field_keys!(LabelKey, "label" {
    DocumentTitle => "document-title",
    DocumentNumberLabel => "document-number-label",
    DateLabel => "date-label",
    DueDateLabel => "due-date-label",
    FromLabel => "from-label",
    ToLabel => "to-label",
    DescriptionLabel => "description-label",
    QuantityLabel => "quantity-label",
    RateLabel => "rate-label",
    AmountLabel => "amount-label",
    SubtotalLabel => "subtotal-label",
    TaxLabel => "tax-label",
    TotalLabel => "total-label",
    NotesLabel => "notes-label",
    TermsLabel => "terms-label",
    NotesPlaceholder => "notes-placeholder",
    TermsPlaceholder => "terms-placeholder",
    FooterLabel => "footer-label",
    FooterPlaceholder => "footer-placeholder",
});

impl TemplateLabels {
    pub fn get(&self, key: LabelKey) -> &str {
        match key {
            LabelKey::DocumentTitle => &self.document_title,
            LabelKey::DocumentNumberLabel => &self.document_number_label,
            LabelKey::DateLabel => &self.date_label,
            LabelKey::DueDateLabel => &self.due_date_label,
            LabelKey::FromLabel => &self.from_label,
            LabelKey::ToLabel => &self.to_label,
            LabelKey::DescriptionLabel => &self.description_label,
            LabelKey::QuantityLabel => &self.quantity_label,
            LabelKey::RateLabel => &self.rate_label,
            LabelKey::AmountLabel => &self.amount_label,
            LabelKey::SubtotalLabel => &self.subtotal_label,
            LabelKey::TaxLabel => &self.tax_label,
            LabelKey::TotalLabel => &self.total_label,
            LabelKey::NotesLabel => &self.notes_label,
            LabelKey::TermsLabel => &self.terms_label,
            LabelKey::NotesPlaceholder => &self.notes_placeholder,
            LabelKey::TermsPlaceholder => &self.terms_placeholder,
            LabelKey::FooterLabel => &self.footer_label,
            LabelKey::FooterPlaceholder => &self.footer_placeholder,
        }
    }

    pub fn set(&mut self, key: LabelKey, value: String) {
        let slot = match key {
            LabelKey::DocumentTitle => &mut self.document_title,
            LabelKey::DocumentNumberLabel => &mut self.document_number_label,
            LabelKey::DateLabel => &mut self.date_label,
            LabelKey::DueDateLabel => &mut self.due_date_label,
            LabelKey::FromLabel => &mut self.from_label,
            LabelKey::ToLabel => &mut self.to_label,
            LabelKey::DescriptionLabel => &mut self.description_label,
            LabelKey::QuantityLabel => &mut self.quantity_label,
            LabelKey::RateLabel => &mut self.rate_label,
            LabelKey::AmountLabel => &mut self.amount_label,
            LabelKey::SubtotalLabel => &mut self.subtotal_label,
            LabelKey::TaxLabel => &mut self.tax_label,
            LabelKey::TotalLabel => &mut self.total_label,
            LabelKey::NotesLabel => &mut self.notes_label,
            LabelKey::TermsLabel => &mut self.terms_label,
            LabelKey::NotesPlaceholder => &mut self.notes_placeholder,
            LabelKey::TermsPlaceholder => &mut self.terms_placeholder,
            LabelKey::FooterLabel => &mut self.footer_label,
            LabelKey::FooterPlaceholder => &mut self.footer_placeholder,
        };
        *slot = value;
    }
}

field_keys!(LineItemFieldKey, "item field" {
    Description => "description",
    Quantity => "quantity",
    Rate => "rate",
    Currency => "currency",
    TaxRate => "tax-rate",
});

/// Change to one field of one line item. `None` overrides fall back to the
/// document's value.
#[derive(Debug, Clone, PartialEq)]
pub enum LineItemField {
    Description(String),
    Quantity(f64),
    Rate(f64),
    Currency(Option<String>),
    TaxRate(Option<f64>),
}

impl LineItemField {
    /// Numbers are read leniently: bad input becomes 0, blank overrides are cleared.
    pub fn parse(key: LineItemFieldKey, raw: &str) -> Self {
        match key {
            LineItemFieldKey::Description => LineItemField::Description(raw.to_string()),
            LineItemFieldKey::Quantity => LineItemField::Quantity(parse_number(raw)),
            LineItemFieldKey::Rate => LineItemField::Rate(parse_number(raw)),
            LineItemFieldKey::Currency => LineItemField::Currency(non_empty(raw)),
            LineItemFieldKey::TaxRate => {
                LineItemField::TaxRate(non_empty(raw).map(|v| parse_percentage(&v)))
            }
        }
    }

    pub fn affects_amount(&self) -> bool {
        matches!(
            self,
            LineItemField::Quantity(_) | LineItemField::Rate(_) | LineItemField::TaxRate(_)
        )
    }

    pub(crate) fn apply(self, item: &mut LineItem) {
        let recompute = self.affects_amount();
        match self {
            LineItemField::Description(v) => item.description = v,
            LineItemField::Quantity(v) => item.quantity = clamp_non_negative(v),
            LineItemField::Rate(v) => item.rate = clamp_non_negative(v),
            LineItemField::Currency(v) => item.currency = v,
            LineItemField::TaxRate(v) => item.tax_rate = v.map(clamp_percentage),
        }
        if recompute {
            item.recompute_amount();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Locale;

    #[test]
    fn test_key_spellings() {
        assert_eq!("due-date".parse::<DocumentFieldKey>().unwrap(), DocumentFieldKey::DueDate);
        assert_eq!("dueDate".parse::<DocumentFieldKey>().unwrap(), DocumentFieldKey::DueDate);
        assert_eq!("DUE_DATE".parse::<DocumentFieldKey>().unwrap(), DocumentFieldKey::DueDate);
        assert_eq!("documentTitle".parse::<LabelKey>().unwrap(), LabelKey::DocumentTitle);
        assert_eq!("tax-rate".parse::<LineItemFieldKey>().unwrap(), LineItemFieldKey::TaxRate);
    }

    #[test]
    fn test_unknown_key_lists_options() {
        let err = "colour".parse::<TemplateFieldKey>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("colour"));
        assert!(message.contains("primary-color"));
    }

    #[test]
    fn test_document_field_dates() {
        let field = DocumentField::parse(DocumentFieldKey::Date, "2025-03-01").unwrap();
        assert_eq!(
            field,
            DocumentField::Date(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
        );
        assert!(matches!(
            DocumentField::parse(DocumentFieldKey::DueDate, "next week"),
            Err(CommandError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_document_field_apply() {
        let mut doc = DocumentData::new(Locale::En, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        DocumentField::ToCompany("Acme".to_string()).apply(&mut doc);
        DocumentField::Notes("Net 30".to_string()).apply(&mut doc);
        assert_eq!(doc.to_company, "Acme");
        assert_eq!(doc.notes, "Net 30");
    }

    #[test]
    fn test_template_field_parse() {
        assert_eq!(
            TemplateField::parse(TemplateFieldKey::TaxRate, "abc").unwrap(),
            TemplateField::TaxRate(0.0)
        );
        assert_eq!(
            TemplateField::parse(TemplateFieldKey::ShowTax, "off").unwrap(),
            TemplateField::ShowTax(false)
        );
        assert_eq!(
            TemplateField::parse(TemplateFieldKey::FontFamily, "mono").unwrap(),
            TemplateField::FontFamily(FontFamily::Mono)
        );
        assert!(TemplateField::parse(TemplateFieldKey::ShowTax, "maybe").is_err());
        assert!(TemplateField::parse(TemplateFieldKey::FontSize, "huge").is_err());
    }

    #[test]
    fn test_label_get_set() {
        let mut labels = TemplateLabels::default();
        for key in LabelKey::ALL.iter().copied() {
            labels.set(key, key.as_str().to_uppercase());
        }
        for key in LabelKey::ALL.iter().copied() {
            assert_eq!(labels.get(key), key.as_str().to_uppercase());
        }
    }

    #[test]
    fn test_line_item_field_parse_is_lenient() {
        assert_eq!(
            LineItemField::parse(LineItemFieldKey::Quantity, "two"),
            LineItemField::Quantity(0.0)
        );
        assert_eq!(
            LineItemField::parse(LineItemFieldKey::Currency, "  "),
            LineItemField::Currency(None)
        );
        assert_eq!(
            LineItemField::parse(LineItemFieldKey::TaxRate, "7.5"),
            LineItemField::TaxRate(Some(7.5))
        );
        assert_eq!(
            LineItemField::parse(LineItemFieldKey::TaxRate, ""),
            LineItemField::TaxRate(None)
        );
    }

    #[test]
    fn test_line_item_field_recomputes_amount() {
        let mut item = LineItem::blank();
        LineItemField::Rate(12.5).apply(&mut item);
        assert_eq!(item.amount, 12.5);
        LineItemField::Quantity(4.0).apply(&mut item);
        assert_eq!(item.amount, 50.0);
        LineItemField::Quantity(f64::NAN).apply(&mut item);
        assert_eq!(item.quantity, 0.0);
        assert_eq!(item.amount, 0.0);
        LineItemField::Description("Consulting".to_string()).apply(&mut item);
        assert_eq!(item.description, "Consulting");
    }
}
