use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::labels;

/// Days between the document date and the default due date.
pub const DEFAULT_PAYMENT_DAYS: i64 = 30;

// Generates `ALL`, `as_str`, `Display` and `FromStr` for a unit-only enum
// whose string forms match its serde representation.
macro_rules! string_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
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
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| {
                        let options: Vec<&str> = $name::ALL.iter().map(|v| v.as_str()).collect();
                        format!(
                            "Invalid {} '{}'. Valid options: {}",
                            stringify!($name),
                            s,
                            options.join(", ")
                        )
                    })
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentType {
    #[default]
    Invoice,
    PurchaseOrder,
}

string_enum!(DocumentType {
    Invoice => "invoice",
    PurchaseOrder => "purchase-order",
});

impl DocumentType {
    /// Number a freshly typed document starts from.
    pub fn default_number(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "INV-001",
            DocumentType::PurchaseOrder => "PO-001",
        }
    }
}

/// Supported label languages.
///
/// Parsing never fails: anything outside the six supported languages
/// resolves to English, and that includes persisted records written by a
/// newer build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Locale {
    #[default]
    En,
    Fr,
    Es,
    De,
    It,
    Pt,
}

impl Locale {
    pub const ALL: &'static [Locale] = &[
        Locale::En,
        Locale::Fr,
        Locale::Es,
        Locale::De,
        Locale::It,
        Locale::Pt,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Fr => "fr",
            Locale::Es => "es",
            Locale::De => "de",
            Locale::It => "it",
            Locale::Pt => "pt",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Fr => "Français",
            Locale::Es => "Español",
            Locale::De => "Deutsch",
            Locale::It => "Italiano",
            Locale::Pt => "Português",
        }
    }

    /// Supported locale for a language tag such as `fr`, `pt-BR` or
    /// `de_DE.UTF-8`, if any.
    pub fn from_tag(tag: &str) -> Option<Locale> {
        let language = tag
            .trim()
            .split(['-', '_', '.', '@'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        Locale::ALL.iter().copied().find(|l| l.code() == language)
    }

    /// Like [`Locale::from_tag`], reading unsupported tags as English.
    pub fn parse(tag: &str) -> Locale {
        Self::from_tag(tag).unwrap_or_default()
    }

    /// Locale of the host environment, `en` when nothing usable is set.
    pub fn detect() -> Locale {
        Self::detect_with(|key| std::env::var(key).ok())
    }

    pub(crate) fn detect_with(lookup: impl Fn(&str) -> Option<String>) -> Locale {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|key| lookup(key))
            .find(|value| !value.trim().is_empty())
            .map(|value| Locale::parse(&value))
            .unwrap_or_default()
    }
}

impl From<String> for Locale {
    fn from(value: String) -> Self {
        Locale::parse(&value)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
    #[default]
    Standard,
    Compact,
}

string_enum!(TemplateType {
    Standard => "standard",
    Compact => "compact",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaperSize {
    #[default]
    A4,
    A3,
    Letter,
    Custom,
}

string_enum!(PaperSize {
    A4 => "A4",
    A3 => "A3",
    Letter => "Letter",
    Custom => "Custom",
});

impl PaperSize {
    /// CSS page width and height. `Custom` has no stored dimensions and prints as A4.
    pub fn dimensions(&self) -> (&'static str, &'static str) {
        match self {
            PaperSize::A3 => ("297mm", "420mm"),
            PaperSize::Letter => ("8.5in", "11in"),
            PaperSize::A4 | PaperSize::Custom => ("210mm", "297mm"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

string_enum!(Theme {
    Light => "light",
    Dark => "dark",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    #[default]
    SansSerif,
    Serif,
    Mono,
}

string_enum!(FontFamily {
    SansSerif => "sans-serif",
    Serif => "serif",
    Mono => "mono",
});

impl FontFamily {
    pub fn css_stack(&self) -> &'static str {
        match self {
            FontFamily::SansSerif => "ui-sans-serif, system-ui, Helvetica, Arial, sans-serif",
            FontFamily::Serif => "ui-serif, Georgia, Times New Roman, serif",
            FontFamily::Mono => "ui-monospace, SFMono-Regular, Menlo, Consolas, monospace",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Base,
    Large,
}

string_enum!(FontSize {
    Small => "small",
    Base => "base",
    Large => "large",
});

impl FontSize {
    pub fn css_size(&self) -> &'static str {
        match self {
            FontSize::Small => "0.875rem",
            FontSize::Base => "1rem",
            FontSize::Large => "1.125rem",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub rate: f64,
    /// Always `quantity × rate`; tax is applied once, on the document total.
    #[serde(default)]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<f64>,
}

impl LineItem {
    /// One blank row: quantity 1, rate 0, no overrides.
    pub fn blank() -> Self {
        Self {
            id: new_item_id(),
            description: String::new(),
            quantity: 1.0,
            rate: 0.0,
            amount: 0.0,
            currency: None,
            tax_rate: None,
        }
    }

    pub fn recompute_amount(&mut self) {
        self.amount = line_amount(self.quantity, self.rate);
    }
}

pub fn new_item_id() -> String {
    Uuid::new_v4().to_string()
}

/// `quantity × rate` with both sides clamped; never NaN, infinite or negative.
pub fn line_amount(quantity: f64, rate: f64) -> f64 {
    clamp_non_negative(clamp_non_negative(quantity) * clamp_non_negative(rate))
}

/// Non-finite and negative values become 0.
pub fn clamp_non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

/// Clamp to a 0–100 percentage.
pub fn clamp_percentage(value: f64) -> f64 {
    clamp_non_negative(value).min(100.0)
}

/// Lenient numeric input: anything unparsable reads as 0.
pub fn parse_number(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .map(clamp_non_negative)
        .unwrap_or(0.0)
}

pub fn parse_percentage(raw: &str) -> f64 {
    clamp_percentage(parse_number(raw))
}

/// Display strings rendered around the document's fields.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateLabels {
    pub document_title: String,
    pub document_number_label: String,
    pub date_label: String,
    pub due_date_label: String,
    pub from_label: String,
    pub to_label: String,
    pub description_label: String,
    pub quantity_label: String,
    pub rate_label: String,
    pub amount_label: String,
    pub subtotal_label: String,
    pub tax_label: String,
    pub total_label: String,
    pub notes_label: String,
    pub terms_label: String,
    pub notes_placeholder: String,
    pub terms_placeholder: String,
    pub footer_label: String,
    pub footer_placeholder: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateSettings {
    pub logo_url: String,
    pub primary_color: String,
    pub accent_color: String,
    /// Document-level tax percentage, 0–100.
    pub tax_rate: f64,
    pub show_tax: bool,
    pub currency: String,
    pub font_family: FontFamily,
    pub font_size: FontSize,
    pub labels: TemplateLabels,
    pub template_type: TemplateType,
}

impl TemplateSettings {
    pub fn new(locale: Locale, document_type: DocumentType) -> Self {
        Self {
            logo_url: String::new(),
            primary_color: "#1e3a5f".to_string(),
            accent_color: "#ff6b6b".to_string(),
            tax_rate: 10.0,
            show_tax: true,
            currency: "$".to_string(),
            font_family: FontFamily::default(),
            font_size: FontSize::default(),
            labels: labels::resolve(locale, document_type),
            template_type: TemplateType::default(),
        }
    }
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self::new(Locale::En, DocumentType::Invoice)
    }
}

/// Per-item currency override, else the document currency.
pub fn effective_currency<'a>(item: &'a LineItem, template: &'a TemplateSettings) -> &'a str {
    item.currency
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or(&template.currency)
}

/// Per-item tax rate override, else the document tax rate.
pub fn effective_tax_rate(item: &LineItem, template: &TemplateSettings) -> f64 {
    item.tax_rate.unwrap_or(template.tax_rate)
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentData {
    #[serde(rename = "type")]
    pub document_type: DocumentType,
    pub document_number: String,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    pub from_company: String,
    pub from_address: String,
    pub from_email: String,
    pub from_phone: String,
    pub to_company: String,
    pub to_address: String,
    pub to_email: String,
    pub to_phone: String,
    pub items: Vec<LineItem>,
    pub notes: String,
    pub terms: String,
    pub footer: String,
    pub locale: Locale,
    pub template: TemplateSettings,
}

impl DocumentData {
    /// A fresh invoice dated `today`, due 30 days later, with one blank item.
    pub fn new(locale: Locale, today: NaiveDate) -> Self {
        let document_type = DocumentType::Invoice;
        Self {
            document_type,
            document_number: document_type.default_number().to_string(),
            date: today,
            due_date: today + Duration::days(DEFAULT_PAYMENT_DAYS),
            from_company: String::new(),
            from_address: String::new(),
            from_email: String::new(),
            from_phone: String::new(),
            to_company: String::new(),
            to_address: String::new(),
            to_email: String::new(),
            to_phone: String::new(),
            items: vec![LineItem::blank()],
            notes: String::new(),
            terms: String::new(),
            footer: String::new(),
            locale,
            template: TemplateSettings::new(locale, document_type),
        }
    }

    pub fn item(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == id)
    }
}

impl Default for DocumentData {
    fn default() -> Self {
        Self::new(Locale::En, Local::now().date_naive())
    }
}
