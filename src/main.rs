use chrono::{Local, NaiveDate};
use clap::{CommandFactory, Parser, Subcommand};
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};
use inquire::{Confirm, DateSelect, Text};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing_subscriber::EnvFilter;

use invoice_composer::commands::{
    DocumentField, DocumentFieldKey, LabelKey, LineItemField, LineItemFieldKey, TemplateField,
    TemplateFieldKey,
};
use invoice_composer::config::{Settings, default_config_path};
use invoice_composer::model::{
    DocumentData, DocumentType, Locale, PaperSize, TemplateType, Theme, effective_currency,
};
use invoice_composer::error::StorageError;
use invoice_composer::render::{RenderOptions, Renderer, format_money, format_quantity};
use invoice_composer::storage::JsonFileStorage;
use invoice_composer::{DocumentStore, Result, logo};

type Store = DocumentStore<JsonFileStorage>;

// ==========================================
// CLI
// ==========================================

#[derive(Parser)]
#[command(name = "invoice-composer")]
#[command(version)]
#[command(about = "Compose, preview and print invoices and purchase orders", long_about = None)]
struct Cli {
    /// Path to settings file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current document with its totals
    Show,
    /// Start a new document, discarding the current one
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Set a document field (prompts when no value is given)
    Set {
        field: DocumentFieldKey,
        value: Option<String>,
    },
    /// Change a template setting
    Template { field: TemplateFieldKey, value: String },
    /// Override one label on this document
    Label { key: LabelKey, value: String },
    /// List the document's labels
    Labels,
    /// Manage line items
    #[command(subcommand)]
    Item(ItemCommand),
    /// Switch label language (en, fr, es, de, it, pt)
    Locale { code: String },
    /// Switch between invoice and purchase-order
    DocType { document_type: DocumentType },
    /// Choose the layout (standard, compact)
    Layout { template_type: TemplateType },
    /// Choose the paper size (A4, A3, Letter, Custom)
    Paper { size: PaperSize },
    /// Choose the theme (light, dark)
    Theme { theme: Theme },
    /// Set the logo from an image file or URL (opens a file picker when omitted)
    Logo { source: Option<String> },
    /// Write the document as a printable HTML page
    Export {
        /// Open the print dialog when the page loads
        #[arg(long)]
        print: bool,
        /// Hand the page to the system viewer
        #[arg(long)]
        open: bool,
    },
    /// Configure data directory
    Config,
}

#[derive(Subcommand)]
enum ItemCommand {
    /// Append a line item
    Add {
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        quantity: Option<String>,
        #[arg(long)]
        rate: Option<String>,
    },
    /// Remove a line item by position or id
    Remove { item: String },
    /// Change one field of a line item
    Update {
        item: String,
        field: LineItemFieldKey,
        value: String,
    },
    /// Enter line items interactively
    Enter,
}

// ==========================================
// Main Function
// ==========================================

fn main() {
    init_logging();

    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        return Ok(());
    };

    if let Commands::Config = command {
        setup_config_wizard(cli.config)?;
        return Ok(());
    }

    let settings = Settings::load(cli.config)?;
    let storage = JsonFileStorage::new(settings.store_path());

    // Reset never reads the stored record, so an unreadable one can be replaced.
    if let Commands::Reset { yes } = command {
        return reset_document(storage, yes);
    }

    let mut store = DocumentStore::open(storage).inspect_err(|e| {
        if let StorageError::Parse(_) = e {
            println!("💡 Run `invoice-composer reset` to start a new document.");
        }
    })?;

    match command {
        Commands::Show => show_document(&store),
        Commands::Set { field, value } => {
            let raw = match value {
                Some(v) => v,
                None => prompt_document_field(store.document(), field)?,
            };
            store.update_field(DocumentField::parse(field, &raw)?);
            println!("✅ {} updated.", field);
        }
        Commands::Template { field, value } => {
            store.update_template_field(TemplateField::parse(field, &value)?);
            println!("✅ {} updated.", field);
        }
        Commands::Label { key, value } => {
            store.update_label_field(key, value);
            println!("✅ {} updated.", key);
        }
        Commands::Labels => show_labels(store.document()),
        Commands::Item(cmd) => run_item_command(&mut store, cmd)?,
        Commands::Locale { code } => {
            let locale = Locale::from_tag(&code).unwrap_or_else(|| {
                println!("⚠️  '{}' is not supported, using English.", code);
                Locale::En
            });
            store.set_locale(locale);
            println!("✅ Locale: {}", locale.display_name());
        }
        Commands::DocType { document_type } => {
            store.set_document_type(document_type);
            println!(
                "✅ Document type: {} ({})",
                document_type,
                store.document().document_number
            );
        }
        Commands::Layout { template_type } => {
            store.set_template_type(template_type);
            println!("✅ Layout: {}", template_type);
        }
        Commands::Paper { size } => {
            store.set_paper_size(size);
            println!("✅ Paper size: {}", size);
        }
        Commands::Theme { theme } => {
            store.set_theme(theme);
            println!("✅ Theme: {}", theme);
        }
        Commands::Logo { source } => set_logo(&mut store, source)?,
        Commands::Export { print, open } => {
            let renderer = Renderer::new()?;
            let path = renderer.export(
                store.state(),
                &settings.output_path(),
                RenderOptions { auto_print: print },
            )?;
            println!("✅ Exported: {:?}", path);
            if open || print {
                open_in_viewer(&path);
            }
        }
        Commands::Config | Commands::Reset { .. } => {
            unreachable!("handled before the store is opened")
        }
    }

    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn reset_document(storage: JsonFileStorage, yes: bool) -> Result<()> {
    let confirmed = yes
        || Confirm::new("Discard the current document and start a new one?")
            .with_default(false)
            .prompt()?;
    if !confirmed {
        println!("Cancelled");
        return Ok(());
    }

    let mut store = DocumentStore::create(storage, Locale::detect(), today());
    store.reset(Locale::detect(), today());
    println!("✅ Started a new document.");
    Ok(())
}

// ==========================================
// Line Items
// ==========================================

fn run_item_command(store: &mut Store, cmd: ItemCommand) -> Result<()> {
    match cmd {
        ItemCommand::Add {
            description,
            quantity,
            rate,
        } => {
            let id = store.add_line_item();
            let fields = [
                (LineItemFieldKey::Description, description),
                (LineItemFieldKey::Quantity, quantity),
                (LineItemFieldKey::Rate, rate),
            ];
            for (key, value) in fields {
                if let Some(raw) = value {
                    store.update_line_item(&id, LineItemField::parse(key, &raw));
                }
            }
            println!("✅ Added item {}", short_id(&id));
        }
        ItemCommand::Remove { item } => {
            let id = resolve_item_ref(store.document(), &item);
            if store.remove_line_item(&id) {
                println!("✅ Removed item {}", short_id(&id));
            } else if store.document().items.len() <= 1 {
                println!("⚠️  A document keeps at least one line item.");
            } else {
                println!("❌ No line item matches '{}'.", item);
            }
        }
        ItemCommand::Update { item, field, value } => {
            let id = resolve_item_ref(store.document(), &item);
            if store.update_line_item(&id, LineItemField::parse(field, &value)) {
                println!("✅ Item {} {} updated.", short_id(&id), field);
            } else {
                println!("❌ No line item matches '{}'.", item);
            }
        }
        ItemCommand::Enter => enter_line_items(store)?,
    }
    Ok(())
}

fn enter_line_items(store: &mut Store) -> Result<()> {
    println!("\n--- Enter Line Items ---");
    println!("(Leave Description empty to finish)");

    loop {
        let desc = Text::new("Description (leave empty to finish):").prompt()?;
        if desc.trim().is_empty() {
            break;
        }
        let quantity = Text::new("Quantity:").with_default("1").prompt()?;
        let rate = Text::new("Rate:").prompt()?;

        let id = store.add_line_item();
        store.update_line_item(&id, LineItemField::Description(desc));
        store.update_line_item(&id, LineItemField::parse(LineItemFieldKey::Quantity, &quantity));
        store.update_line_item(&id, LineItemField::parse(LineItemFieldKey::Rate, &rate));

        if let Some(item) = store.document().item(&id) {
            let currency = effective_currency(item, &store.document().template);
            println!("   ➕ {}", format_money(currency, item.amount));
        }
    }

    show_totals(store);
    Ok(())
}

/// Accepts a 1-based position, a full id, or a unique id prefix.
fn resolve_item_ref(doc: &DocumentData, reference: &str) -> String {
    if let Ok(position) = reference.parse::<usize>() {
        if let Some(item) = position.checked_sub(1).and_then(|i| doc.items.get(i)) {
            return item.id.clone();
        }
    }
    let mut matches = doc.items.iter().filter(|i| i.id.starts_with(reference));
    match (matches.next(), matches.next()) {
        (Some(item), None) => item.id.clone(),
        _ => reference.to_string(),
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

// ==========================================
// Display
// ==========================================

fn show_document(store: &Store) {
    let doc = store.document();
    let labels = &doc.template.labels;
    let state = store.state();

    println!("\n📄 {} {}", labels.document_title, doc.document_number);
    println!(
        "   {}: {}   {}: {}",
        labels.date_label, doc.date, labels.due_date_label, doc.due_date
    );
    println!("   {}: {}", labels.from_label, doc.from_company);
    println!("   {}: {}", labels.to_label, doc.to_company);
    println!(
        "   {} · {} · {} · {}",
        doc.locale.display_name(),
        state.template_type,
        state.paper_size,
        state.theme
    );

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("#"),
        Cell::new("ID"),
        Cell::new(&labels.description_label),
        Cell::new(&labels.quantity_label),
        Cell::new(&labels.rate_label),
        Cell::new(&labels.amount_label),
    ]);

    for (index, item) in doc.items.iter().enumerate() {
        let currency = effective_currency(item, &doc.template);
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(short_id(&item.id)),
            Cell::new(&item.description),
            Cell::new(format_quantity(item.quantity)).set_alignment(CellAlignment::Right),
            Cell::new(format_money(currency, item.rate)).set_alignment(CellAlignment::Right),
            Cell::new(format_money(currency, item.amount)).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{table}");
    show_totals(store);
}

fn show_totals(store: &Store) {
    let doc = store.document();
    let labels = &doc.template.labels;
    let currency = &doc.template.currency;
    let totals = store.totals();

    let mut table = Table::new();
    table.add_row(vec![
        Cell::new(&labels.subtotal_label),
        Cell::new(format_money(currency, totals.subtotal)).set_alignment(CellAlignment::Right),
    ]);
    if doc.template.show_tax {
        table.add_row(vec![
            Cell::new(format!(
                "{} ({}%)",
                labels.tax_label,
                format_quantity(doc.template.tax_rate)
            )),
            Cell::new(format_money(currency, totals.tax)).set_alignment(CellAlignment::Right),
        ]);
    }
    table.add_row(vec![
        Cell::new(&labels.total_label).add_attribute(Attribute::Bold),
        Cell::new(format_money(currency, totals.total))
            .add_attribute(Attribute::Bold)
            .fg(Color::Rgb { r: 4, g: 120, b: 87 })
            .set_alignment(CellAlignment::Right),
    ]);
    println!("{table}");
}

fn show_labels(doc: &DocumentData) {
    let mut table = Table::new();
    table.set_header(vec![Cell::new("Key"), Cell::new("Label")]);
    for key in LabelKey::ALL.iter().copied() {
        table.add_row(vec![Cell::new(key), Cell::new(doc.template.labels.get(key))]);
    }
    println!("{table}");
}

// ==========================================
// Prompts
// ==========================================

fn prompt_document_field(doc: &DocumentData, key: DocumentFieldKey) -> Result<String> {
    let prompt = format!("{}:", key);
    if key.is_date() {
        let current = if key == DocumentFieldKey::Date {
            doc.date
        } else {
            doc.due_date
        };
        let date = DateSelect::new(&prompt).with_default(current).prompt()?;
        return Ok(date.format("%Y-%m-%d").to_string());
    }

    let current = match key {
        DocumentFieldKey::DocumentNumber => &doc.document_number,
        DocumentFieldKey::FromCompany => &doc.from_company,
        DocumentFieldKey::FromAddress => &doc.from_address,
        DocumentFieldKey::FromEmail => &doc.from_email,
        DocumentFieldKey::FromPhone => &doc.from_phone,
        DocumentFieldKey::ToCompany => &doc.to_company,
        DocumentFieldKey::ToAddress => &doc.to_address,
        DocumentFieldKey::ToEmail => &doc.to_email,
        DocumentFieldKey::ToPhone => &doc.to_phone,
        DocumentFieldKey::Notes => &doc.notes,
        DocumentFieldKey::Terms => &doc.terms,
        DocumentFieldKey::Footer => &doc.footer,
        DocumentFieldKey::Date | DocumentFieldKey::DueDate => unreachable!("dates handled above"),
    };
    Ok(Text::new(&prompt).with_initial_value(current).prompt()?)
}

fn set_logo(store: &mut Store, source: Option<String>) -> Result<()> {
    let source = match source {
        Some(s) => s,
        None => {
            println!("📂 Opening file picker...");
            let picked = rfd::FileDialog::new()
                .set_title("Select Logo")
                .add_filter("Images", &["png", "jpg", "jpeg", "gif", "svg", "webp"])
                .pick_file();
            match picked {
                Some(path) => path.to_string_lossy().to_string(),
                None => {
                    println!("❌ No file selected. Falling back to manual input.");
                    Text::new("Logo URL (leave empty to remove):").prompt()?
                }
            }
        }
    };

    let logo_url = logo::ingest(&source)?;
    let removed = logo_url.is_empty();
    store.update_template_field(TemplateField::LogoUrl(logo_url));
    if removed {
        println!("✅ Logo removed.");
    } else {
        println!("✅ Logo updated.");
    }
    Ok(())
}

// ==========================================
// Config & Utilities
// ==========================================

fn setup_config_wizard(config_path: Option<PathBuf>) -> Result<Settings> {
    println!("\n⚙️  --- Configuration Setup ---");
    let path = config_path.unwrap_or_else(default_config_path);
    let mut settings = Settings::load(Some(path.clone()))?;

    println!("📂 Opening folder picker...");
    let picked_path = rfd::FileDialog::new()
        .set_title("Select Data Directory")
        .pick_folder();

    settings.data_root = match picked_path {
        Some(p) => p.to_string_lossy().to_string(),
        None => {
            println!("❌ No folder selected. Falling back to manual input.");
            Text::new("Enter Data Directory:")
                .with_default(&settings.data_root)
                .prompt()?
        }
    };

    settings.save(&path)?;
    println!("✅ Settings saved to {:?}", path);
    Ok(settings)
}

// Hand the exported page to the platform viewer; its outcome is not tracked.
fn open_in_viewer(path: &Path) {
    let program = if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    };
    Command::new(program).arg(path).spawn().ok();
}
