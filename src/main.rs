use chrono::Utc;
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tabled::{builder::Builder, settings::Style, Table, Tabled};

use invoice_builder::config::{
    config_dir, load_config, open_store, resolve_output_dir, Config, CONFIG_TEMPLATE,
};
use invoice_builder::document::{
    InvoiceDocument, LineItem, OptionalField, ScalarField, CURRENT_INVOICE_KEY, STANDARD_TERMS,
};
use invoice_builder::error::{InvoiceError, Result};
use invoice_builder::export::{default_filename, export_invoice};
use invoice_builder::logger::StderrLogger;
use invoice_builder::logo::data_url_from_file;
use invoice_builder::storage::{FileStore, KeyValueStore};
use invoice_builder::totals::{coerce_number, format_money, line_totals};

#[derive(Parser)]
#[command(name = "invoice-builder")]
#[command(version, about = "Build invoices and export them as paginated PDFs", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config or ~/.invoice-builder)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config.toml
    Init,

    /// Show the current invoice with line items and totals
    Show,

    /// Show only the invoice totals
    Totals,

    /// Set a field on the current invoice
    Set {
        /// Field to set
        #[arg(value_enum)]
        field: ScalarField,

        /// New value (dates as YYYY-MM-DD; empty clears)
        value: String,
    },

    /// Fill the terms with the standard payment terms
    Terms,

    /// Manage line items
    #[command(subcommand)]
    Item(ItemCommand),

    /// List optional fields and whether they are shown
    Fields,

    /// Show or hide an optional field (hiding resets its values)
    Toggle {
        #[arg(value_enum)]
        field: OptionalField,
    },

    /// Set the logo from an image file
    Logo {
        /// Image file (png, jpg, gif, svg, webp)
        #[arg(required_unless_present = "clear")]
        file: Option<PathBuf>,

        /// Remove the current logo
        #[arg(long, conflicts_with = "file")]
        clear: bool,
    },

    /// Export a rendered preview of the invoice as a multi-page PDF
    Export {
        /// Rendered preview image (PNG or JPEG)
        #[arg(short, long)]
        bitmap: PathBuf,

        /// Output PDF path (default: output_dir/invoice-<timestamp>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Reset the invoice, keeping field visibility and theme
    Clear {
        /// Also forget field visibility and theme
        #[arg(long)]
        all: bool,
    },
}

#[derive(Subcommand)]
enum ItemCommand {
    /// Add a line item
    Add {
        #[arg(short, long, default_value = "")]
        description: String,

        #[arg(short, long, allow_hyphen_values = true)]
        quantity: Option<String>,

        /// Unit price (empty leaves it unset)
        #[arg(short, long, allow_hyphen_values = true)]
        price: Option<String>,

        /// Item discount in percent
        #[arg(long, allow_hyphen_values = true)]
        discount: Option<String>,
    },

    /// Edit a line item
    Set {
        /// 1-based index from 'item list'
        index: usize,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long, allow_hyphen_values = true)]
        quantity: Option<String>,

        #[arg(short, long, allow_hyphen_values = true)]
        price: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        discount: Option<String>,
    },

    /// Remove a line item (the last one is always kept)
    Remove {
        /// 1-based index from 'item list'
        index: usize,
    },

    /// List line items
    List,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = StderrLogger::from_verbosity(cli.verbose).init() {
        eprintln!("Warning: could not initialize logging: {e}");
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    let open = || Session::open(&cfg_dir);

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Show => cmd_show(&open()?.doc),
        Commands::Totals => {
            print_totals(&open()?.doc);
            Ok(())
        }
        Commands::Set { field, value } => {
            let mut session = open()?;
            session.doc.set_field(field, &value)?;
            session.save()?;
            println!("Updated {}", field_name(&field));
            Ok(())
        }
        Commands::Terms => {
            let mut session = open()?;
            session.doc.set_field(ScalarField::Terms, STANDARD_TERMS)?;
            session.save()?;
            println!("Applied standard payment terms");
            Ok(())
        }
        Commands::Item(command) => cmd_item(&mut open()?, command),
        Commands::Fields => cmd_fields(&open()?.doc),
        Commands::Toggle { field } => {
            let mut session = open()?;
            let enabled = session.doc.toggle(field);
            session.save()?;
            let state = if enabled { "shown" } else { "hidden (value reset)" };
            println!("{} is now {}", field.label(), state);
            Ok(())
        }
        Commands::Logo { file, clear } => cmd_logo(&mut open()?, file.as_deref(), clear),
        Commands::Export { bitmap, output } => cmd_export(&open()?, &bitmap, output),
        Commands::Clear { all } => cmd_clear(&mut open()?, all),
    }
}

/// Config, store and the loaded invoice for one command
struct Session {
    cfg_dir: PathBuf,
    config: Config,
    store: FileStore,
    doc: InvoiceDocument,
}

impl Session {
    fn open(cfg_dir: &Path) -> Result<Self> {
        if !cfg_dir.exists() {
            return Err(InvoiceError::ConfigNotFound(cfg_dir.to_path_buf()));
        }
        let config = load_config(cfg_dir)?;
        let store = open_store(cfg_dir);
        let doc = InvoiceDocument::load(&store, config.defaults.new_document());

        Ok(Self {
            cfg_dir: cfg_dir.to_path_buf(),
            config,
            store,
            doc,
        })
    }

    fn save(&self) -> Result<()> {
        self.doc.save(&self.store)
    }
}

fn field_name<T: clap::ValueEnum>(value: &T) -> String {
    value
        .to_possible_value()
        .map(|v| v.get_name().to_string())
        .unwrap_or_default()
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(InvoiceError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("output"))?;
    fs::create_dir_all(cfg_dir.join("storage"))?;
    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;

    println!("Initialized invoice-builder config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!("  1. Fill in your details:   invoice-builder set company-name \"Acme Ltd\"");
    println!("  2. Add line items:         invoice-builder item add -d Consulting -q 8 -p 150");
    println!("  3. Review the invoice:     invoice-builder show");
    println!();
    println!("Then export a rendered preview:");
    println!("  invoice-builder export --bitmap preview.png");

    Ok(())
}

fn format_date(date: Option<chrono::DateTime<Utc>>) -> String {
    date.map(|d| d.format("%B %d, %Y").to_string())
        .unwrap_or_default()
}

fn items_table(doc: &InvoiceDocument) -> Table {
    let discount_enabled = doc.is_enabled(OptionalField::Discount);
    let symbol = doc.currency.symbol();

    let mut builder = Builder::default();
    let mut header = vec!["#", "DESCRIPTION", "QTY", "PRICE"];
    if discount_enabled {
        header.push("DISC %");
    }
    header.push("TOTAL");
    builder.push_record(header);

    for (i, item) in doc.items.iter().enumerate() {
        let amounts = line_totals(item, discount_enabled);
        let description = if item.description.is_empty() {
            "[Item Description]".to_string()
        } else {
            item.description.clone()
        };

        let mut row = vec![
            (i + 1).to_string(),
            description,
            item.quantity.to_string(),
            format_money(item.price.unwrap_or(0.0), symbol),
        ];
        if discount_enabled {
            row.push(format!("{:.2}", item.discount));
        }
        row.push(format_money(amounts.net, symbol));
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table
}

fn print_totals(doc: &InvoiceDocument) {
    let totals = doc.totals();
    let symbol = doc.currency.symbol();

    println!("{:<24}{:>16}", "SUB TOTAL:", format_money(totals.subtotal, symbol));
    if doc.is_enabled(OptionalField::Tax) {
        println!(
            "{:<24}{:>16}",
            format!("TAX (GST {}%):", doc.tax_rate),
            format_money(totals.tax, symbol)
        );
    }
    if doc.is_enabled(OptionalField::Discount) && totals.total_discount > 0.0 {
        println!(
            "{:<24}{:>16}",
            "DISCOUNT:",
            format!("-{}", format_money(totals.total_discount, symbol))
        );
    }
    println!("{}", "-".repeat(40));
    println!(
        "{:<24}{:>16}",
        format!("BALANCE DUE ({}):", doc.currency),
        format_money(totals.grand_total, symbol)
    );
}

fn print_line(label: &str, value: &str) {
    if !value.is_empty() {
        println!("{label:<10}{value}");
    }
}

/// Show the invoice the way the preview lays it out
fn cmd_show(doc: &InvoiceDocument) -> Result<()> {
    let title = if doc.invoice_title.is_empty() {
        "INVOICE"
    } else {
        doc.invoice_title.as_str()
    };
    println!("{title}");
    println!("{}", "-".repeat(50));

    print_line("Number:", &doc.invoice_number);
    print_line("Date:", &format_date(doc.date));
    print_line("Due:", &format_date(doc.due_date));
    print_line("From:", &doc.company_name);
    print_line("", &doc.company_address);
    let contact: Vec<&str> = [&doc.company_website, &doc.company_email, &doc.company_phone]
        .into_iter()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .collect();
    print_line("", &contact.join(" | "));
    print_line("Bill to:", &doc.client_name);
    print_line("", &doc.client_address);
    if !doc.logo.is_empty() {
        println!("{:<10}{} bytes (data URL)", "Logo:", doc.logo.len());
    }

    println!();
    println!("{}", items_table(doc));
    println!();
    print_totals(doc);

    if doc.is_enabled(OptionalField::Payment) && !doc.payment_method.is_empty() {
        println!();
        println!("Payment: {}", doc.payment_method);
        print_line("Bank:", &doc.bank_name);
        print_line("Account:", &doc.account_name);
        print_line("Number:", &doc.account_number);
        print_line("Routing:", &doc.routing_number);
    }
    if !doc.notes.is_empty() {
        println!();
        println!("Notes: {}", doc.notes);
    }
    if !doc.terms.is_empty() {
        println!();
        println!("Terms: {}", doc.terms);
    }

    Ok(())
}

fn parse_price(value: &str) -> Option<f64> {
    if value.trim().is_empty() {
        None
    } else {
        Some(coerce_number(value))
    }
}

fn item_index(doc: &InvoiceDocument, index: usize) -> Result<usize> {
    index
        .checked_sub(1)
        .filter(|i| *i < doc.items.len())
        .ok_or(InvoiceError::InvalidItemIndex {
            index,
            count: doc.items.len(),
        })
}

fn require_discount(doc: &InvoiceDocument, discount: &Option<String>) -> Result<()> {
    if discount.is_some() && !doc.is_enabled(OptionalField::Discount) {
        return Err(InvoiceError::FieldDisabled(
            OptionalField::Discount.cli_name(),
        ));
    }
    Ok(())
}

fn cmd_item(session: &mut Session, command: ItemCommand) -> Result<()> {
    match command {
        ItemCommand::Add {
            description,
            quantity,
            price,
            discount,
        } => {
            require_discount(&session.doc, &discount)?;
            let defaults = LineItem::default();
            session.doc.add_item(LineItem {
                description,
                quantity: quantity.as_deref().map_or(defaults.quantity, coerce_number),
                price: price.as_deref().and_then(parse_price),
                discount: discount.as_deref().map_or(defaults.discount, coerce_number),
            });
            session.save()?;
            println!("Added item {}", session.doc.items.len());
        }
        ItemCommand::Set {
            index,
            description,
            quantity,
            price,
            discount,
        } => {
            require_discount(&session.doc, &discount)?;
            let idx = item_index(&session.doc, index)?;
            let item = session.doc.item_mut(idx)?;
            if let Some(description) = description {
                item.description = description;
            }
            if let Some(quantity) = quantity {
                item.quantity = coerce_number(&quantity);
            }
            if let Some(price) = price {
                item.price = parse_price(&price);
            }
            if let Some(discount) = discount {
                item.discount = coerce_number(&discount);
            }
            session.save()?;
            println!("Updated item {index}");
        }
        ItemCommand::Remove { index } => {
            let idx = item_index(&session.doc, index)?;
            if session.doc.remove_item(idx)? {
                session.save()?;
                println!("Removed item {index}");
            } else {
                println!("An invoice needs at least one item; nothing removed.");
            }
        }
        ItemCommand::List => {
            println!("{}", items_table(&session.doc));
        }
    }
    Ok(())
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "FIELD")]
    field: String,
    #[tabled(rename = "LABEL")]
    label: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

fn cmd_fields(doc: &InvoiceDocument) -> Result<()> {
    let rows: Vec<FieldRow> = doc
        .active_fields
        .iter()
        .map(|(field, enabled)| FieldRow {
            field: field.cli_name(),
            label: field.label().to_string(),
            status: if enabled { "shown" } else { "hidden" }.to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    Ok(())
}

fn cmd_logo(session: &mut Session, file: Option<&Path>, clear: bool) -> Result<()> {
    if !session.doc.is_enabled(OptionalField::Logo) {
        return Err(InvoiceError::FieldDisabled(OptionalField::Logo.cli_name()));
    }

    match file {
        Some(path) if !clear => {
            session.doc.logo = data_url_from_file(path)?;
            println!("Logo set from {}", path.display());
        }
        _ => {
            session.doc.logo.clear();
            println!("Logo removed");
        }
    }
    session.save()
}

fn cmd_export(session: &Session, bitmap: &Path, output: Option<PathBuf>) -> Result<()> {
    let output_path = match output {
        Some(path) => path,
        None => resolve_output_dir(&session.config.export.output_dir, &session.cfg_dir)
            .join(default_filename(Utc::now())),
    };

    let summary = export_invoice(&session.doc, bitmap, &session.config.page, &output_path)
        .inspect_err(|e| log::error!("PDF generation error: {e}"))?;

    println!("Exported {} page(s)", summary.pages);
    println!(
        "  Total: {}",
        format_money(session.doc.totals().grand_total, session.doc.currency.symbol())
    );
    println!("  Saved: {}", summary.path.display());
    Ok(())
}

fn cmd_clear(session: &mut Session, all: bool) -> Result<()> {
    if all {
        session.store.remove(CURRENT_INVOICE_KEY)?;
        println!("Cleared invoice and field settings");
        return Ok(());
    }

    let mut fresh = session.config.defaults.new_document();
    fresh.active_fields = session.doc.active_fields.clone();
    fresh.pdf_theme = session.doc.pdf_theme;
    fresh.reset_hidden_fields();
    session.doc = fresh;
    session.save()?;
    println!("Cleared invoice");
    Ok(())
}
