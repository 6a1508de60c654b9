use std::fs::File;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use quote_core::{
    Collaborators, CustomerInfo, Quote, QuoteConfig, QuoteItem, QuoteSession, QuoteTotals,
    SaveStatus, VatMode,
};
use quote_data::{CatalogLoader, InMemoryCatalog, MemoryQuoteStore, OutboxDelivery};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Price a kitchen quote from catalog CSV files and print the breakdown as JSON.
///
/// Products CSV columns: product_id,name,sku,base_price,price_unit,category
/// House types CSV columns: house_type_id,name,allowance_amount
#[derive(Parser, Debug)]
#[command(name = "quote-cli")]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML config file with `[pricing]` and `[autosave]` tables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Products CSV file
    #[arg(short, long)]
    products: Option<PathBuf>,

    /// House types CSV file
    #[arg(long)]
    house_types: Option<PathBuf>,

    /// House type to seed the allowance from
    #[arg(long)]
    house_type: Option<String>,

    /// Line item as SKU_OR_ID:QTY, or SKU_OR_ID:QTY:allowance to mark it as in allowance
    #[arg(short, long = "item")]
    items: Vec<ItemArg>,

    /// Additional cost as DESC:AMOUNT, or DESC:AMOUNT:exempt for a VAT-exempt cost
    #[arg(long = "cost")]
    costs: Vec<CostArg>,

    /// Bespoke uplift units
    #[arg(long, default_value_t = 0)]
    uplift: u32,

    /// Add VAT on top at this percentage instead of treating prices as VAT-inclusive
    #[arg(long)]
    vat_rate: Option<Decimal>,

    /// Customer email, required to send
    #[arg(long)]
    email: Option<String>,

    /// Finalize the quote and deliver it to the customer
    #[arg(long, default_value_t = false)]
    send: bool,
}

#[derive(Debug, Clone)]
struct ItemArg {
    key: String,
    quantity: Decimal,
    in_allowance: bool,
}

impl FromStr for ItemArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let key = parts.next().filter(|k| !k.is_empty());
        let quantity = parts.next();
        let flag = parts.next();

        let (Some(key), Some(quantity)) = (key, quantity) else {
            return Err(format!("expected SKU_OR_ID:QTY[:allowance], got '{s}'"));
        };
        let quantity = quantity
            .parse::<Decimal>()
            .map_err(|e| format!("invalid quantity '{quantity}': {e}"))?;
        let in_allowance = match flag {
            None => false,
            Some("allowance") => true,
            Some(other) => return Err(format!("unknown item flag '{other}'")),
        };
        if parts.next().is_some() {
            return Err(format!("too many fields in '{s}'"));
        }

        Ok(Self {
            key: key.to_string(),
            quantity,
            in_allowance,
        })
    }
}

#[derive(Debug, Clone)]
struct CostArg {
    description: String,
    amount: Decimal,
    taxable: bool,
}

impl FromStr for CostArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rest, taxable) = match s.strip_suffix(":exempt") {
            Some(rest) => (rest, false),
            None => (s, true),
        };
        let Some((description, amount)) = rest.rsplit_once(':') else {
            return Err(format!("expected DESC:AMOUNT[:exempt], got '{s}'"));
        };
        let amount = amount
            .parse::<Decimal>()
            .map_err(|e| format!("invalid amount '{amount}': {e}"))?;

        Ok(Self {
            description: description.to_string(),
            amount,
            taxable,
        })
    }
}

#[derive(Debug, Serialize)]
struct Output<'a> {
    quote_id: Option<String>,
    status: &'a str,
    save_status: SaveStatus,
    house_type: Option<&'a str>,
    items: &'a [QuoteItem],
    totals: &'a QuoteTotals,
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Logs go to stderr so stdout carries only the JSON breakdown.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => QuoteConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => QuoteConfig::default(),
    };
    if let Some(rate_percent) = args.vat_rate {
        config.pricing.vat_mode = VatMode::Exclusive { rate_percent };
    }

    let products = match &args.products {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open: {}", path.display()))?;
            CatalogLoader::parse_products(file)
                .with_context(|| format!("Failed to parse CSV: {}", path.display()))?
        }
        None => Vec::new(),
    };
    let house_types = match &args.house_types {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open: {}", path.display()))?;
            CatalogLoader::parse_house_types(file)
                .with_context(|| format!("Failed to parse CSV: {}", path.display()))?
        }
        None => Vec::new(),
    };
    debug!(
        products = products.len(),
        house_types = house_types.len(),
        "catalog loaded"
    );

    let catalog = Arc::new(InMemoryCatalog::new(products, house_types));
    let collaborators = Collaborators {
        store: Arc::new(MemoryQuoteStore::new()),
        catalog: catalog.clone(),
        house_types: catalog.clone(),
        delivery: Arc::new(OutboxDelivery::new()),
    };

    let quote = Quote::new(config.pricing.clone()).context("Invalid pricing config")?;
    let mut session = QuoteSession::open(quote, collaborators, &config.autosave);

    if let Some(email) = &args.email {
        session.set_customer(CustomerInfo {
            email: Some(email.clone()),
            ..CustomerInfo::default()
        })?;
    }

    if let Some(house_type) = &args.house_type {
        session
            .select_house_type(Some(house_type.as_str()))
            .await
            .with_context(|| format!("Failed to select house type '{house_type}'"))?;
    }

    for item in &args.items {
        let Some(product) = catalog.resolve_product(&item.key) else {
            bail!("Unknown product or SKU '{}'", item.key);
        };
        session
            .add_product(&product.product_id, item.quantity, item.in_allowance)
            .await
            .with_context(|| format!("Failed to add item '{}'", item.key))?;
    }

    for cost in &args.costs {
        session
            .add_cost(cost.description.clone(), cost.amount, cost.taxable)
            .with_context(|| format!("Failed to add cost '{}'", cost.description))?;
    }

    session.set_bespoke_uplift(args.uplift)?;

    let save_status = session.save_now().await;
    if let SaveStatus::Error(reason) = &save_status {
        bail!("Failed to save quote: {reason}");
    }

    if args.send {
        session.finalize().await.context("Failed to finalize quote")?;
        session.send().await.context("Failed to send quote")?;
        info!("quote sent");
    }

    let quote = session.quote();
    let output = Output {
        quote_id: session.quote_id().map(|id| id.to_string()),
        status: quote.status().as_str(),
        save_status,
        house_type: quote.house_type().map(|h| h.name.as_str()),
        items: quote.items(),
        totals: quote.totals(),
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to render quote")?
    );

    Ok(())
}
