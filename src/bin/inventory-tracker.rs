use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Arg, ArgMatches, Command};
use inventory_tracker::item::{format_price, image_data_uri, manual_setup_instructions};
use inventory_tracker::low_stock::QuantityBadge;
use inventory_tracker::prelude::*;
use log::debug;

const DEFAULT_CREDENTIALS_FILE: &str = ".inventory-tracker.json";

struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    // Output is printed once the command's actions have all run
    fn render(&mut self, snapshot: &Snapshot) {
        debug!(
            "frame at revision {}: {} shown, {} low",
            snapshot.revision,
            snapshot.filtered.len(),
            snapshot.low_stock.len()
        );
    }

    fn notify(&mut self, notice: &Notice) {
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        eprintln!("[{}] {}", tag, notice.message);
    }
}

fn print_snapshot(snapshot: &Snapshot) {
    if snapshot.no_matches() {
        println!("No items found matching your criteria.");
    }

    match snapshot.mode {
        ViewMode::Table => {
            println!(
                "{:>14}  {:<22} {:<12} {:<12} {:>5} {:>10}  {:<10}",
                "ID", "Name", "Category", "Location", "Qty", "Price", "Purchased"
            );
            for item in &snapshot.filtered {
                println!(
                    "{:>14}  {:<22} {:<12} {:<12} {:>5}{} {:>10}  {:<10}",
                    item.id,
                    item.name,
                    item.category,
                    item.location,
                    item.quantity,
                    badge_marker(snapshot, item),
                    item.display_price(),
                    item.purchase_date,
                );
            }
        }
        ViewMode::Grid => {
            for item in &snapshot.filtered {
                println!("#{} {}", item.id, item.name);
                println!(
                    "    Qty: {}{}  {}  [{}] [{}]",
                    item.quantity,
                    badge_marker(snapshot, item),
                    format_price(item.price),
                    item.category,
                    item.location
                );
                if !item.description.is_empty() {
                    println!("    {}", item.description);
                }
            }
        }
    }

    if snapshot.show_low_stock() {
        println!();
        println!("Low stock:");
        for item in &snapshot.low_stock {
            println!("  {} (quantity {}, {})", item.name, item.quantity, item.location);
        }
    }
}

fn print_low_stock(snapshot: &Snapshot) {
    if !snapshot.show_low_stock() {
        println!("Nothing is low on stock.");
        return;
    }
    for item in &snapshot.low_stock {
        println!(
            "{:>14}  {} (quantity {}, threshold {}, {})",
            item.id, item.name, item.quantity, item.low_stock_threshold, item.location
        );
    }
}

fn badge_marker(snapshot: &Snapshot, item: &ItemRecord) -> &'static str {
    match snapshot.badge(item) {
        QuantityBadge::Low => "!",
        QuantityBadge::Normal => " ",
    }
}

fn cli() -> Command<'static> {
    let text = |name: &'static str, help: &'static str| {
        Arg::new(name).long(name).value_name("VALUE").takes_value(true).help(help)
    };

    Command::new("inventory-tracker")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Track household and office inventory backed by a spreadsheet")
        .subcommand_required(true)
        .arg(
            Arg::new("credentials")
                .long("credentials")
                .value_name("FILE")
                .takes_value(true)
                .global(true)
                .help("Where the API key is stored"),
        )
        .arg(
            Arg::new("at-or-below")
                .long("at-or-below")
                .global(true)
                .help("Treat quantity equal to the threshold as low stock"),
        )
        .subcommand(
            Command::new("list")
                .about("Show items")
                .arg(text("search", "Match name, description or category"))
                .arg(text("category", "Exact category"))
                .arg(text("location", "Exact location"))
                .arg(text("date", "Exact purchase date (YYYY-MM-DD)"))
                .arg(text("sort", "Sort column"))
                .arg(Arg::new("desc").long("desc").help("Sort descending"))
                .arg(text("view", "grid or table")),
        )
        .subcommand(Command::new("low-stock").about("Show items at or under their threshold"))
        .subcommand(
            Command::new("add")
                .about("Add an item")
                .arg(text("name", "Item name").required(true))
                .arg(text("category", "Category"))
                .arg(text("location", "Location"))
                .arg(text("quantity", "Quantity"))
                .arg(text("price", "Price"))
                .arg(text("date", "Purchase date (YYYY-MM-DD)"))
                .arg(text("description", "Description"))
                .arg(text("threshold", "Low stock threshold"))
                .arg(text("image-file", "Image to embed")),
        )
        .subcommand(
            Command::new("set-quantity")
                .about("Quick edit an item's quantity")
                .arg(Arg::new("id").required(true))
                .arg(Arg::new("quantity").required(true)),
        )
        .subcommand(
            Command::new("remove")
                .about("Delete an item")
                .arg(Arg::new("id").required(true)),
        )
        .subcommand(
            Command::new("set-key")
                .about("Save the spreadsheet API key")
                .arg(Arg::new("key").required(true)),
        )
        .subcommand(
            Command::new("test-connection")
                .about("Load with a key; keep it only if the load works")
                .arg(Arg::new("key").required(true)),
        )
        .subcommand(Command::new("populate").about("Write the sample data to the spreadsheet"))
        .subcommand(Command::new("instructions").about("Print manual setup instructions"))
}

fn parse_id(matches: &ArgMatches) -> Result<ItemId, Error> {
    let raw = matches.value_of("id").unwrap_or_default();
    raw.trim()
        .parse::<i64>()
        .map(ItemId)
        .map_err(|_| Error::general(format!("invalid item id: {}", raw)))
}

fn owned(matches: &ArgMatches, name: &str) -> String {
    matches.value_of(name).unwrap_or_default().to_string()
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "image/jpeg",
    }
}

fn draft_from(matches: &ArgMatches) -> Result<ItemDraft, Error> {
    let image = match matches.value_of("image-file") {
        Some(file) => {
            let path = Path::new(file);
            let bytes = std::fs::read(path)
                .map_err(|e| Error::general(format!("cannot read {}: {}", file, e)))?;
            Some(image_data_uri(mime_for(path), &bytes))
        }
        None => None,
    };

    Ok(ItemDraft {
        name: owned(matches, "name"),
        category: owned(matches, "category"),
        location: owned(matches, "location"),
        quantity: owned(matches, "quantity"),
        price: owned(matches, "price"),
        purchase_date: owned(matches, "date"),
        description: owned(matches, "description"),
        image,
        low_stock_threshold: matches.value_of("threshold").map(str::to_string),
    })
}

async fn run(matches: ArgMatches) -> Result<bool, Error> {
    let mut options = TrackerOptions::from_env();
    if matches.is_present("at-or-below") {
        options = options.with_low_stock_policy(LowStockPolicy::AtOrBelow);
    }
    options.validate()?;

    let credentials_path = matches
        .value_of("credentials")
        .unwrap_or(DEFAULT_CREDENTIALS_FILE)
        .to_string();

    if let Some(("instructions", _)) = matches.subcommand() {
        println!("{}", manual_setup_instructions(&options.spreadsheet_url()));
        return Ok(true);
    }

    let credentials = Arc::new(FileCredentialStore::new(credentials_path));
    let mut tracker = InventoryTracker::new(options, credentials);
    tracker.set_renderer(Box::new(TerminalRenderer));

    let mut notices = tracker.dispatch(Action::Startup).await;

    match matches.subcommand() {
        Some(("list", sub)) => {
            let mut actions = vec![
                Action::Search(owned(sub, "search")),
                Action::FilterCategory(sub.value_of("category").map(str::to_string)),
                Action::FilterLocation(sub.value_of("location").map(str::to_string)),
                Action::FilterDate(sub.value_of("date").map(str::to_string)),
            ];
            if let Some(view) = sub.value_of("view") {
                actions.push(Action::SetViewMode(view.parse()?));
            }
            if let Some(column) = sub.value_of("sort") {
                let column: SortColumn = column.parse()?;
                actions.push(Action::SortBy(column));
                if sub.is_present("desc") {
                    actions.push(Action::SortBy(column));
                }
            }
            for action in actions {
                notices.extend(tracker.dispatch(action).await);
            }
            print_snapshot(tracker.snapshot());
        }
        Some(("low-stock", _)) => print_low_stock(tracker.snapshot()),
        Some(("add", sub)) => {
            notices.extend(tracker.dispatch(Action::AddItem(draft_from(sub)?)).await);
            print_snapshot(tracker.snapshot());
        }
        Some(("set-quantity", sub)) => {
            let id = parse_id(sub)?;
            let input = owned(sub, "quantity");
            notices.extend(tracker.dispatch(Action::QuickEdit { id, input }).await);
            print_snapshot(tracker.snapshot());
        }
        Some(("remove", sub)) => {
            let id = parse_id(sub)?;
            notices.extend(tracker.dispatch(Action::DeleteItem(id)).await);
            print_snapshot(tracker.snapshot());
        }
        Some(("set-key", sub)) => {
            notices.extend(tracker.dispatch(Action::SaveCredential(owned(sub, "key"))).await);
        }
        Some(("test-connection", sub)) => {
            notices.extend(tracker.dispatch(Action::TestConnection(owned(sub, "key"))).await);
        }
        Some(("populate", _)) => {
            notices.extend(tracker.dispatch(Action::PopulateSampleData).await);
        }
        _ => {}
    }

    let failed = notices
        .iter()
        .any(|n| n.blocking && n.level == NoticeLevel::Error);
    Ok(!failed)
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    match run(cli().get_matches()).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
