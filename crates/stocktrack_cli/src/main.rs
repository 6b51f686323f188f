//! StockTrack inventory CLI.
//!
//! Provides the `stocktrack` binary for inspecting and editing the same
//! inventory database the mobile app uses. Every subcommand goes through
//! `ItemStore`, so validation and id assignment match the app exactly.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use stocktrack_core::{
    core_version, init_logging_from_config, ping, resolve_type, CoreConfig, ItemAddress,
    ItemColumn, ItemFilter, ItemId, ItemListRow, ItemQuery, ItemSort, ItemStore, ItemValues,
};

/// Store inventory tracker.
#[derive(Parser)]
#[command(name = "stocktrack", about = "Store inventory tracker")]
struct Cli {
    /// Inventory database file (default: $STOCKTRACK_DB_PATH or a temp-dir file).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List items in the inventory.
    List {
        /// Print items as JSON.
        #[arg(long)]
        json: bool,

        /// Only items whose quantity is at most this value.
        #[arg(long)]
        low_stock: Option<i64>,

        /// Sort column (default: id).
        #[arg(long, value_enum)]
        sort: Option<SortKey>,
    },

    /// Show one item.
    Show { id: i64 },

    /// Add an item. Omitted price and quantity default to 0.
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        price: Option<i64>,

        #[arg(long)]
        quantity: Option<i64>,
    },

    /// Change only the given fields of an item.
    Edit {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        price: Option<i64>,

        #[arg(long)]
        quantity: Option<i64>,
    },

    /// Delete one item.
    Delete { id: i64 },

    /// Delete every item.
    DeleteAll,

    /// Print the content type of an address.
    Type { address: String },

    /// Print core linkage and version.
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortKey {
    Name,
    Price,
    Quantity,
}

impl From<SortKey> for ItemColumn {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Name => ItemColumn::Name,
            SortKey::Price => ItemColumn::Price,
            SortKey::Quantity => ItemColumn::Quantity,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match CoreConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };
    let config = match cli.db {
        Some(path) => config.with_db_path(path),
        None => config,
    };
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("warning: logging disabled: {err}");
    }

    if let Err(err) = run(cli.command, &config) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(command: Commands, config: &CoreConfig) -> Result<(), String> {
    match command {
        Commands::Version => {
            println!("stocktrack_core ping={}", ping());
            println!("stocktrack_core version={}", core_version());
        }
        Commands::Type { address } => {
            let kind = resolve_type(&address).map_err(|err| err.to_string())?;
            println!("{kind}");
        }
        Commands::List {
            json,
            low_stock,
            sort,
        } => {
            let query = ItemQuery {
                filter: low_stock.map(ItemFilter::low_stock).unwrap_or_default(),
                sort: sort.map(|key| ItemSort::ascending(key.into())),
            };
            let items = open_store(config)?
                .query_with(&ItemAddress::Collection, &query)
                .map_err(|err| err.to_string())?;

            if json {
                let rendered =
                    serde_json::to_string_pretty(&items).map_err(|err| err.to_string())?;
                println!("{rendered}");
            } else if items.is_empty() {
                println!("No items in stock.");
            } else {
                for item in &items {
                    print_row(item.id, &ItemListRow::from(item));
                }
            }
        }
        Commands::Show { id } => {
            let address = ItemAddress::Item(ItemId(id));
            let items = open_store(config)?
                .query(&address)
                .map_err(|err| err.to_string())?;
            let item = items
                .first()
                .ok_or_else(|| format!("no item with id {id}"))?;
            println!("{address}");
            println!("name:        {}", item.name);
            println!("description: {}", item.description);
            println!("price:       {}", item.price);
            println!("quantity:    {}", item.quantity);
        }
        Commands::Add {
            name,
            description,
            price,
            quantity,
        } => {
            let values = ItemValues {
                name: Some(name),
                description,
                price,
                quantity,
            };
            let address = open_store(config)?
                .insert(&values)
                .map_err(|err| format!("Error saving item: {err}"))?;
            println!("Item saved. {address}");
        }
        Commands::Edit {
            id,
            name,
            description,
            price,
            quantity,
        } => {
            let values = ItemValues {
                name,
                description,
                price,
                quantity,
            };
            if values.is_empty() {
                return Err("nothing to change; pass at least one field".to_string());
            }
            let updated = open_store(config)?
                .update(&ItemAddress::Item(ItemId(id)), &values)
                .map_err(|err| format!("Error updating item: {err}"))?;
            if updated == 0 {
                return Err(format!("Error updating item: no item with id {id}"));
            }
            println!("Item updated.");
        }
        Commands::Delete { id } => {
            let deleted = open_store(config)?
                .delete(&ItemAddress::Item(ItemId(id)))
                .map_err(|err| err.to_string())?;
            println!("{}", stocktrack_core::delete_message(deleted));
        }
        Commands::DeleteAll => {
            let deleted = open_store(config)?
                .delete(&ItemAddress::Collection)
                .map_err(|err| err.to_string())?;
            println!("{}", stocktrack_core::delete_all_message(deleted));
        }
    }

    Ok(())
}

fn open_store(config: &CoreConfig) -> Result<ItemStore, String> {
    let store = ItemStore::from_config(config).map_err(|err| err.to_string())?;
    info!("event=cli_store_open module=cli status=ok");
    Ok(store)
}

fn print_row(id: ItemId, row: &ItemListRow) {
    println!(
        "{id:>5}  {:<24} {:>10}  {:<16} {}",
        row.name, row.price_label, row.stock_label, row.description
    );
}
