use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use log::info;
use std::fs;
use std::path::PathBuf;

use priorit::codec::RecordCodec;
use priorit::config::Config;
use priorit::domain::{Item, Priority, today};
use priorit::store::ItemStore;

mod cli;

use cli::Cli;
use cli::commands::Commands;

type Store = ItemStore<Box<dyn RecordCodec>>;

fn setup_logging(config: &Config, verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("priorit")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("priorit.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let mut builder = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        match (&config.log_level, verbose) {
            (_, true) => {
                builder.parse_filters("debug");
            }
            (Some(level), false) => {
                builder.parse_filters(level);
            }
            (None, false) => {
                builder.parse_filters("info");
            }
        }
    }
    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    let store = config.open_store(cli.dir.as_deref())?;

    if cli.is_verbose() {
        println!("{} {}", "Using items in".yellow(), store.directory().display());
    }

    match &cli.command {
        Commands::Add {
            title,
            text,
            categories,
            priority,
            due,
            id,
        } => handle_add_command(&store, config, title, text.as_deref(), categories, *priority, *due, id.as_deref()),
        Commands::List { all } => handle_list_command(&store, *all),
        Commands::Next => handle_next_command(&store),
        Commands::Search { pattern, substring } => handle_search_command(&store, pattern, *substring),
        Commands::Edit {
            id,
            title,
            text,
            categories,
            priority,
            due,
        } => handle_edit_command(&store, id, title.as_deref(), text.as_deref(), categories, *priority, *due),
        Commands::Done { id } => handle_done_command(&store, id, true),
        Commands::Undone { id } => handle_done_command(&store, id, false),
        Commands::Categories => handle_categories_command(&store),
    }
}

/// Local midnight of `date`, as stored due date
fn due_from_date(date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&naive).earliest() {
        Some(local) => local.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&naive),
    }
}

fn format_item(rank: Option<usize>, item: &Item) -> String {
    let days = item.days_until_at(today());
    let due = item.due_date().with_timezone(&Local).format("%Y-%m-%d");
    let when = match days {
        d if d < 0 => format!("{} ({}d overdue)", due, -d).red().to_string(),
        0 => format!("{} (today)", due).yellow().to_string(),
        d => format!("{} (in {}d)", due, d),
    };
    let priority = match item.priority() {
        Priority::VeryHigh | Priority::High => item.priority().to_string().red().bold(),
        Priority::Med => item.priority().to_string().yellow(),
        Priority::Low | Priority::VeryLow => item.priority().to_string().normal(),
    };
    let rank = rank.map(|r| format!("{:>3}. ", r)).unwrap_or_default();
    let line = format!(
        "{}[{}] {} {} {} {}",
        rank,
        priority,
        item.title().bold(),
        when,
        format!("#{}", item.category_names().join(" #")).cyan(),
        item.id().dimmed()
    );
    if item.is_done() {
        format!("{} {}", line.dimmed(), "done".green())
    } else {
        line
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_add_command(
    store: &Store,
    config: &Config,
    title: &str,
    text: Option<&str>,
    categories: &[String],
    priority: Option<Priority>,
    due: Option<NaiveDate>,
    id: Option<&str>,
) -> Result<()> {
    info!("Adding item: {}", title);
    let mut item = config.defaults.new_item().with_title(title);
    if let Some(id) = id {
        item = item.with_id(id);
    }
    if let Some(text) = text {
        item.set_text(text);
    }
    if !categories.is_empty() {
        item.set_categories(categories.iter().map(String::as_str));
    }
    if let Some(priority) = priority {
        item.set_priority(priority);
    }
    if let Some(due) = due {
        item.set_due_date(due_from_date(due));
    }

    store.add_item(&item, false).context("Failed to add item")?;
    println!("{} {}", "Added:".green(), format_item(None, &item));
    Ok(())
}

fn handle_list_command(store: &Store, all: bool) -> Result<()> {
    info!("Listing items (all: {})", all);
    let items: Vec<Item> = store
        .all_items()?
        .into_iter()
        .filter(|item| all || !item.is_done())
        .collect();

    if items.is_empty() {
        println!("{}", "Nothing on the list".cyan());
    }
    for (rank, item) in items.iter().enumerate() {
        println!("{}", format_item(Some(rank + 1), item));
    }
    Ok(())
}

fn handle_next_command(store: &Store) -> Result<()> {
    info!("Getting next item");
    match store.next_item()? {
        Some(item) if !item.is_done() => {
            println!("{}", format_item(None, &item));
            if !item.text().is_empty() {
                println!("{}", item.text());
            }
        }
        _ => println!("{}", "Nothing left to do".green()),
    }
    Ok(())
}

fn handle_search_command(store: &Store, pattern: &str, substring: bool) -> Result<()> {
    info!("Searching items for: {} (substring: {})", pattern, substring);
    let pattern = if substring {
        format!(".*{}.*", pattern)
    } else {
        pattern.to_string()
    };

    let found = store.search_item(&pattern)?;
    if found.is_empty() {
        println!("{} {}", "No items match".yellow(), pattern);
    }
    for item in &found {
        println!("{}", format_item(None, item));
    }
    Ok(())
}

fn find_item(store: &Store, id: &str) -> Result<Item> {
    store.get_item(id)?.ok_or_else(|| eyre!("Item not found: {}", id))
}

fn handle_edit_command(
    store: &Store,
    id: &str,
    title: Option<&str>,
    text: Option<&str>,
    categories: &[String],
    priority: Option<Priority>,
    due: Option<NaiveDate>,
) -> Result<()> {
    info!("Editing item: {}", id);
    let mut item = find_item(store, id)?;
    if let Some(title) = title {
        item.set_title(title);
    }
    if let Some(text) = text {
        item.set_text(text);
    }
    if !categories.is_empty() {
        item.set_categories(categories.iter().map(String::as_str));
    }
    if let Some(priority) = priority {
        item.set_priority(priority);
    }
    if let Some(due) = due {
        item.set_due_date(due_from_date(due));
    }

    store.update_item(&item).context("Failed to update item")?;
    println!("{} {}", "Updated:".green(), format_item(None, &item));
    Ok(())
}

fn handle_done_command(store: &Store, id: &str, done: bool) -> Result<()> {
    info!("Marking item {} done={}", id, done);
    let item = find_item(store, id)?.with_done(done);
    store.update_item(&item).context("Failed to update item")?;
    let label = if done { "Done:".green() } else { "Reopened:".yellow() };
    println!("{} {}", label, format_item(None, &item));
    Ok(())
}

fn handle_categories_command(store: &Store) -> Result<()> {
    info!("Listing categories");
    let mut categories = store.all_categories()?;
    categories.sort_by_key(|c| c.to_lowercase());
    for category in categories {
        println!("#{}", category.cyan());
    }
    Ok(())
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging
    setup_logging(&config, cli.is_verbose()).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}
