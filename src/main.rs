#![forbid(unsafe_code)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands, IdEntryArgs, TraderArgs};
use trader_editor::codec;
use trader_editor::config::EditorSettings;
use trader_editor::constants;
use trader_editor::forms::{IdEntryForm, ProductForm, TraderForm};
use trader_editor::EditorSession;

fn apply_trader_args(form: &mut TraderForm, args: TraderArgs) {
    let TraderArgs {
        id,
        name,
        given_name,
        role,
        position,
        orientation,
    } = args;
    if let Some(id) = id {
        form.id = id;
    }
    if let Some(name) = name {
        form.name = name;
    }
    if let Some(given_name) = given_name {
        form.given_name = given_name;
    }
    if let Some(role) = role {
        form.role = role;
    }
    if let Some(position) = position {
        form.position = position;
    }
    if let Some(orientation) = orientation {
        form.orientation = orientation;
    }
}

fn apply_id_entry_args(form: &mut IdEntryForm, args: IdEntryArgs) {
    if let Some(id) = args.id {
        form.id = id;
    }
    if let Some(categories) = args.categories {
        form.categories = categories.join("\n");
    }
}

fn product_form(raw: &str) -> Result<ProductForm> {
    let record = codec::decode(raw).with_context(|| format!("Invalid product line '{raw}'"))?;
    Ok(ProductForm::from_record(&record))
}

fn run(cli: Cli, settings: &EditorSettings) -> Result<()> {
    let mut session = EditorSession::new();
    session.open(&cli.file)?;
    if let Some(notice) = session.document().and_then(|d| d.notice()) {
        warn!(path = %cli.file.display(), "{notice}");
    }

    match cli.command {
        Commands::Show { query } => {
            for hit in session.search(query.as_deref().unwrap_or_default()) {
                println!("{}\t{}", hit.title(), hit.summary());
            }
        }
        Commands::Products { category, query } => {
            let view = session.products(&category, query.as_deref().unwrap_or_default())?;
            for row in view.rows {
                let marker = if row.is_hit { "*" } else { " " };
                println!("{marker} {}", row.record.fields().join("\t"));
            }
        }
        Commands::AddCategory { name } => {
            session.create_category(&name)?;
            println!("Added category: {}", name.trim());
        }
        Commands::DeleteCategory { name } => {
            let removed = session.delete_category(&name)?;
            println!(
                "Deleted category: {} ({} products)",
                removed.name,
                removed.products.len()
            );
        }
        Commands::AddTrader { fields } => {
            let mut form = session.new_trader_form(&settings.trader_template)?;
            apply_trader_args(&mut form, fields);
            session.create_trader(&form)?;
            println!("Added trader: {}", form.given_name.trim());
        }
        Commands::UpdateTrader { target, fields } => {
            let mut form = session
                .document()
                .and_then(|d| d.traders())
                .and_then(|traders| traders.iter().find(|t| t.given_name == target))
                .map(TraderForm::from_trader)
                .unwrap_or_default();
            apply_trader_args(&mut form, fields);
            session.update_trader(&target, &form)?;
            println!("Updated trader: {}", form.given_name.trim());
        }
        Commands::DeleteTrader { given_name } => {
            let removed = session.delete_trader(&given_name)?;
            println!("Deleted trader: {} (id {})", removed.given_name, removed.id);
        }
        Commands::AddId { fields } => {
            let mut form = session.new_id_entry_form()?;
            apply_id_entry_args(&mut form, fields);
            let index = session.create_id_entry(&form)?;
            let id = session
                .document()
                .and_then(|d| d.id_entries())
                .map(|entries| entries[index].id)
                .unwrap_or_default();
            println!("Added trader id: {id}");
        }
        Commands::UpdateId { target_id, fields } => {
            let mut form = session
                .document()
                .and_then(|d| d.id_entries())
                .and_then(|entries| entries.iter().find(|e| e.id == target_id))
                .map(IdEntryForm::from_entry)
                .unwrap_or_default();
            apply_id_entry_args(&mut form, fields);
            session.update_id_entry(target_id, &form)?;
            println!("Updated trader id: {target_id}");
        }
        Commands::DeleteId { id } => {
            session.delete_id_entry(id)?;
            println!("Deleted trader id: {id}");
        }
        Commands::AddProduct { category, product } => {
            let form = product_form(&product)?;
            session.create_product(&category, &form)?;
            println!("Added product: {}", form.classname.trim());
        }
        Commands::UpdateProduct {
            category,
            classname,
            product,
        } => {
            let form = product_form(&product)?;
            session.update_product(&category, &classname, &form)?;
            println!("Updated product: {classname}");
        }
        Commands::DeleteProduct {
            category,
            classname,
        } => {
            session.delete_product(&category, &classname)?;
            println!("Deleted product: {classname}");
        }
        Commands::Format => {
            session.save()?;
            println!("Saved {}", cli.file.display());
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Settings are read before logging is up so the level can come from the file
    let settings = EditorSettings::load();
    let env_level = std::env::var(constants::config::LOG_LEVEL_ENV).ok();
    let log_level = settings
        .as_ref()
        .map(|s| s.tracing_level(env_level.as_deref()))
        .unwrap_or_else(|_| {
            trader_editor::config::parse_log_level(env_level.as_deref().unwrap_or("info"))
        });

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let settings = settings.unwrap_or_else(|e| {
        error!(error = ?e, "Failed to load settings, using defaults");
        EditorSettings::default()
    });
    info!(file = %cli.file.display(), "Starting trader editor");

    run(cli, &settings)
}
