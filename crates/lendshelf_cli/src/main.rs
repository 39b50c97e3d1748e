//! `lendshelf` command-line entry point.
//!
//! # Responsibility
//! - Expose the admin add flow and the token-gated lending operations.
//! - Map core errors to stable exit codes.

mod config;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use config::{AppConfig, FileConfig, Overrides};
use lendshelf_core::db::open_db;
use lendshelf_core::{
    init_logging, CatalogService, GiveBackOutcome, Holder, ItemDetail, ItemSummary,
    LendingError, LendingService, SqliteHolderRepository, SqliteItemRepository,
};
use log::info;
use rusqlite::Connection;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

const EXIT_NOT_FOUND: u8 = 2;
const EXIT_ALREADY_TAKEN: u8 = 3;

#[derive(Parser)]
#[command(name = "lendshelf", version)]
#[command(about = "Track who has borrowed which things")]
struct Cli {
    /// Config file (defaults to ./lendshelf.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database path
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Directory for rotated log files; logging is off when unset
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Clone)]
struct TokenArg {
    /// Holder access token
    #[arg(long)]
    token: String,
}

#[derive(Subcommand)]
enum Command {
    /// Create or migrate the database
    Init,
    /// Register a holder and print their token
    AddHolder { name: String },
    /// List registered holders with their tokens
    Holders,
    /// Add an item, optionally with an image to thumbnail
    AddItem {
        name: String,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// List all items
    List {
        #[command(flatten)]
        auth: TokenArg,
        /// Only items held by the token's holder
        #[arg(long)]
        mine: bool,
    },
    /// Show one item and the actions available to the holder
    Show {
        item_id: Uuid,
        #[command(flatten)]
        auth: TokenArg,
    },
    /// Write an item's thumbnail (PNG) to a file
    Thumbnail {
        item_id: Uuid,
        #[command(flatten)]
        auth: TokenArg,
        #[arg(long)]
        out: PathBuf,
    },
    /// Take an available item
    Take {
        item_id: Uuid,
        #[command(flatten)]
        auth: TokenArg,
    },
    /// Give back an item you hold
    GiveBack {
        item_id: Uuid,
        #[command(flatten)]
        auth: TokenArg,
    },
}

#[derive(Serialize)]
struct GiveBackReport {
    item_id: Uuid,
    outcome: GiveBackOutcome,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            match err.downcast_ref::<LendingError>() {
                Some(LendingError::NotFound) => ExitCode::from(EXIT_NOT_FOUND),
                Some(LendingError::AlreadyTaken) => ExitCode::from(EXIT_ALREADY_TAKEN),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let file = FileConfig::load(cli.config.as_deref())?;
    let config = AppConfig::resolve(
        file,
        Overrides {
            database_path: cli.db,
            log_level: cli.log_level,
            log_dir: cli.log_dir,
        },
    )?;

    if let Some(settings) = &config.logging {
        init_logging(settings).context("failed to initialize logging")?;
    }

    let conn = open_db(&config.database_path).with_context(|| {
        format!(
            "failed to open database `{}`",
            config.database_path.display()
        )
    })?;
    let out = Output { json: cli.json };

    match cli.command {
        Command::Init => {
            info!(
                "event=cli_init module=cli status=ok db={}",
                config.database_path.display()
            );
            out.line(&format!(
                "database ready at {}",
                config.database_path.display()
            ));
        }
        Command::AddHolder { name } => {
            let holder = catalog(&conn, &config)?.add_holder(&name)?;
            out.holder(&holder)?;
        }
        Command::Holders => {
            for holder in catalog(&conn, &config)?.list_holders()? {
                out.holder(&holder)?;
            }
        }
        Command::AddItem { name, image } => {
            let bytes = image
                .as_ref()
                .map(|path| {
                    std::fs::read(path)
                        .with_context(|| format!("failed to read image `{}`", path.display()))
                })
                .transpose()?;
            let item = catalog(&conn, &config)?.add_item(&name, bytes.as_deref())?;
            if out.json {
                out.print_json(&item)?;
            } else {
                out.line(&format!("{}  {}", item.uuid, item.name));
            }
        }
        Command::List { auth, mine } => {
            let service = lending(&conn)?;
            let items = if mine {
                service.my_items(&auth.token)?
            } else {
                service.list_items(&auth.token)?
            };
            out.items(&items)?;
        }
        Command::Show { item_id, auth } => {
            let detail = lending(&conn)?.item_detail(item_id, &auth.token)?;
            out.detail(&detail)?;
        }
        Command::Thumbnail { item_id, auth, out: path } => {
            let bytes = lending(&conn)?.thumbnail(item_id, &auth.token)?;
            std::fs::write(&path, bytes)
                .with_context(|| format!("failed to write `{}`", path.display()))?;
            out.line(&format!("thumbnail written to {}", path.display()));
        }
        Command::Take { item_id, auth } => {
            let service = lending(&conn)?;
            service.take(item_id, &auth.token)?;
            out.detail(&service.item_detail(item_id, &auth.token)?)?;
        }
        Command::GiveBack { item_id, auth } => {
            let outcome = lending(&conn)?.give_back(item_id, &auth.token)?;
            if out.json {
                out.print_json(&GiveBackReport { item_id, outcome })?;
            } else {
                match outcome {
                    GiveBackOutcome::Returned => out.line(&format!("{item_id} given back")),
                    GiveBackOutcome::Ignored => {
                        out.line(&format!("{item_id} is not held by you; nothing changed"))
                    }
                }
            }
        }
    }

    Ok(())
}

fn lending(
    conn: &Connection,
) -> Result<LendingService<SqliteItemRepository<'_>, SqliteHolderRepository<'_>>> {
    Ok(LendingService::new(
        SqliteItemRepository::try_new(conn)?,
        SqliteHolderRepository::try_new(conn)?,
    ))
}

fn catalog<'conn>(
    conn: &'conn Connection,
    config: &AppConfig,
) -> Result<CatalogService<SqliteItemRepository<'conn>, SqliteHolderRepository<'conn>>> {
    Ok(CatalogService::new(
        SqliteItemRepository::try_new(conn)?,
        SqliteHolderRepository::try_new(conn)?,
        config.thumbnail,
    ))
}

struct Output {
    json: bool,
}

impl Output {
    fn line(&self, text: &str) {
        if !self.json {
            println!("{text}");
        }
    }

    fn print_json<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    fn holder(&self, holder: &Holder) -> Result<()> {
        if self.json {
            return self.print_json(holder);
        }
        println!(
            "{}  {}  token={}",
            holder.uuid,
            holder.name,
            holder.token.as_str()
        );
        Ok(())
    }

    fn items(&self, items: &[ItemSummary]) -> Result<()> {
        if self.json {
            return self.print_json(&items);
        }
        for item in items {
            println!("{}  {}", item.item_id, describe(item));
        }
        Ok(())
    }

    fn detail(&self, detail: &ItemDetail) -> Result<()> {
        if self.json {
            return self.print_json(detail);
        }
        println!("{}  {}", detail.summary.item_id, describe(&detail.summary));
        if detail.can_take {
            println!("  you can take it");
        }
        if detail.can_give_back {
            println!("  you can give it back");
        }
        Ok(())
    }
}

fn describe(item: &ItemSummary) -> String {
    match &item.taken_by {
        Some(holder) => format!("{} (taken by {holder})", item.name),
        None => format!("{} (available)", item.name),
    }
}
