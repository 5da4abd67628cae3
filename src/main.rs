//! kanban-board
//!
//! Command line front end: prints the board and runs board commands against
//! the configured record service.
//!
//! Environment:
//! - KANBAN_API_URL: record service base URL
//! - RUST_LOG: log filter (default `info`)

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use kanban_board::config::default_config_path;
use kanban_board::logging::init_logger;
use kanban_board::{BoardConfig, BoardContext, CardEdit, CardId, ColumnId, HttpRecordService};

#[derive(Parser)]
#[command(name = "kanban-board", version, about = "Kanban board client")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Record service base URL, overriding the config file
    #[arg(long, global = true, env = "KANBAN_API_URL")]
    api_url: Option<String>,

    /// Write logs to a daily rotated file in this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the board
    Show {
        /// Filter every column by title or description
        #[arg(long, default_value = "")]
        search: String,
        /// Filter one column, as `<column id>=<query>`; repeatable
        #[arg(long = "column-search", value_parser = parse_column_query)]
        column_search: Vec<(String, String)>,
    },
    /// Add a column at the end of the board
    AddColumn { title: String },
    /// Rename a column
    RenameColumn { id: String, title: String },
    /// Delete a column; its cards become unassigned
    DeleteColumn { id: String },
    /// Move a column to another column's position
    MoveColumn { id: String, target: String },
    /// Add a card at the end of a column
    AddCard {
        column: String,
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Edit a card's fields
    EditCard {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Move to this column
        #[arg(long, conflicts_with = "unassign")]
        column: Option<String>,
        /// Take the card out of its column
        #[arg(long)]
        unassign: bool,
    },
    /// Move a card into a column, before another card or at the end
    MoveCard {
        id: String,
        column: String,
        #[arg(long)]
        before: Option<String>,
    },
    /// Delete a card
    DeleteCard { id: String },
    /// Show or hide the unassigned column
    ToggleUnassigned,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let _guard = match init_logger(cli.log_dir.as_deref(), "kanban-board") {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli).await {
        error!(error = %e, transport = e.is_transport(), "command failed");
        eprintln!("Error: {}", e);
        if e.is_transport() {
            eprintln!("The record service could not be reached.");
        }
        std::process::exit(1);
    }
}

/// Parse `<column id>=<query>`
fn parse_column_query(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((id, query)) if !id.is_empty() => Ok((id.to_string(), query.to_string())),
        _ => Err(format!("expected <column id>=<query>, got `{}`", raw)),
    }
}

async fn run(cli: Cli) -> kanban_board::Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let mut config = BoardConfig::load(&config_path)?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }

    let service = Arc::new(HttpRecordService::new(config.api_base_url.clone()));
    info!(url = service.base_url(), "using record service");
    let mut ctx = BoardContext::with_config(service, &config);
    ctx.load().await?;

    let command = cli.command.unwrap_or(Commands::Show {
        search: String::new(),
        column_search: Vec::new(),
    });
    match command {
        Commands::Show {
            search,
            column_search,
        } => {
            ctx.set_global_search(search);
            for (id, query) in column_search {
                ctx.set_column_search(&id.into(), query);
            }
            if !ctx.search().global().is_empty() {
                let matched = ctx.search().filtered_cards(ctx.store().cards()).len();
                println!("{} of {} cards match", matched, ctx.store().cards().len());
            }
        }
        Commands::AddColumn { title } => ctx.create_column(title).await?,
        Commands::RenameColumn { id, title } => ctx.rename_column(&id.into(), title).await?,
        Commands::DeleteColumn { id } => ctx.delete_column(&id.into()).await?,
        Commands::MoveColumn { id, target } => {
            ctx.start_column_drag(&ColumnId::from(id))?;
            ctx.drop_column(&target.into()).await?;
        }
        Commands::AddCard {
            column,
            title,
            description,
        } => ctx.create_card(&column.into(), title, description).await?,
        Commands::EditCard {
            id,
            title,
            description,
            column,
            unassign,
        } => {
            let id = CardId::from(id);
            let current = ctx
                .store()
                .find_card(&id)
                .cloned()
                .ok_or_else(|| kanban_board::BoardError::CardNotFound { id: id.to_string() })?;
            let column_id = if unassign {
                None
            } else {
                column.map(ColumnId::from).or(current.column_id)
            };
            let edit = CardEdit {
                title: title.unwrap_or(current.title),
                description: description.unwrap_or(current.description),
                column_id,
            };
            ctx.update_card(&id, edit).await?;
        }
        Commands::MoveCard { id, column, before } => {
            ctx.start_card_drag(&CardId::from(id))?;
            let before = before.map(CardId::from);
            ctx.drop_card(Some(&column.into()), before.as_ref()).await?;
        }
        Commands::DeleteCard { id } => ctx.delete_card(&id.into()).await?,
        Commands::ToggleUnassigned => {
            config.show_unassigned = ctx.toggle_show_unassigned();
            config.save(&config_path)?;
        }
    }

    print_board(&ctx);
    Ok(())
}

fn print_board(ctx: &BoardContext) {
    for column in ctx.sorted_columns() {
        println!("{} [{}]", column.title, column.id);
        for card in ctx.column_cards(&column.id) {
            println!("  {:>3}  {} [{}]", card.order, card.title, card.id);
        }
    }
    if ctx.show_unassigned() {
        println!("Unassigned");
        for card in ctx.unassigned_cards() {
            println!("  {:>3}  {} [{}]", card.order, card.title, card.id);
        }
    }
}
