use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Collaborative task board with optimistic drag-and-drop", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the board data file (or set TASKBOARD_FILE env var)
    #[arg(long, global = true, value_name = "FILE", env = "TASKBOARD_FILE")]
    pub file: Option<PathBuf>,

    /// Directory of the local board cache (overrides the config file)
    #[arg(long, global = true, value_name = "DIR", env = "TASKBOARD_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Board operations
    Board(BoardCommand),
    /// List operations
    List(ListCommand),
    /// Card operations
    Card(CardCommand),
    /// Local cache operations
    Cache(CacheCommand),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// Board commands
#[derive(Args)]
pub struct BoardCommand {
    #[command(subcommand)]
    pub action: BoardAction,
}

#[derive(Subcommand)]
pub enum BoardAction {
    /// Create a new board
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        color: Option<String>,
    },
    /// List all boards
    List,
    /// Show a board with its lists and cards
    Show {
        #[arg(long)]
        id: Uuid,
    },
}

// List commands
#[derive(Args)]
pub struct ListCommand {
    #[command(subcommand)]
    pub action: ListAction,
}

#[derive(Subcommand)]
pub enum ListAction {
    /// Append a list to a board
    Create {
        #[arg(long)]
        board_id: Uuid,
        #[arg(long)]
        name: String,
    },
    /// Drag a list to another position
    Move {
        #[arg(long)]
        board_id: Uuid,
        #[arg(long)]
        list_id: Uuid,
        /// Destination index; past the end appends
        #[arg(long)]
        to: usize,
    },
    /// Rename a list
    Rename {
        #[arg(long)]
        list_id: Uuid,
        #[arg(long)]
        name: String,
    },
    /// Delete a list together with its cards
    Delete {
        #[arg(long)]
        list_id: Uuid,
    },
}

// Card commands
#[derive(Args)]
pub struct CardCommand {
    #[command(subcommand)]
    pub action: CardAction,
}

#[derive(Subcommand)]
pub enum CardAction {
    /// Append a card to a list
    Create {
        #[arg(long)]
        list_id: Uuid,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Due date (RFC 3339, e.g. 2026-11-01T17:00:00Z)
        #[arg(long)]
        due: Option<DateTime<Utc>>,
    },
    /// Edit a card's title, description or due date
    Update(CardUpdateArgs),
    /// Drag a card within its list or into another one
    Move(CardMoveArgs),
    /// Delete a card
    Delete {
        #[arg(long)]
        card_id: Uuid,
    },
}

#[derive(Args)]
pub struct CardUpdateArgs {
    #[arg(long)]
    pub card_id: Uuid,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, conflicts_with = "clear_description")]
    pub description: Option<String>,
    /// Remove the description
    #[arg(long)]
    pub clear_description: bool,
    /// Due date (RFC 3339)
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<DateTime<Utc>>,
    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,
}

#[derive(Args)]
pub struct CardMoveArgs {
    #[arg(long)]
    pub board_id: Uuid,
    #[arg(long)]
    pub card_id: Uuid,
    /// Destination list; defaults to the card's current list
    #[arg(long)]
    pub to_list: Option<Uuid>,
    /// Destination index; past the end appends
    #[arg(long)]
    pub to: usize,
}

// Cache commands
#[derive(Args)]
pub struct CacheCommand {
    #[command(subcommand)]
    pub action: CacheAction,
}

#[derive(Subcommand)]
pub enum CacheAction {
    /// Show the cached copy of a board, if still fresh
    Show {
        #[arg(long)]
        board_id: Uuid,
    },
    /// Remove the cached copy of a board
    Clear {
        #[arg(long)]
        board_id: Uuid,
    },
}
