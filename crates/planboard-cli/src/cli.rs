use clap::{Args, Parser, Subcommand};
use planboard_domain::{CardPriority, CardType, Column};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "planboard")]
#[command(about = "Kanban planning board with ordered columns", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the board data file (or set PLANBOARD_FILE env var)
    #[arg(long, global = true, value_name = "FILE", env = "PLANBOARD_FILE")]
    pub file: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Board operations
    Board(BoardCommand),
    /// Card operations
    Card(CardCommand),
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
        #[arg(long, requires = "creator_name")]
        creator_id: Option<String>,
        #[arg(long, requires = "creator_id")]
        creator_name: Option<String>,
    },
    /// List all boards
    List,
    /// Rename a board
    Rename {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        name: String,
    },
    /// Delete a board; its cards move to the unassigned bucket
    Delete {
        #[arg(long)]
        id: Uuid,
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
    /// Create a new card at the end of its column
    Create(CardCreateArgs),
    /// List cards of a board in column and position order
    List {
        /// Omit to list the unassigned bucket
        #[arg(long)]
        board_id: Option<Uuid>,
        #[arg(long)]
        column: Option<Column>,
    },
    /// Get a specific card, including soft-deleted ones
    Get {
        #[arg(long)]
        id: Uuid,
    },
    /// Update card fields without moving it
    Update(CardUpdateArgs),
    /// Move a card to a column and position
    Move {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        column: Column,
        #[arg(long, allow_hyphen_values = true)]
        position: i32,
    },
    /// Soft-delete a card
    Delete {
        #[arg(long)]
        id: Uuid,
    },
    /// Restore a soft-deleted card
    Restore {
        #[arg(long)]
        id: Uuid,
    },
    /// Permanently delete a card
    Purge {
        #[arg(long)]
        id: Uuid,
    },
    /// List soft-deleted cards, newest first
    Deleted {
        #[arg(long)]
        board_id: Option<Uuid>,
    },
}

#[derive(Args)]
pub struct CardCreateArgs {
    #[arg(long)]
    pub board_id: Option<Uuid>,
    #[arg(long, default_value = "backlog")]
    pub column: Column,
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub content: Option<String>,
    #[arg(long)]
    pub priority: Option<CardPriority>,
    #[arg(long = "type")]
    pub card_type: Option<CardType>,
    #[arg(long)]
    pub due_date: Option<String>,
}

#[derive(Args)]
pub struct CardUpdateArgs {
    #[arg(long)]
    pub id: Uuid,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, conflicts_with = "clear_content")]
    pub content: Option<String>,
    #[arg(long)]
    pub clear_content: bool,
    #[arg(long)]
    pub priority: Option<CardPriority>,
    #[arg(long = "type")]
    pub card_type: Option<CardType>,
    #[arg(long, conflicts_with = "clear_due_date")]
    pub due_date: Option<String>,
    #[arg(long)]
    pub clear_due_date: bool,
}
