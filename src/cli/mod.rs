//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for list/query commands.
#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table (default)
    #[default]
    Table,
    /// JSON (same as --json)
    Json,
    /// Comma-separated values
    Csv,
}

pub mod commands;

/// Inventory CLI - track stock, sales and suppliers
#[derive(Parser, Debug)]
#[command(name = "inv", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: ~/.inventory/data/inventory.db)
    #[arg(long, global = true, env = "INV_DB")]
    pub db: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Output format (table, json, csv)
    #[arg(long, value_enum, global = true, default_value_t)]
    pub format: OutputFormat,

    /// Output only the item URI or count (for scripting)
    #[arg(long, global = true)]
    pub silent: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the inventory database
    Init {
        /// Discard an existing database and start empty
        #[arg(long)]
        force: bool,
    },

    /// Print version information
    Version,

    /// Add an item
    Add(AddArgs),

    /// Add the demo item (Headphones, 45 in stock, price 5)
    Sample,

    /// List items
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one item
    Show {
        /// Item ID
        id: i64,
    },

    /// Edit an item
    Edit(EditArgs),

    /// Delete an item
    #[command(alias = "rm")]
    Delete {
        /// Item ID
        id: i64,
    },

    /// Delete every item
    Clear {
        /// Confirm deleting all items
        #[arg(long)]
        yes: bool,
    },

    /// Record a sale, reducing stock
    Sell {
        /// Item ID
        id: i64,

        /// Units sold
        #[arg(short, long, default_value_t = 1)]
        count: u32,
    },

    /// Change stock by a signed amount (e.g. 10 or -3)
    Adjust {
        /// Item ID
        id: i64,

        /// Units to add (negative to remove)
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },

    /// Print the MIME type of a resource URI
    Type {
        /// Resource URI, e.g. content://com.example.android.inventory/inventory/1
        uri: String,
    },

    /// Drop and recreate the inventory table
    Reset {
        /// Confirm discarding all items
        #[arg(long)]
        yes: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ============================================================================
// Item Commands
// ============================================================================

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Item name
    pub name: String,

    /// Unit price
    #[arg(short, long)]
    pub price: String,

    /// Units in stock
    #[arg(short = 'n', long, default_value = "0", allow_hyphen_values = true)]
    pub quantity: String,

    /// Supplier contact (e.g. an email address)
    #[arg(short, long)]
    pub supplier: Option<String>,

    /// Image reference
    #[arg(short, long)]
    pub image: Option<String>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Sort by: id, name, quantity, price (or qty, stock, cost, title)
    #[arg(short, long, default_value = "id")]
    pub sort: String,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Only items with no stock left
    #[arg(long)]
    pub out_of_stock: bool,

    /// Maximum items to return
    #[arg(short, long)]
    pub limit: Option<usize>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Item ID
    pub id: i64,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New stock count
    #[arg(short = 'n', long, allow_hyphen_values = true)]
    pub quantity: Option<String>,

    /// New unit price
    #[arg(short, long)]
    pub price: Option<String>,

    /// New supplier contact
    #[arg(short, long, conflicts_with = "clear_supplier")]
    pub supplier: Option<String>,

    /// New image reference
    #[arg(short, long, conflicts_with = "clear_image")]
    pub image: Option<String>,

    /// Remove the supplier contact
    #[arg(long)]
    pub clear_supplier: bool,

    /// Remove the image reference
    #[arg(long)]
    pub clear_image: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_adjust_accepts_negative_delta() {
        let cli = Cli::try_parse_from(["inv", "adjust", "3", "-2"]).unwrap();
        assert!(matches!(cli.command, Commands::Adjust { id: 3, delta: -2 }));
    }

    #[test]
    fn test_edit_clear_conflicts_with_value() {
        let result =
            Cli::try_parse_from(["inv", "edit", "1", "--supplier", "x", "--clear-supplier"]);
        assert!(result.is_err());
    }
}
