use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "compinv")]
#[command(about = "Command line client for the office computer inventory")]
#[command(version)]
#[command(after_help = "Examples:
  compinv list                                 # First page of all computers
  compinv list --department 2-цех --page 2     # Filter by department
  compinv list --stat internet --export        # Computers with internet, exported to CSV
  compinv stats                                # Statistic cards
  compinv sections 2-цех                       # Sections of a department
  compinv browse                               # Interactive table session
  compinv config set url http://inventory.local/api

Environment Variables:
  COMPINV_URL     Inventory API base URL
  COMPINV_TOKEN   Bearer token sent with every request
  RUST_LOG        Log filter (overrides --verbose)")]
pub struct Cli {
    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Custom configuration directory path
    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    /// Inventory API base URL
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Bearer token for the inventory API
    #[arg(long, global = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List computers with filters and pagination
    List(ListArgs),
    /// Export the filtered computers to a CSV file
    Export(ExportCommandArgs),
    /// Show the filter option catalog
    Options,
    /// List the sections of a department
    Sections {
        /// Department name as shown by 'compinv options'
        department: String,
    },
    /// Show the statistic cards
    Stats,
    /// Delete a computer by slug
    Delete {
        slug: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Print the dashboard route of a computer
    Route {
        #[arg(value_enum)]
        action: RouteAction,
        slug: String,
    },
    /// Interactive table session
    Browse,
    /// Configuration management (show, set)
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteAction {
    View,
    Edit,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Set a configuration value
    #[command(after_help = "Keys: url, token, page_size, search_debounce_ms, export_dir

Examples:
  compinv config set url http://inventory.local/api
  compinv config set page_size 100")]
    Set { key: String, value: String },
}

/// Table filters shared by `list` and `export`
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Department name
    #[arg(long)]
    pub department: Option<String>,

    /// Section name (requires --department)
    #[arg(long)]
    pub section: Option<String>,

    /// Hardware type name
    #[arg(long = "type")]
    pub hardware_type: Option<String>,

    /// IP address
    #[arg(long)]
    pub ip: Option<String>,

    /// Assigned user
    #[arg(long)]
    pub user: Option<String>,

    /// Last change date (YYYY-MM-DD or DD.MM.YYYY)
    #[arg(long)]
    pub history_date: Option<String>,

    /// User who made the last change
    #[arg(long)]
    pub history_user: Option<String>,

    /// Free-text search
    #[arg(short, long)]
    pub search: Option<String>,

    /// Page number (1-based)
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Statistic card (title or alias, see 'compinv stats')
    #[arg(long)]
    pub stat: Option<String>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct ExportArgs {
    /// Base file name (default: all_computers or filtered_computers)
    #[arg(long)]
    pub export_name: Option<String>,

    /// Directory the CSV file is written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Also export the shown rows to CSV
    #[arg(long)]
    pub export: bool,

    #[command(flatten)]
    pub export_args: ExportArgs,
}

#[derive(Args, Debug)]
pub struct ExportCommandArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    #[command(flatten)]
    pub export_args: ExportArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_filters() {
        let cli = Cli::try_parse_from([
            "compinv",
            "list",
            "--department",
            "2-цех",
            "--type",
            "Ноутбук",
            "--page",
            "3",
            "--export",
        ])
        .unwrap();

        match cli.command {
            Commands::List(args) => {
                assert_eq!(args.filters.department.as_deref(), Some("2-цех"));
                assert_eq!(args.filters.hardware_type.as_deref(), Some("Ноутбук"));
                assert_eq!(args.filters.page, 3);
                assert!(args.export);
            }
            _ => panic!("Expected list command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["compinv", "stats", "--url", "http://x.test", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.url.as_deref(), Some("http://x.test"));
    }

    #[test]
    fn test_route_action_values() {
        let cli = Cli::try_parse_from(["compinv", "route", "edit", "pc-1"]).unwrap();
        match cli.command {
            Commands::Route { action, slug } => {
                assert_eq!(action, RouteAction::Edit);
                assert_eq!(slug, "pc-1");
            }
            _ => panic!("Expected route command"),
        }
        assert!(Cli::try_parse_from(["compinv", "route", "print", "pc-1"]).is_err());
    }

    #[test]
    fn test_config_set() {
        let cli = Cli::try_parse_from(["compinv", "config", "set", "page_size", "20"]).unwrap();
        match cli.command {
            Commands::Config {
                command: ConfigCommands::Set { key, value },
            } => {
                assert_eq!(key, "page_size");
                assert_eq!(value, "20");
            }
            _ => panic!("Expected config set command"),
        }
    }
}
