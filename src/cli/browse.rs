//! Interactive table session.
//!
//! Reads one command per line from stdin while listing requests run in the
//! background. Typed search text is applied once it has been stable for the
//! debounce delay; responses that were overtaken by newer requests are
//! dropped by the controller.

use std::path::PathBuf;
use std::sync::Arc;

use futures::StreamExt;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;

use crate::core::controller::{
    ControllerSettings, FetchOutcome, PendingFetch, RowAction, RowActionOutcome, TableController,
};
use crate::core::filters::FilterColumn;
use crate::core::services::{DashboardService, InventoryApi, StatisticCard};
use crate::display::{OperationStatus, TableDisplay, display_notification, display_status};
use crate::error::{AppError, CliError};
use crate::utils::text::pad_to_width;
use crate::utils::validation::{validate_page_size, validate_slug};

const HELP: [(&str, &str); 20] = [
    ("search <text>", "free-text search (applied after a short pause)"),
    ("dept <name>", "filter by department"),
    ("section <name>", "filter by section (needs a department)"),
    ("type <name>", "filter by hardware type"),
    ("ip <address>", "filter by IP address"),
    ("user <name>", "filter by user"),
    ("date <date>", "filter by last change date"),
    ("huser <name>", "filter by last change user"),
    ("clear <column>", "clear one filter"),
    ("reset", "clear all filters and search"),
    ("next / prev", "move between pages"),
    ("page <n> / size <n>", "jump to a page / set rows per page"),
    ("cards", "show statistic cards"),
    ("stat <card>", "show the computers of a statistic card"),
    ("live", "back to all computers"),
    ("open <column>", "toggle the option list of a column"),
    ("export [name]", "export the visible set to CSV"),
    ("view|edit|delete <slug>", "row actions"),
    ("show", "print the table again"),
    ("quit", "leave the session"),
];

#[derive(Debug, Clone, PartialEq)]
pub enum BrowseCommand {
    Search(String),
    Filter(FilterColumn, String),
    Clear(FilterColumn),
    Reset,
    Next,
    Prev,
    Page(usize),
    Size(usize),
    Cards,
    Stat(StatisticCard),
    Live,
    Open(FilterColumn),
    Export(Option<String>),
    Row(RowAction, String),
    Show,
    Help,
    Quit,
}

fn required<'a>(command: &str, argument: &'a str) -> Result<&'a str, CliError> {
    if argument.is_empty() {
        Err(CliError::InvalidArguments(format!(
            "'{}' needs an argument (type 'help')",
            command
        )))
    } else {
        Ok(argument)
    }
}

fn number(command: &str, argument: &str) -> Result<usize, CliError> {
    required(command, argument)?.parse().map_err(|_| {
        CliError::InvalidArguments(format!("'{}' expects a number, got '{}'", command, argument))
    })
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<BrowseCommand>, AppError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let name = word.to_lowercase();
    let command = match name.as_str() {
        "search" | "s" => BrowseCommand::Search(rest.to_string()),
        "dept" | "department" | "section" | "type" | "ip" | "user" | "date" | "huser" => {
            let column: FilterColumn = word.parse()?;
            BrowseCommand::Filter(column, required(word, rest)?.to_string())
        }
        "clear" => BrowseCommand::Clear(required(word, rest)?.parse()?),
        "open" => BrowseCommand::Open(required(word, rest)?.parse()?),
        "reset" => BrowseCommand::Reset,
        "next" | "n" => BrowseCommand::Next,
        "prev" | "p" => BrowseCommand::Prev,
        "page" => {
            let page = number(word, rest)?;
            if page == 0 {
                return Err(CliError::InvalidArguments("Page numbers start at 1".to_string()).into());
            }
            BrowseCommand::Page(page)
        }
        "size" => {
            let size = number(word, rest)?;
            validate_page_size(size)?;
            BrowseCommand::Size(size)
        }
        "cards" | "stats" => BrowseCommand::Cards,
        "stat" => BrowseCommand::Stat(required(word, rest)?.parse()?),
        "live" => BrowseCommand::Live,
        "export" => BrowseCommand::Export(Some(rest.to_string()).filter(|n| !n.is_empty())),
        "view" | "edit" | "delete" => {
            let slug = required(word, rest)?;
            validate_slug(slug)?;
            let action = match name.as_str() {
                "view" => RowAction::View,
                "edit" => RowAction::Edit,
                _ => RowAction::Delete,
            };
            BrowseCommand::Row(action, slug.to_string())
        }
        "show" | "ls" => BrowseCommand::Show,
        "help" | "?" => BrowseCommand::Help,
        "quit" | "exit" | "q" => BrowseCommand::Quit,
        other => {
            return Err(CliError::InvalidArguments(format!(
                "Unknown command '{}' (type 'help')",
                other
            ))
            .into());
        }
    };

    Ok(Some(command))
}

pub struct BrowseSession<A: InventoryApi + 'static> {
    controller: TableController<A>,
    dashboard: DashboardService<A>,
    display: TableDisplay,
    export_dir: PathBuf,
    in_flight: FuturesUnordered<BoxFuture<'static, FetchOutcome>>,
}

impl<A: InventoryApi + 'static> BrowseSession<A> {
    pub fn new(api: Arc<A>, settings: ControllerSettings, export_dir: PathBuf) -> Self {
        Self {
            controller: TableController::new(Arc::clone(&api), settings),
            dashboard: DashboardService::new(api),
            display: TableDisplay::new(),
            export_dir,
            in_flight: FuturesUnordered::new(),
        }
    }

    pub async fn run(&mut self) -> Result<(), AppError> {
        self.controller.load_options().await;
        let pending = self.controller.begin_refresh();
        self.spawn(pending);
        println!("Type 'help' for commands, 'quit' to leave.");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let deadline = self.controller.search_deadline();
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.map_err(|e| CliError::Input(e.to_string()))? else {
                        break;
                    };
                    match parse_command(&line) {
                        Ok(Some(BrowseCommand::Quit)) => break,
                        Ok(Some(command)) => self.execute(command).await,
                        Ok(None) => {}
                        Err(e) => eprintln!("{}", e.display_friendly()),
                    }
                }
                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    let pending = self.controller.apply_settled_search();
                    self.spawn(pending);
                }
                Some(outcome) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    let is_sections = matches!(outcome, FetchOutcome::Sections { .. });
                    if self.controller.complete(outcome) && !is_sections && !self.controller.is_loading() {
                        self.render();
                    }
                }
            }
        }

        Ok(())
    }

    /// Queue triggered fetches; a locally sliced change is shown at once
    fn spawn(&mut self, pending: Vec<PendingFetch>) {
        if pending.is_empty() {
            if !self.controller.is_loading() {
                self.render();
            }
            return;
        }
        for fetch in pending {
            self.in_flight.push(self.controller.dispatch(fetch));
        }
    }

    fn render(&self) {
        if self.controller.search_input() != self.controller.search() {
            println!("(search '{}' pending)", self.controller.search_input());
        }
        println!(
            "{}",
            self.display
                .render_page_header(self.controller.pagination(), self.controller.source())
        );
        println!(
            "{}",
            self.display
                .render_filters(self.controller.filters(), self.controller.search())
        );
        println!(
            "{}",
            self.display.render_computers(
                self.controller.rows(),
                self.controller.pagination().offset + 1
            )
        );
    }

    fn print_help(&self) {
        for (command, description) in HELP {
            println!("  {} {}", pad_to_width(command, 24), description);
        }
    }

    fn print_column_options(&self, column: FilterColumn) {
        let options = self.controller.options();
        let values: Vec<String> = match column {
            FilterColumn::Department => self
                .controller
                .department_options()
                .into_iter()
                .map(|d| d.name)
                .collect(),
            FilterColumn::Section => self
                .controller
                .section_options()
                .iter()
                .map(|s| s.raw_name.clone())
                .collect(),
            FilterColumn::HardwareType => options
                .type_compyuters
                .iter()
                .map(|t| t.name.clone())
                .collect(),
            FilterColumn::IpAddress => options.ip_addresses.clone(),
            FilterColumn::User | FilterColumn::HistoryUser => options.users.clone(),
            FilterColumn::HistoryDate => {
                println!("Enter a date with 'date YYYY-MM-DD' or 'date DD.MM.YYYY'");
                return;
            }
        };

        if values.is_empty() {
            println!("No options for {}", column);
        }
        for value in values {
            println!("  {}", value);
        }
    }

    async fn execute(&mut self, command: BrowseCommand) {
        match command {
            BrowseCommand::Search(text) => self.controller.set_search(&text),
            BrowseCommand::Filter(column, value) => {
                if column == FilterColumn::Section && !self.controller.is_section_enabled() {
                    eprintln!("Select a known department first");
                    return;
                }
                let pending = self.controller.set_filter(column, &value);
                self.spawn(pending);
            }
            BrowseCommand::Clear(column) => {
                let pending = self.controller.clear_filter(column);
                self.spawn(pending);
            }
            BrowseCommand::Reset => {
                let pending = self.controller.reset();
                self.spawn(pending);
            }
            BrowseCommand::Next => {
                if !self.controller.pagination().has_next() {
                    println!("Already on the last page");
                    return;
                }
                let pending = self.controller.next_page();
                self.spawn(pending);
            }
            BrowseCommand::Prev => {
                if !self.controller.pagination().has_prev() {
                    println!("Already on the first page");
                    return;
                }
                let pending = self.controller.prev_page();
                self.spawn(pending);
            }
            BrowseCommand::Page(page) => {
                let pending = self.controller.set_page(page);
                self.spawn(pending);
            }
            BrowseCommand::Size(size) => {
                let pending = self.controller.set_page_size(size);
                self.spawn(pending);
            }
            BrowseCommand::Cards => match self.dashboard.cards().await {
                Ok(cards) => println!("{}", self.display.render_cards(&cards)),
                Err(e) => eprintln!("❌ {}", e),
            },
            BrowseCommand::Stat(card) => {
                let pending = self.controller.select_statistic(card.title());
                self.spawn(pending);
            }
            BrowseCommand::Live => {
                let pending = self.controller.clear_statistic();
                self.spawn(pending);
            }
            BrowseCommand::Open(column) => {
                if self.controller.toggle_popup(column) {
                    self.print_column_options(column);
                } else if column == FilterColumn::Section && !self.controller.is_section_enabled() {
                    println!("Select a known department first");
                }
            }
            BrowseCommand::Export(name) => {
                let notification = self.controller.export(&self.export_dir, name.as_deref());
                display_notification(&notification);
            }
            BrowseCommand::Row(action, slug) => {
                match self.controller.row_action(action, &slug).await {
                    Ok(RowActionOutcome::Navigate(route)) => println!("{}", route),
                    Ok(RowActionOutcome::Deleted(slug)) => {
                        display_status(&format!("delete {}", slug), OperationStatus::Success);
                        self.render();
                    }
                    Err(e) => {
                        display_status(&format!("delete {}", slug), OperationStatus::Error);
                        eprintln!("{}", e);
                    }
                }
            }
            BrowseCommand::Show => self.render(),
            BrowseCommand::Help => self.print_help(),
            BrowseCommand::Quit => {}
        }
    }
}
