use crate::api::client::InventoryClient;
use crate::cli::main_types::{ConfigCommands, ExportArgs, FilterArgs, RouteAction};
use crate::core::controller::{
    ControllerSettings, PendingFetch, TableController, edit_route, view_route,
};
use crate::core::filters::{FilterColumn, parse_filter_date};
use crate::core::services::{DashboardService, InventoryApi, ServiceError, StatisticCard};
use crate::display::{
    OperationStatus, ProgressSpinner, TableDisplay, display_notification, display_status,
};
use crate::error::{AppError, CliError, ExportError};
use crate::export::Notification;
use crate::storage::config::Config;
use crate::utils::error_helpers::convert_io_to_display_error;
use crate::utils::validation::{validate_page_size, validate_slug};
use chrono::Utc;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Keep only section lookups; listing requests are superseded by the final
/// refresh of a one-shot command
fn sections_only(mut pending: Vec<PendingFetch>) -> Vec<PendingFetch> {
    pending.retain(|p| matches!(p, PendingFetch::Sections { .. }));
    pending
}

/// Load options and apply command-line filters to a fresh controller, then
/// fetch the requested page
pub async fn prepare_table<A: InventoryApi + 'static>(
    api: Arc<A>,
    settings: ControllerSettings,
    args: &FilterArgs,
) -> Result<TableController<A>, AppError> {
    if let Some(page_size) = args.page_size {
        validate_page_size(page_size)?;
    }
    if args.page == 0 {
        return Err(CliError::InvalidArguments("Page numbers start at 1".to_string()).into());
    }

    let mut controller = TableController::new(Arc::clone(&api), settings);
    controller.load_options().await;

    if let Some(stat) = &args.stat {
        let card: StatisticCard = stat.parse()?;
        let rows = DashboardService::new(Arc::clone(&api)).preselect(card).await?;
        controller.apply_statistic(card.title(), rows);
    }

    if let Some(page_size) = args.page_size {
        controller.set_page_size(page_size);
    }

    if let Some(department) = &args.department {
        let pending = sections_only(controller.select_department(department));
        controller.settle(pending).await;
    }

    if let Some(section) = &args.section {
        if !controller.is_section_enabled() {
            return Err(CliError::InvalidArguments(
                "--section needs a --department from the option catalog (see 'compinv options')"
                    .to_string(),
            )
            .into());
        }
        controller.select_section(section);
    }

    let text_filters = [
        (FilterColumn::HardwareType, &args.hardware_type),
        (FilterColumn::IpAddress, &args.ip),
        (FilterColumn::User, &args.user),
        (FilterColumn::HistoryUser, &args.history_user),
    ];
    for (column, value) in text_filters {
        if let Some(value) = value {
            controller.set_filter(column, value);
        }
    }

    if let Some(date) = &args.history_date {
        controller.select_history_date(parse_filter_date(date)?);
    }

    if let Some(search) = &args.search {
        controller.set_search(search);
        controller.flush_search();
    }

    let pending = controller.set_page(args.page);
    let mut spinner = ProgressSpinner::new("Loading computers...".to_string());
    spinner.start();
    controller.settle(pending).await;
    spinner.stop(None);

    Ok(controller)
}

fn print_table<A: InventoryApi + 'static>(controller: &TableController<A>, display: &TableDisplay) {
    println!(
        "{}",
        display.render_page_header(controller.pagination(), controller.source())
    );
    println!(
        "{}",
        display.render_filters(controller.filters(), controller.search())
    );
    println!(
        "{}",
        display.render_computers(controller.rows(), controller.pagination().offset + 1)
    );
}

/// Export the controller's visible set and report the outcome
pub fn run_export<A: InventoryApi + 'static>(
    controller: &TableController<A>,
    args: &ExportArgs,
    config: &Config,
) -> Result<(), AppError> {
    let dir = args.output_dir.clone().unwrap_or_else(|| config.export_dir());
    let result = controller.export_to(&dir, args.export_name.as_deref(), Utc::now().date_naive());
    display_notification(&Notification::from_export(&result));

    match result {
        Ok(_) | Err(ExportError::EmptyDataset) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[derive(Default)]
pub struct ListHandler;

impl ListHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        client: InventoryClient,
        config: &Config,
        filters: FilterArgs,
        export: Option<ExportArgs>,
    ) -> Result<(), AppError> {
        let controller = prepare_table(Arc::new(client), settings_from(config), &filters).await?;
        print_table(&controller, &TableDisplay::new());

        if let Some(export_args) = export {
            run_export(&controller, &export_args, config)?;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct ExportHandler;

impl ExportHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        client: InventoryClient,
        config: &Config,
        filters: FilterArgs,
        export_args: ExportArgs,
    ) -> Result<(), AppError> {
        let controller = prepare_table(Arc::new(client), settings_from(config), &filters).await?;
        run_export(&controller, &export_args, config)
    }
}

#[derive(Default)]
pub struct CatalogHandler;

impl CatalogHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle_options(&self, client: InventoryClient) -> Result<(), AppError> {
        let options = client.get_filter_options().await?;
        println!("{}", TableDisplay::new().render_options(&options));
        Ok(())
    }

    pub async fn handle_sections(
        &self,
        client: InventoryClient,
        department: &str,
    ) -> Result<(), AppError> {
        let options = client.get_filter_options().await?;
        let department_id =
            options
                .department_id(department)
                .ok_or_else(|| ServiceError::NotFound {
                    resource_type: "Department".to_string(),
                    key: department.to_string(),
                })?;

        let sections = client.get_sections(department_id).await?;
        println!("{}", TableDisplay::new().render_sections(&sections));
        Ok(())
    }

    pub async fn handle_stats(&self, client: InventoryClient) -> Result<(), AppError> {
        let service = DashboardService::new(Arc::new(client));
        let cards = service.cards().await?;
        println!("{}", TableDisplay::new().render_cards(&cards));
        Ok(())
    }
}

#[derive(Default)]
pub struct RowHandler;

impl RowHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_route(&self, action: RouteAction, slug: &str) -> Result<(), AppError> {
        validate_slug(slug)?;
        let route = match action {
            RouteAction::View => view_route(slug),
            RouteAction::Edit => edit_route(slug),
        };
        println!("{}", route);
        Ok(())
    }

    pub async fn handle_delete(
        &self,
        client: InventoryClient,
        slug: &str,
        yes: bool,
    ) -> Result<(), AppError> {
        validate_slug(slug)?;
        if !yes && !confirm(&format!("Delete computer '{}'?", slug))? {
            println!("Cancelled.");
            return Ok(());
        }

        let operation = format!("delete {}", slug);
        match client.delete_computer(slug).await {
            Ok(()) => {
                display_status(&operation, OperationStatus::Success);
                Ok(())
            }
            Err(e) => {
                display_status(&operation, OperationStatus::Error);
                Err(e.into())
            }
        }
    }
}

fn confirm(question: &str) -> Result<bool, AppError> {
    print!("{} [y/N] ", question);
    io::stdout()
        .flush()
        .map_err(|e| convert_io_to_display_error(e, "flush stdout"))?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| CliError::Input(e.to_string()))?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[derive(Default)]
pub struct ConfigHandler;

impl ConfigHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(
        &self,
        command: ConfigCommands,
        config: &mut Config,
        config_path: Option<PathBuf>,
    ) -> Result<(), AppError> {
        match command {
            ConfigCommands::Show => {
                log::debug!("showing configuration from {:?}", config_path);
                println!("{}", TableDisplay::new().render_config(&config.entries()));
                Ok(())
            }
            ConfigCommands::Set { key, value } => {
                config.set(&key, &value)?;
                config.save(config_path)?;
                println!("✅ Set {}", key);
                Ok(())
            }
        }
    }
}

pub fn settings_from(config: &Config) -> ControllerSettings {
    ControllerSettings {
        page_size: config.page_size(),
        search_debounce: config.search_debounce(),
    }
}
