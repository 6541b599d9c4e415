use crate::api::client::InventoryClient;
use crate::cli::browse::BrowseSession;
use crate::cli::command_handlers::{
    CatalogHandler, ConfigHandler, ExportHandler, ListHandler, RowHandler, settings_from,
};
use crate::cli::main_types::Commands;
use crate::error::AppError;
use crate::storage::config::Config;
use std::path::PathBuf;
use std::sync::Arc;

pub struct Dispatcher {
    config: Config,
    config_path: Option<PathBuf>,
    url: Option<String>,
    token: Option<String>,
}

impl Dispatcher {
    pub fn new(
        config: Config,
        config_path: Option<PathBuf>,
        url: Option<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            config,
            config_path,
            url,
            token,
        }
    }

    // Helper method to create InventoryClient with the effective URL and token
    fn create_client(&self) -> Result<InventoryClient, AppError> {
        let url = self.config.require_url(self.url.as_deref())?;
        let token = self.config.get_token(self.token.as_deref());
        let client = InventoryClient::new(url)?.with_token(token);
        log::debug!(
            "created client for {} ({})",
            client.base_url,
            if client.is_authenticated() { "with token" } else { "anonymous" }
        );
        Ok(client)
    }

    pub async fn dispatch(&mut self, command: Commands) -> Result<(), AppError> {
        match command {
            Commands::List(args) => {
                let client = self.create_client()?;
                let export = args.export.then_some(args.export_args);
                ListHandler::new()
                    .handle(client, &self.config, args.filters, export)
                    .await
            }
            Commands::Export(args) => {
                let client = self.create_client()?;
                ExportHandler::new()
                    .handle(client, &self.config, args.filters, args.export_args)
                    .await
            }
            Commands::Options => {
                let client = self.create_client()?;
                CatalogHandler::new().handle_options(client).await
            }
            Commands::Sections { department } => {
                let client = self.create_client()?;
                CatalogHandler::new()
                    .handle_sections(client, &department)
                    .await
            }
            Commands::Stats => {
                let client = self.create_client()?;
                CatalogHandler::new().handle_stats(client).await
            }
            Commands::Delete { slug, yes } => {
                let client = self.create_client()?;
                RowHandler::new().handle_delete(client, &slug, yes).await
            }
            Commands::Route { action, slug } => RowHandler::new().handle_route(action, &slug),
            Commands::Browse => {
                let client = self.create_client()?;
                let mut session = BrowseSession::new(
                    Arc::new(client),
                    settings_from(&self.config),
                    self.config.export_dir(),
                );
                session.run().await
            }
            Commands::Config { command } => {
                // Config commands work without a reachable server
                ConfigHandler::new().handle(command, &mut self.config, self.config_path.clone())
            }
        }
    }
}
