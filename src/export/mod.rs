pub mod csv;

use std::path::PathBuf;

use crate::error::ExportError;

pub const LIVE_EXPORT_NAME: &str = "all_computers";
pub const PRESELECTED_EXPORT_NAME: &str = "filtered_computers";

/// Transient user-facing message (toast)
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Success(String),
    Warning(String),
    Error(String),
}

impl Notification {
    pub fn message(&self) -> &str {
        match self {
            Notification::Success(m) | Notification::Warning(m) | Notification::Error(m) => m,
        }
    }

    /// Map an export outcome to the notification shown to the user
    pub fn from_export(result: &Result<(usize, PathBuf), ExportError>) -> Self {
        match result {
            Ok((count, path)) => Notification::Success(format!(
                "Exported {} records to {}",
                count,
                path.display()
            )),
            Err(ExportError::EmptyDataset) => {
                Notification::Warning("No data to export".to_string())
            }
            Err(e) => {
                log::error!("export failed: {}", e);
                Notification::Error("An error occurred while exporting data".to_string())
            }
        }
    }
}
