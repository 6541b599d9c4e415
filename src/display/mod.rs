pub mod progress;
pub mod table;

pub use progress::{
    OperationStatus, ProgressSpinner, display_notification, display_status, format_notification,
};
pub use table::TableDisplay;
