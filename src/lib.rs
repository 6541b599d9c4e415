pub use error::AppError;

/// Main architecture layers (dependency flow: CLI → Core → Storage)
pub mod cli; // Command-line interface
pub mod core; // Table controller and services
pub mod storage; // Configuration persistence

/// Support modules (used across layers)
pub mod api; // Inventory API client
pub mod display; // Output formatting
pub mod error; // Error handling
pub mod export; // CSV export
pub mod utils; // Shared utilities and helpers

pub type Result<T> = std::result::Result<T, AppError>;
