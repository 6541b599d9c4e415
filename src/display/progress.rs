//! Progress display utilities for long-running operations

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::export::Notification;

// Constants for display configuration
const SPINNER_UPDATE_INTERVAL_MS: u64 = 100;
const CLEAR_LINE_WIDTH: usize = 100;

/// Simple spinner shown while a request is outstanding
pub struct ProgressSpinner {
    message: String,
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
    enabled: bool,
}

impl ProgressSpinner {
    /// Create new progress spinner with message. Nothing is drawn when
    /// stdout is not a terminal.
    pub fn new(message: String) -> Self {
        Self {
            message,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
            enabled: atty::is(atty::Stream::Stdout),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Start spinner
    pub fn start(&mut self) {
        if !self.enabled || self.is_running() {
            return;
        }
        self.running.store(true, Ordering::Relaxed);
        let running = Arc::clone(&self.running);
        let message = self.message.clone();

        let handle = thread::spawn(move || {
            let spinner_chars = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
            let mut index = 0;

            while running.load(Ordering::Relaxed) {
                print!("\r{} {}", spinner_chars[index], message);
                let _ = io::stdout().flush(); // Ignore flush errors to continue operation

                index = (index + 1) % spinner_chars.len();
                thread::sleep(Duration::from_millis(SPINNER_UPDATE_INTERVAL_MS));
            }

            // Clear line properly for emoji support
            print!("\r{:<width$}\r", "", width = CLEAR_LINE_WIDTH);
            let _ = io::stdout().flush();
        });

        self.handle = Some(handle);
    }

    /// Stop spinner and display completion message
    pub fn stop(&mut self, completion_message: Option<&str>) {
        self.running.store(false, Ordering::Relaxed);

        if let Some(handle) = self.handle.take() {
            let _ = handle.join(); // Ignore thread join errors
        }

        if let Some(msg) = completion_message {
            // Add space before emoji to prevent terminal clipping
            println!(" {}", msg);
            let _ = io::stdout().flush();
        }
    }
}

impl Drop for ProgressSpinner {
    fn drop(&mut self) {
        self.stop(None);
    }
}

/// Display operation status
pub fn display_status(operation: &str, status: OperationStatus) {
    println!(" {}", format_status(operation, &status));
}

pub fn format_status(operation: &str, status: &OperationStatus) -> String {
    let (symbol, message) = match status {
        OperationStatus::InProgress => ("⏳", format!("In progress: {}", operation)),
        OperationStatus::Success => ("✅", format!("Completed: {}", operation)),
        OperationStatus::Warning => ("⚠️", format!("Warning: {}", operation)),
        OperationStatus::Error => ("❌", format!("Error: {}", operation)),
    };
    format!("{} {}", symbol, message)
}

/// Toast line for a notification
pub fn format_notification(notification: &Notification) -> String {
    let symbol = match notification {
        Notification::Success(_) => "✅",
        Notification::Warning(_) => "⚠️",
        Notification::Error(_) => "❌",
    };
    format!("{} {}", symbol, notification.message())
}

/// Print a notification; errors go to stderr
pub fn display_notification(notification: &Notification) {
    match notification {
        Notification::Error(_) => eprintln!(" {}", format_notification(notification)),
        _ => println!(" {}", format_notification(notification)),
    }
}

/// Types of operation status
#[derive(Debug, Clone)]
pub enum OperationStatus {
    InProgress,
    Success,
    Warning,
    Error,
}
