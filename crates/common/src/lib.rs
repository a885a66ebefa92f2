pub mod config;
pub mod error;
pub mod history;
pub mod types;

pub use config::Config;
pub use error::{Error, FailureReason, Result};
pub use history::TradeHistory;
pub use types::*;
