pub mod config;
pub mod error;
pub mod notification;
pub mod result;

pub use config::AppConfig;
pub use error::PlanboardError;
pub use notification::{Notification, Severity};
pub use result::PlanboardResult;
