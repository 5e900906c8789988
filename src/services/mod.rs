//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod directory;
pub mod logging;
mod session;
mod wallet;

pub use directory::DirectoryService;
pub use logging::{LogEntry, LogEvent, LoggingService};
pub use session::SessionService;
pub use wallet::WalletService;
