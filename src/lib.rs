//! Bodega Core - client-side storefront account and wallet logic
//!
//! This crate implements the store behind the storefront view layer,
//! following hexagonal architecture:
//!
//! - **domain**: Core business entities (User, Deposit, snapshot, etc.)
//! - **ports**: Trait definitions for external dependencies (SnapshotStore, CardGateway)
//! - **services**: Business logic orchestration (directory, session, wallet)
//! - **adapters**: Concrete implementations (JSON file store, simulated gateway)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;
pub mod store;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::{InMemoryStore, JsonFileStore, SimulatedCardGateway};
use config::Config;
use ports::{CardGateway, SnapshotStore};
use services::*;
use store::Store;

// Re-export commonly used types at crate root
pub use domain::result::{Error, FieldError, OperationResult};
pub use domain::{CurrentUser, Deposit, DepositStatus, StoreSnapshot, User, UserPatch};

/// Main context for store operations
///
/// This is the primary entry point for the view layer. It is constructed
/// once at startup and injected into callers; the services it holds are the
/// store's only mutation surface.
pub struct BodegaContext {
    pub config: Config,
    pub store: Arc<Store>,
    pub directory_service: DirectoryService,
    pub session_service: SessionService,
    pub wallet_service: WalletService,
    pub logging_service: Arc<LoggingService>,
}

impl BodegaContext {
    /// Create a new context backed by a data directory
    ///
    /// Restores any persisted snapshot (including a remembered session)
    /// from `<data_dir>/store.json`.
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;
        let persistence = Box::new(JsonFileStore::new(data_dir));
        let gateway = Arc::new(SimulatedCardGateway::new(config.gateway.clone()));
        let logging = Arc::new(LoggingService::new(data_dir)?);
        Self::with_parts(config, persistence, gateway, logging)
    }

    /// Create a context with no data directory (demo/tests)
    ///
    /// State and event log live in memory only.
    pub fn in_memory(config: Config) -> Result<Self> {
        let persistence = Box::new(InMemoryStore::new());
        let gateway = Arc::new(SimulatedCardGateway::new(config.gateway.clone()));
        let logging = Arc::new(LoggingService::in_memory());
        Self::with_parts(config, persistence, gateway, logging)
    }

    /// Create a context from explicit parts
    ///
    /// The seam tests use to inject a deterministic gateway or a seeded
    /// snapshot store.
    pub fn with_parts(
        config: Config,
        persistence: Box<dyn SnapshotStore>,
        gateway: Arc<dyn CardGateway>,
        logging: Arc<LoggingService>,
    ) -> Result<Self> {
        let store = Arc::new(Store::open(persistence)?);

        let directory_service = DirectoryService::new(Arc::clone(&store), Arc::clone(&logging));
        let session_service = SessionService::new(Arc::clone(&store), Arc::clone(&logging));
        let wallet_service =
            WalletService::new(Arc::clone(&store), gateway, Arc::clone(&logging));

        Ok(Self {
            config,
            store,
            directory_service,
            session_service,
            wallet_service,
            logging_service: logging,
        })
    }
}
