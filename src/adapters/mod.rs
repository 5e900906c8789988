//! Concrete adapter implementations for the ports

mod json_file;
mod memory;
mod sim_gateway;

pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;
pub use sim_gateway::{GatewayConfig, SimulatedCardGateway};
