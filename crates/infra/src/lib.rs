//! Infrastructure layer: product storage, the layout generator client, config.

pub mod config;
pub mod layout;
pub mod store;

pub use config::{AppConfig, ConfigError, LogFormat};
pub use layout::{LayoutError, LayoutGenerator};
pub use store::{ProductStore, StoreError};
