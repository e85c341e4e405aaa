pub mod config;
pub mod transport;

pub use config::{ApiConfig, BaseUrlPolicy, ConfigError};
pub use transport::{RawResponse, Transport, TransportError};
