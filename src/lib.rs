//! call-server: forwarding proxy for the `/data` upstream resource.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod numeric_id;
pub mod observability;
pub mod upstream;

pub use config::ProxyConfig;
pub use http::{Envelope, HttpServer};
pub use lifecycle::Shutdown;
pub use numeric_id::NumericId;
