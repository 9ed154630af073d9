//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID assigned or kept)
//!     → call_server.rs (validate id, call upstream)
//!     → response.rs / error.rs (success or failure envelope)
//!     → Send to client
//! ```

pub mod call_server;
pub mod error;
pub mod health;
pub mod request;
pub mod response;
pub mod server;

pub use call_server::CALL_SERVER_PATH;
pub use error::ProxyError;
pub use request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use response::Envelope;
pub use server::{AppState, HttpServer};
