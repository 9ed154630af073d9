//! Upstream service integration.
//!
//! # Data Flow
//! ```text
//! handler
//!     → UpstreamCall (method + path under the base address)
//!     → client.rs (reqwest, one pooled client)
//!     → 2xx: body as JSON (or raw text)
//!     → anything else: UpstreamError
//! ```

pub mod client;
pub mod error;

pub use client::{UpstreamCall, UpstreamClient};
pub use error::{UpstreamError, UpstreamResult};
