// ABOUTME: Main library entry point for the BFF proxy client.
// ABOUTME: Re-exports the public API: Client, ClientBuilder, Options, Health, ProxyError and ErrorCode.

//! Async HTTP client for the movie BFF.
//!
//! # Example
//!
//! ```no_run
//! use marquee_proxy::{Client, ProxyError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ProxyError> {
//!     let client = Client::builder().base_url("http://localhost:3001/api").build()?;
//!     let page = client.popular(1).await?;
//!     println!("{} of {} pages", page.page, page.total_pages);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod options;
pub mod resource;

pub use crate::client::{Client, Health};
pub use crate::error::{ErrorCode, ProxyError};
pub use crate::options::{ClientBuilder, Options, DEFAULT_BASE_URL};
