//! Create, delete and validate identities with the platform's auth API.
//!
//! You're probably looking for the [`Client`].
//!
//! # Examples
//! ```no_run
//! use mycel_auth::{identity::{Metadata, NewIdentity}, Client, Error};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let client = Client::new()?;
//!
//!     let identity = client
//!         .identity()
//!         .create_user(&NewIdentity::confirmed(
//!             "grower@example.com",
//!             "hunter22",
//!             Metadata::default(),
//!         ))
//!         .await?;
//!
//!     client.identity().delete_user(&identity.id).await?;
//!
//!     Ok(())
//! }
//! ```
mod client;
mod model;

pub use client::Client;
pub use model::{Identity, Metadata, NewIdentity};
