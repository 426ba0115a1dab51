//! Account provisioning on top of a hosted auth and table API.
//!
//! If you're just getting started, take a look at the [`Client`] and
//! [`accounts::Accounts`].
//!
//! # Examples
//! ```no_run
//! use mycel_auth::{accounts::Verification, Client, Error};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     // Reads MYCEL_URL and MYCEL_SERVICE_KEY.
//!     let client = Client::new()?;
//!     let accounts = client.accounts();
//!
//!     match accounts.verify(Some("session-token")).await {
//!         Verification::Authenticated(user) if user.is_degraded() => {
//!             println!("{} is signed in, but has no user record yet", user.email());
//!         }
//!         Verification::Authenticated(user) => println!("{} is signed in", user.email()),
//!         Verification::Unauthenticated => println!("nobody is signed in"),
//!     }
//!
//!     Ok(())
//! }
//! ```
pub mod client;
pub mod error;
mod http;
mod serde;

pub mod accounts;
pub mod identity;
pub mod store;
pub mod users;

pub use client::Client;
pub use error::Error;

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;

#[cfg(all(feature = "default-tls", feature = "native-tls"))]
compile_error!("Feature \"default-tls\" and \"native-tls\" cannot be enabled at the same time");

#[cfg(all(feature = "native-tls", feature = "rustls-tls"))]
compile_error!("Feature \"native-tls\" and \"rustls-tls\" cannot be enabled at the same time");

#[cfg(all(feature = "rustls-tls", feature = "default-tls"))]
compile_error!("Feature \"rustls-tls\" and \"default-tls\" cannot be enabled at the same time");
