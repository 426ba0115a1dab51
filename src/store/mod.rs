//! Read and write rows through the platform's table API.
//!
//! You're probably looking for the [`Client`].
mod client;
mod model;

pub use client::{Client, USERS_TABLE};
pub use model::Filter;
