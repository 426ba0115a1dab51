//! Sign users up, verify sessions and provision missing user records.
//!
//! You're probably looking for [`Accounts`].
//!
//! # Examples
//! ```no_run
//! use mycel_auth::{accounts::{self, SignUp}, users::Role, Client};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new()?;
//!     let accounts = client.accounts();
//!
//!     let user = accounts
//!         .sign_up(&SignUp::new("grower@example.com", "hunter22", "Grower", Role::Production))
//!         .await?;
//!     println!("created {}", user.id);
//!
//!     // Resolve the user behind an incoming request.
//!     let token = accounts::bearer_token(Some("Bearer eyJhbGciOi..."));
//!     let user = accounts.require_user(token).await?;
//!     println!("{} is signed in", user.email());
//!
//!     Ok(())
//! }
//! ```
mod client;
mod model;
mod requests;
mod traits;

pub use client::Accounts;
pub use model::Verification;
pub use requests::SignUp;
pub use traits::{IdentityProvider, UserStore};

/// Extracts the session token from an `Authorization` header value.
///
/// Returns `None` unless the value uses the bearer scheme and carries a
/// token.
///
/// ```
/// use mycel_auth::accounts::bearer_token;
///
/// assert_eq!(bearer_token(Some("Bearer abc")), Some("abc"));
/// assert_eq!(bearer_token(Some("Basic abc")), None);
/// assert_eq!(bearer_token(None), None);
/// ```
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let mut parts = header?.trim().splitn(2, ' ');
    let scheme = parts.next()?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = parts.next()?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
