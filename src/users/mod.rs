//! Application user records and the views derived from them.
mod model;

pub use model::{MinimalUser, ResolvedUser, Role, UnknownRole, UserRecord, UserSummary};
