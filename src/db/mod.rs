/// Hosted data service layer
///
/// Thin clients over the managed Postgres service:
/// - REST query builder for collections (select/insert/update/delete, count, search)
/// - Auth REST client (sign-up, sign-in, sign-out, user lookup)

// Typed failure for every service call
pub mod error;

// Filters, ordering, limits and free-text search rendered as query strings
pub mod query;

// PostgREST-style collection client
pub mod client;

// Auth service client
pub mod auth;

pub use auth::{AuthClient, AuthUser, Session};
pub use client::DataClient;
pub use error::{DbError, DbResult};
pub use query::{Direction, FilterValue, Filters, Query, TextSearch};
