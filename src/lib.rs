/// RegTime: project dashboard backend
///
/// This library provides the HTTP API behind the RegTime dashboard. Every endpoint is a thin
/// binding to a hosted Postgres service reached through its REST and auth interfaces.

// Core configuration and setup
pub mod config;

// Hosted data service layer - REST query builder and auth client
pub mod db;

// Project, unit and task records and their storage
pub mod project;

// Properties, time entries and users
pub mod records;

// Dashboard summary figures
pub mod dashboard;

// Contact form embed - validation and once-only script loading
pub mod forms;

// HTTP API layer - REST endpoints for the dashboard
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use db::{AuthClient, DataClient, DbError, Filters, Query};
pub use project::{Project, ProjectStorage};
pub use server::start_server;
