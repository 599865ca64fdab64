//! Monitoring dashboard for a fleet of surveillance cameras grouped by model.
//!
//! Reads camera and model records from the fleet backend, reduces them into
//! summary figures, and redraws a marker map and bar charts from every snapshot.
//! Administrative writes go through [`admin::AdminController`] and end in a refetch.

pub mod admin;
pub mod aggregate;
pub mod api;
pub mod chart;
pub mod dashboard;
pub mod errors;
pub mod fetch;
pub mod map;
pub mod metrics;
pub mod model;
pub mod server;
pub mod session;
pub mod terminal;
pub mod view;

pub use api::ApiClient;
pub use dashboard::Dashboard;
pub use errors::{Error, Result};
pub use fetch::Scope;
