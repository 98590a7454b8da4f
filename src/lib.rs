//! Client core for a natural-language analytics backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! A user types a question, `net` streams the backend's answer over SSE,
//! and each event lands in the `state` store that front ends render from.
//! `dashboard` binds the two together as user actions; `export` and
//! `render` are read-only views over the store.

pub mod config;
pub mod dashboard;
pub mod export;
pub mod net;
pub mod render;
pub mod state;

pub use config::DashboardConfig;
pub use dashboard::{Dashboard, SubmitStatus};
pub use net::{AnalyticsBackend, QueryClient};
pub use state::{DashboardState, QueryStore};
