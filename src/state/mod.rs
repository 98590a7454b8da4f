//! Client-side application state.
//!
//! DESIGN
//! ======
//! `query` holds the plain data types; `store` owns the one mutable
//! aggregate and the named transitions over it. Network and timer logic
//! live elsewhere so every transition here is synchronous and infallible.

pub mod query;
pub mod store;

pub use query::{AiResponse, AiResponsePatch, DashboardState, HistoryEntry, QueryResults};
pub use store::{QueryStore, SubscriptionId};
