//! Front end for a market-intelligence search agent: a typed HTTP client
//! for the agent service, an HTML renderer for its analysis dialect, the
//! session state machine behind the web UI, and the pieces wiring those
//! into an axum server and a CLI.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod formatter;
pub mod lifecycle;
pub mod models;
pub mod poller;
pub mod suggest;
