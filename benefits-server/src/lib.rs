//! # benefits-server
//!
//! HTTP surface of the benefits assistant:
//!
//! - `POST /chat` with `{"query": "..."}` answers with `{"answer", "sources"}`.
//! - `GET /health` reports liveness and the corpus size.
//!
//! The `benefits-server` binary wires configuration, logging, the corpus and
//! the external clients together; [`app_router`] is usable on its own.

pub mod config;
pub mod server;
pub mod telemetry;

pub use config::ServerConfig;
pub use server::{AppState, app_router, build_state, run_server};
