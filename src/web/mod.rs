//! Web server module (Axum + API).

use std::sync::Arc;

use crate::memo::MemoStore;

pub mod api;
pub mod router;
pub mod server;

/// Shared router state: the one store every handler talks to.
pub type AppState = Arc<MemoStore>;

pub use router::create_app_router;
pub use server::{run_server, WebServerConfig};
