//! BookMyDocAI UI controller
//!
//! A client-local, HTML-first front end for the BookMyDocAI appointment
//! assistant. The browser talks to this process; this process keeps the UI
//! state, calls the appointment backend, and answers with server-rendered
//! fragments that htmx swaps into the page.
//!
//! # Architecture
//!
//! - **State**: pure reducer over an explicit [`state::UiState`]
//! - **Controller**: user actions, backend calls, notification timers
//! - **Rendering**: HTML regions drawn from state snapshots
//! - **Server**: Axum routes for htmx form posts and live polling
//!
//! # Modules
//!
//! - [`backend`]: backend API trait and HTTP client
//! - [`config`]: CLI, file and environment configuration
//! - [`controller`]: the UI controller
//! - [`error`]: error types
//! - [`render`]: HTML rendering
//! - [`server`]: HTTP surface for the browser
//! - [`state`]: session id, chat log, directory, notifications
//! - [`storage`]: persisted session identifier

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod render;
pub mod server;
pub mod state;
pub mod storage;

use std::sync::Arc;

use controller::UiController;
use render::PageOptions;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// UI controller owning the state snapshot.
    pub controller: UiController,
    /// Page-level rendering settings.
    pub page: Arc<PageOptions>,
}
