//! HTML rendering of UI state snapshots.
//!
//! - [`text`]: escaping and display formatting
//! - [`page`]: the document shell and its htmx-driven regions

pub mod page;
pub mod text;

pub use page::{
    PageOptions, render_app, render_app_update, render_live, render_message, render_page,
    render_poller,
};
pub use text::{capitalize_words, escape_html, format_message, format_specialization};
