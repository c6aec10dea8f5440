//! HTML regions for a [`UiState`] snapshot.
//!
//! Every region is a pure function of the snapshot. Action routes return
//! [`render_app_update`]; the live poller receives [`render_live`], whose
//! regions carry `hx-swap-oob` so htmx replaces them in place. The poller
//! sends back the state version it last saw and gets nothing when that
//! version is still current.

use super::text::{directory_label, escape_html, format_message};
use crate::state::{
    ChatMessage, DirectoryKind, EXAMPLE_QUERIES, NotificationPhase, Role, UiState,
};

/// Page-level settings that do not live in [`UiState`].
#[derive(Debug, Clone)]
pub struct PageOptions {
    /// Where the browser loads htmx from.
    pub htmx_src: String,
    /// Live region refresh interval.
    pub poll_interval_ms: u64,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            htmx_src: "https://unpkg.com/htmx.org@2.0.8".to_string(),
            poll_interval_ms: 500,
        }
    }
}

/// Full HTML document.
pub fn render_page(state: &UiState, options: &PageOptions) -> String {
    let app = render_app(state);
    let poller = render_poller(state, options, false);
    let htmx_src = escape_html(&options.htmx_src);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Book, cancel and reschedule doctor appointments">
    <title>BookMyDocAI</title>
    <script src="{htmx_src}"></script>
    <style>{STYLES}</style>
    <script>{PIN_CHAT_SCRIPT}</script>
</head>
<body>
    <div id="app">{app}</div>
    {poller}
</body>
</html>"#
    )
}

/// Contents of `#app`.
pub fn render_app(state: &UiState) -> String {
    let auth = render_auth(state);
    let directory = render_directory(state);
    let main = render_main(state);
    let status = render_status(state);
    let modal = render_examples_modal(state);
    format!(
        r#"
    <header class="app-header">
        <h1 class="brand">BookMyDocAI</h1>
        {auth}
    </header>
    <div class="layout">
        {directory}
        {main}
    </div>
    {status}
    {modal}
"#
    )
}

/// Response body for action routes: `#app` plus the poller at the new version.
pub fn render_app_update(state: &UiState, options: &PageOptions) -> String {
    let app = render_app(state);
    let poller = render_poller(state, options, true);
    format!("{app}\n{poller}")
}

/// Out-of-band fragments refreshed by the live poller.
pub fn render_live(state: &UiState, options: &PageOptions) -> String {
    let directory = render_directory_with(state, true);
    let messages = render_chat_messages(&state.messages, true);
    let status = render_status_with(state, true);
    let poller = render_poller(state, options, true);
    format!("{directory}\n{messages}\n{status}\n{poller}")
}

/// Polls `/ui/live`, reporting the state version already on screen.
pub fn render_poller(state: &UiState, options: &PageOptions, out_of_band: bool) -> String {
    let version = state.version();
    let poll = options.poll_interval_ms;
    let oob = oob(out_of_band);
    format!(
        r#"<div id="live-poller" hx-get="/ui/live?since={version}" hx-trigger="every {poll}ms" hx-swap="none"{oob}></div>"#
    )
}

fn hidden(is_hidden: bool) -> &'static str {
    if is_hidden { " hidden" } else { "" }
}

fn oob(enabled: bool) -> &'static str {
    if enabled { r#" hx-swap-oob="true""# } else { "" }
}

/// Login form while logged out, user badge and logout button while logged in.
fn render_auth(state: &UiState) -> String {
    match &state.session {
        Some(id) => {
            let id = escape_html(id.as_str());
            format!(
                r##"<div id="user-area" class="user-area">
            <span id="user-id">ID: {id}</span>
            <button id="logout-btn" type="button" hx-post="/ui/logout" hx-target="#app">Logout</button>
        </div>"##
            )
        }
        None => {
            let value = escape_html(&state.id_input);
            format!(
                r##"<form id="login-area" class="login-area" hx-post="/ui/login" hx-target="#app">
            <input id="id-input" name="id_number" type="text" inputmode="numeric" autocomplete="off" placeholder="Enter your 7-8 digit ID" value="{value}">
            <button id="login-btn" type="submit">Login</button>
        </form>"##
            )
        }
    }
}

fn render_directory(state: &UiState) -> String {
    render_directory_with(state, false)
}

fn render_directory_with(state: &UiState, out_of_band: bool) -> String {
    let doctors = render_directory_items(DirectoryKind::Doctor, &state.directory.doctors);
    let specializations = render_directory_items(
        DirectoryKind::Specialization,
        &state.directory.specializations,
    );
    let oob = oob(out_of_band);
    format!(
        r#"<aside id="directory" class="sidebar"{oob}>
            <h3>Doctors</h3>
            <div id="doctor-list">{doctors}</div>
            <h3>Specializations</h3>
            <div id="specialization-list">{specializations}</div>
        </aside>"#
    )
}

fn render_directory_items(kind: DirectoryKind, entries: &[String]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let label = escape_html(&directory_label(kind, entry));
            format!(
                r##"<div class="{kind}-item" hx-post="/ui/directory/{kind}/{index}" hx-target="#app"><span>{label}</span></div>"##
            )
        })
        .collect()
}

/// Welcome panel while logged out, chat panel while logged in.
fn render_main(state: &UiState) -> String {
    let logged_in = state.is_logged_in();
    let welcome_hidden = hidden(logged_in);
    let chat_hidden = hidden(!logged_in);
    let messages = render_chat_messages(&state.messages, false);
    let draft = escape_html(&state.draft);
    format!(
        r##"<main class="main">
            <section id="welcome-area" class="welcome-area{welcome_hidden}">
                <h2>Welcome to BookMyDocAI</h2>
                <p>Log in with your ID number to book, cancel, or reschedule appointments and check doctor availability.</p>
            </section>
            <section id="chat-area" class="chat-area{chat_hidden}">
                <button class="help-button" type="button" hx-post="/ui/examples/open" hx-target="#app">Example Queries</button>
                {messages}
                <form class="message-form" hx-post="/ui/chat" hx-target="#app">
                    <input id="message-input" name="message" type="text" autocomplete="off" placeholder="Type your message..." value="{draft}"
                        hx-post="/ui/draft" hx-trigger="keyup changed delay:300ms" hx-swap="none">
                    <button id="send-btn" type="submit">Send</button>
                </form>
            </section>
        </main>"##
    )
}

fn render_chat_messages(messages: &[ChatMessage], out_of_band: bool) -> String {
    let bubbles: String = messages.iter().map(render_message).collect();
    let oob = oob(out_of_band);
    format!(r#"<div id="chat-messages" class="chat-messages"{oob}>{bubbles}</div>"#)
}

/// One chat bubble. User text is escaped; bot text also keeps its line breaks.
pub fn render_message(message: &ChatMessage) -> String {
    let body = match message.role {
        Role::User => escape_html(&message.text),
        Role::Bot => format_message(&message.text),
    };
    let role = message.role.as_str();
    format!(
        r#"<div class="message {role}"><div class="message-content"><p>{body}</p></div></div>"#
    )
}

fn render_status(state: &UiState) -> String {
    render_status_with(state, false)
}

/// Loading indicator and the notification banner.
fn render_status_with(state: &UiState, out_of_band: bool) -> String {
    let loading_hidden = hidden(!state.loading);
    // The banner element is always present under a fixed id so htmx settles
    // class changes on it and the opacity transition runs.
    let notification = match &state.notification {
        Some(n) => {
            let show = if n.phase == NotificationPhase::Visible {
                " show"
            } else {
                ""
            };
            format!(
                r#"<div id="notification" class="notification {kind}{show}" role="status">{message}</div>"#,
                kind = n.kind,
                message = escape_html(&n.message),
            )
        }
        None => r#"<div id="notification" class="notification" role="status"></div>"#.to_owned(),
    };
    let oob = oob(out_of_band);
    format!(
        r#"<div id="status-region"{oob}>
        <div id="loading-indicator" class="loading{loading_hidden}"><div class="spinner"></div></div>
        {notification}
    </div>"#
    )
}

fn render_examples_modal(state: &UiState) -> String {
    let show = if state.examples_open { " show" } else { "" };
    let items: String = EXAMPLE_QUERIES
        .iter()
        .enumerate()
        .map(|(index, query)| {
            let query = escape_html(query);
            format!(
                r##"<li class="query-item" hx-post="/ui/examples/{index}" hx-target="#app">{query}</li>"##
            )
        })
        .collect();
    format!(
        r##"<div id="example-modal" class="modal{show}">
        <div class="modal-content">
            <button class="close" type="button" hx-post="/ui/examples/close" hx-target="#app">&times;</button>
            <h3>Example Queries</h3>
            <ul>{items}</ul>
        </div>
    </div>"##
    )
}

/// Keeps the newest bubble in view after the chat log is swapped in.
const PIN_CHAT_SCRIPT: &str = r#"
function pinChatToBottom() {
    var log = document.getElementById("chat-messages");
    if (log) { log.scrollTop = log.scrollHeight; }
}
document.addEventListener("htmx:afterSwap", pinChatToBottom);
document.addEventListener("htmx:oobAfterSwap", pinChatToBottom);
"#;

const STYLES: &str = r"
body { font-family: system-ui, sans-serif; margin: 0; background: #f4f7fb; color: #1f2933; }
.hidden { display: none !important; }
.app-header { display: flex; justify-content: space-between; align-items: center; padding: 0.75rem 1.5rem; background: #1d4ed8; color: #fff; }
.brand { font-size: 1.25rem; margin: 0; }
.login-area, .user-area { display: flex; gap: 0.5rem; align-items: center; }
.layout { display: flex; gap: 1rem; padding: 1rem 1.5rem; }
.sidebar { width: 16rem; flex-shrink: 0; }
.doctor-item, .specialization-item { padding: 0.4rem 0.6rem; border-radius: 0.4rem; cursor: pointer; }
.doctor-item:hover, .specialization-item:hover { background: #e0e7ff; }
.main { flex: 1; }
.chat-area { position: relative; background: #fff; border-radius: 0.75rem; padding: 1rem; }
.help-button { position: absolute; top: 10px; right: 10px; }
.chat-messages { height: 60vh; overflow-y: auto; display: flex; flex-direction: column; gap: 0.5rem; padding-top: 2.5rem; }
.message { display: flex; }
.message.user { justify-content: flex-end; }
.message-content { max-width: 70%; padding: 0.5rem 0.75rem; border-radius: 0.75rem; background: #e5e7eb; }
.message.user .message-content { background: #1d4ed8; color: #fff; }
.message-form { display: flex; gap: 0.5rem; margin-top: 0.75rem; }
.message-form input { flex: 1; }
.loading { position: fixed; bottom: 1rem; left: 1rem; }
.spinner { width: 1.5rem; height: 1.5rem; border: 3px solid #c7d2fe; border-top-color: #1d4ed8; border-radius: 50%; animation: spin 1s linear infinite; }
@keyframes spin { to { transform: rotate(360deg); } }
.notification { position: fixed; top: 1rem; right: 1rem; padding: 0.75rem 1rem; border-radius: 0.5rem; color: #fff; opacity: 0; transition: opacity 0.3s; }
.notification.show { opacity: 1; }
.notification.success { background: #15803d; }
.notification.error { background: #b91c1c; }
.notification.info { background: #1d4ed8; }
.modal { display: none; position: fixed; inset: 0; background: rgba(0, 0, 0, 0.4); }
.modal.show { display: flex; align-items: center; justify-content: center; }
.modal-content { background: #fff; padding: 1.5rem; border-radius: 0.75rem; max-width: 32rem; position: relative; }
.close { position: absolute; top: 0.5rem; right: 0.75rem; }
.query-item { cursor: pointer; padding: 0.3rem 0; }
";
