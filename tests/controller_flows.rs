mod common;

use std::sync::Arc;
use std::time::Duration;

use bookmydoc_ui::state::{
    CHAT_FALLBACK, ChatMessage, DirectoryKind, EXAMPLE_QUERIES, GREETING, MSG_INVALID_ID,
    MSG_LOGIN_FAILED, MSG_LOGIN_FOR_DOCTOR, MSG_LOGIN_FOR_SPECIALIZATION, MSG_LOGIN_OK,
    MSG_LOGOUT_OK, MSG_SEND_FAILED, NotificationKind, NotificationPhase, Role,
};
use bookmydoc_ui::controller::UiController;
use bookmydoc_ui::storage::{FileSessionStorage, MemorySessionStorage, SessionStorage};
use common::{FakeBackend, controller_with, session};
use tokio::sync::Notify;

#[tokio::test]
async fn test_login_success_switches_to_chat_and_persists() {
    let (controller, backend, storage) = controller_with(FakeBackend::new(), MemorySessionStorage::new());

    controller.submit_login("1234567").await;

    let state = controller.snapshot().await;
    assert_eq!(state.session, Some(session("1234567")));
    assert!(!state.loading);
    assert_eq!(state.messages, vec![ChatMessage::bot(GREETING)]);
    let notification = state.notification.unwrap();
    assert_eq!(notification.kind, NotificationKind::Success);
    assert_eq!(notification.message, MSG_LOGIN_OK);

    assert_eq!(storage.load().await.unwrap().as_deref(), Some("1234567"));
    assert_eq!(backend.calls(), vec!["login:1234567"]);
}

#[tokio::test]
async fn test_login_input_is_trimmed_before_validation() {
    let (controller, backend, _storage) = controller_with(FakeBackend::new(), MemorySessionStorage::new());

    controller.submit_login("  12345678 ").await;

    assert_eq!(backend.calls(), vec!["login:12345678"]);
    assert!(controller.snapshot().await.is_logged_in());
}

#[tokio::test]
async fn test_invalid_id_never_reaches_backend() {
    let (controller, backend, storage) = controller_with(FakeBackend::new(), MemorySessionStorage::new());

    for raw in ["", "123456", "123456789", "12a4567"] {
        controller.submit_login(raw).await;
    }

    assert!(backend.calls().is_empty());
    let state = controller.snapshot().await;
    assert!(!state.is_logged_in());
    assert_eq!(state.id_input, "12a4567");
    let notification = state.notification.unwrap();
    assert_eq!(notification.kind, NotificationKind::Error);
    assert_eq!(notification.message, MSG_INVALID_ID);
    assert_eq!(storage.load().await.unwrap(), None);
}

#[tokio::test]
async fn test_login_failure_surfaces_server_message() {
    let backend = FakeBackend {
        login_error: Some(Some("Unknown ID number".into())),
        ..FakeBackend::new()
    };
    let (controller, _backend, storage) = controller_with(backend, MemorySessionStorage::new());

    controller.submit_login("1234567").await;

    let state = controller.snapshot().await;
    assert!(!state.is_logged_in());
    assert!(!state.loading);
    assert!(state.messages.is_empty());
    assert_eq!(state.notification.unwrap().message, "Unknown ID number");
    assert_eq!(storage.load().await.unwrap(), None);
}

#[tokio::test]
async fn test_login_failure_without_message_uses_generic_text() {
    let backend = FakeBackend {
        login_error: Some(None),
        ..FakeBackend::new()
    };
    let (controller, _backend, _storage) = controller_with(backend, MemorySessionStorage::new());

    controller.submit_login("1234567").await;

    assert_eq!(
        controller.snapshot().await.notification.unwrap().message,
        MSG_LOGIN_FAILED
    );
}

#[tokio::test]
async fn test_startup_restores_session_without_contacting_backend() {
    let (controller, backend, _storage) =
        controller_with(FakeBackend::new(), MemorySessionStorage::with_value("7654321"));

    controller.restore_session().await;

    let state = controller.snapshot().await;
    assert_eq!(state.session, Some(session("7654321")));
    assert_eq!(state.messages, vec![ChatMessage::bot(GREETING)]);
    assert!(state.notification.is_none());
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_startup_discards_malformed_stored_session() {
    let (controller, _backend, storage) =
        controller_with(FakeBackend::new(), MemorySessionStorage::with_value("not-an-id"));

    controller.startup().await.await.unwrap();

    let state = controller.snapshot().await;
    assert!(!state.is_logged_in());
    assert_eq!(storage.load().await.unwrap(), None);
    // The directory is still fetched.
    assert_eq!(state.directory, common::sample_directory());
}

#[tokio::test]
async fn test_startup_discards_truncated_session_file() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileSessionStorage::new(dir.path()));
    std::fs::write(storage.path(), br#"{"userId":"12"#).unwrap();
    let controller = UiController::new(Arc::new(FakeBackend::new()), Arc::clone(&storage) as _);

    controller.restore_session().await;

    assert!(!controller.snapshot().await.is_logged_in());
    assert!(!storage.path().exists());
    assert_eq!(storage.load().await.unwrap(), None);
}

#[tokio::test]
async fn test_directory_failure_leaves_lists_empty() {
    let backend = FakeBackend {
        directory: None,
        ..FakeBackend::new()
    };
    let (controller, backend, _storage) = controller_with(backend, MemorySessionStorage::new());

    controller.startup().await.await.unwrap();

    let state = controller.snapshot().await;
    assert!(state.directory.doctors.is_empty());
    assert!(state.directory.specializations.is_empty());
    assert!(state.notification.is_none());
    assert_eq!(backend.calls(), vec!["directory"]);
}

#[tokio::test]
async fn test_send_appends_user_bubble_before_reply_arrives() {
    let gate = Arc::new(Notify::new());
    let backend = FakeBackend {
        chat_gate: Some(gate.clone()),
        ..FakeBackend::new()
    };
    let (controller, _backend, _storage) =
        controller_with(backend, MemorySessionStorage::with_value("1234567"));
    controller.restore_session().await;

    let sender = controller.clone();
    let in_flight = tokio::spawn(async move { sender.send_message("Book an appointment").await });

    let mut pending = controller.snapshot().await;
    for _ in 0..100 {
        if pending.loading {
            break;
        }
        tokio::task::yield_now().await;
        pending = controller.snapshot().await;
    }
    assert!(pending.loading);
    assert_eq!(
        pending.messages.last(),
        Some(&ChatMessage::user("Book an appointment"))
    );
    assert_eq!(pending.messages.len(), 2);

    gate.notify_one();
    in_flight.await.unwrap();

    let state = controller.snapshot().await;
    assert!(!state.loading);
    assert_eq!(
        state.messages,
        vec![
            ChatMessage::bot(GREETING),
            ChatMessage::user("Book an appointment"),
            ChatMessage::bot("You said: Book an appointment"),
        ]
    );
}

#[tokio::test]
async fn test_failed_send_keeps_user_bubble_and_appends_fallback() {
    let backend = FakeBackend {
        chat_error: Some(None),
        ..FakeBackend::new()
    };
    let (controller, _backend, _storage) =
        controller_with(backend, MemorySessionStorage::with_value("1234567"));
    controller.restore_session().await;
    controller.set_draft("Cancel my appointment").await;

    controller.send_message("  Cancel my appointment  ").await;

    let state = controller.snapshot().await;
    let roles: Vec<Role> = state.messages.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::Bot, Role::User, Role::Bot]);
    assert_eq!(state.messages[1].text, "Cancel my appointment");
    assert_eq!(state.messages[2].text, CHAT_FALLBACK);
    assert!(state.draft.is_empty());
    let notification = state.notification.unwrap();
    assert_eq!(notification.kind, NotificationKind::Error);
    assert_eq!(notification.message, MSG_SEND_FAILED);
}

#[tokio::test]
async fn test_blank_messages_are_ignored() {
    let (controller, backend, _storage) =
        controller_with(FakeBackend::new(), MemorySessionStorage::with_value("1234567"));
    controller.restore_session().await;

    controller.send_message("").await;
    controller.send_message(" \t\n ").await;

    assert!(backend.calls().is_empty());
    assert_eq!(controller.snapshot().await.messages.len(), 1);
}

#[tokio::test]
async fn test_logout_resets_chat_and_restores_login_view() {
    let (controller, backend, storage) =
        controller_with(FakeBackend::new(), MemorySessionStorage::new());
    controller.submit_login("1234567").await;
    controller.send_message("Book an appointment").await;
    controller.send_message("Tomorrow at 10").await;

    controller.logout().await;

    let state = controller.snapshot().await;
    assert!(!state.is_logged_in());
    assert_eq!(state.messages, vec![ChatMessage::bot(GREETING)]);
    assert!(state.id_input.is_empty());
    assert_eq!(state.notification.unwrap().message, MSG_LOGOUT_OK);
    assert_eq!(storage.load().await.unwrap(), None);
    assert_eq!(backend.calls().last().map(String::as_str), Some("logout"));

    // Logging back in does not duplicate the greeting.
    controller.submit_login("1234567").await;
    assert_eq!(controller.snapshot().await.messages.len(), 1);
}

#[tokio::test]
async fn test_logout_failure_leaves_local_state_alone() {
    let backend = FakeBackend {
        logout_error: Some(Some("Server error: boom".into())),
        ..FakeBackend::new()
    };
    let (controller, _backend, storage) = controller_with(backend, MemorySessionStorage::new());
    controller.submit_login("1234567").await;
    controller.send_message("hello").await;

    controller.logout().await;

    let state = controller.snapshot().await;
    assert_eq!(state.session, Some(session("1234567")));
    assert_eq!(state.messages.len(), 3);
    assert_eq!(state.notification.unwrap().message, "Server error: boom");
    assert_eq!(storage.load().await.unwrap().as_deref(), Some("1234567"));
}

#[tokio::test]
async fn test_directory_click_prefills_when_logged_in() {
    let (controller, _backend, _storage) =
        controller_with(FakeBackend::new(), MemorySessionStorage::with_value("1234567"));
    controller.startup().await.await.unwrap();

    controller
        .select_directory_entry(DirectoryKind::Doctor, 1)
        .await;
    assert_eq!(
        controller.snapshot().await.draft,
        "Is Dr. Emily Johnson available tomorrow?"
    );

    controller
        .select_directory_entry(DirectoryKind::Specialization, 0)
        .await;
    assert_eq!(
        controller.snapshot().await.draft,
        "Show me available general dentists for tomorrow"
    );

    // Unknown entries change nothing.
    controller
        .select_directory_entry(DirectoryKind::Doctor, 99)
        .await;
    assert_eq!(
        controller.snapshot().await.draft,
        "Show me available general dentists for tomorrow"
    );
}

#[tokio::test]
async fn test_directory_click_prompts_login_when_logged_out() {
    let (controller, _backend, _storage) =
        controller_with(FakeBackend::new(), MemorySessionStorage::new());
    controller.startup().await.await.unwrap();

    controller
        .select_directory_entry(DirectoryKind::Doctor, 0)
        .await;
    let state = controller.snapshot().await;
    assert!(state.draft.is_empty());
    let notification = state.notification.unwrap();
    assert_eq!(notification.kind, NotificationKind::Info);
    assert_eq!(notification.message, MSG_LOGIN_FOR_DOCTOR);

    controller
        .select_directory_entry(DirectoryKind::Specialization, 1)
        .await;
    assert_eq!(
        controller.snapshot().await.notification.unwrap().message,
        MSG_LOGIN_FOR_SPECIALIZATION
    );
}

#[tokio::test]
async fn test_example_queries_fill_draft_and_close_dialog() {
    let (controller, _backend, _storage) =
        controller_with(FakeBackend::new(), MemorySessionStorage::new());

    controller.open_examples().await;
    assert!(controller.snapshot().await.examples_open);

    controller.choose_example(2).await;
    let state = controller.snapshot().await;
    assert!(!state.examples_open);
    assert_eq!(state.draft, EXAMPLE_QUERIES[2]);

    controller.open_examples().await;
    controller.close_examples().await;
    assert!(!controller.snapshot().await.examples_open);
}

#[tokio::test(start_paused = true)]
async fn test_notification_fades_then_disappears() {
    let (controller, _backend, _storage) =
        controller_with(FakeBackend::new(), MemorySessionStorage::new());

    controller.notify(NotificationKind::Info, "hello").await;
    assert_eq!(
        controller.snapshot().await.notification.unwrap().phase,
        NotificationPhase::Visible
    );

    tokio::time::sleep(Duration::from_millis(3001)).await;
    assert_eq!(
        controller.snapshot().await.notification.unwrap().phase,
        NotificationPhase::Fading
    );

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(controller.snapshot().await.notification.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_newer_notification_replaces_and_outlives_older_timer() {
    let (controller, _backend, _storage) =
        controller_with(FakeBackend::new(), MemorySessionStorage::new());

    controller.notify(NotificationKind::Info, "first").await;
    tokio::time::sleep(Duration::from_millis(2000)).await;
    controller.notify(NotificationKind::Error, "second").await;

    // The first banner's timers fire now and must not touch the second one.
    tokio::time::sleep(Duration::from_millis(1400)).await;
    let current = controller.snapshot().await.notification.unwrap();
    assert_eq!(current.message, "second");
    assert_eq!(current.phase, NotificationPhase::Visible);

    tokio::time::sleep(Duration::from_millis(1601)).await;
    assert_eq!(
        controller.snapshot().await.notification.unwrap().phase,
        NotificationPhase::Fading
    );
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(controller.snapshot().await.notification.is_none());
}
