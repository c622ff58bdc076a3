//! # Confirm Delete Dialog Component
//!
//! Asks before deleting a record. On failure the dialog stays open and the
//! server's message is shown as a toast.

use atelier_model::Record;
use dioxus::prelude::*;

use crate::Services;
use crate::state::{APP_STATE, ToastLevel, bump_revision, notify};

// ============================================================================
// Component Props
// ============================================================================

#[derive(Props, Clone, PartialEq)]
pub struct ConfirmDeleteDialogProps {
    /// The record to delete
    pub record: Record,
}

// ============================================================================
// Main Component
// ============================================================================

/// Confirmation dialog for record deletion
#[component]
pub fn ConfirmDeleteDialog(props: ConfirmDeleteDialogProps) -> Element {
    let services = use_context::<Services>();
    let mut is_deleting = use_signal(|| false);

    let kind = props.record.kind();
    let key = props.record.key().to_string();
    let title = format!("Delete {}", kind.singular());
    let message = delete_message(&props.record);
    let item_name = props.record.option_label();

    let handle_delete = move |_| {
        if *is_deleting.read() {
            return;
        }
        is_deleting.set(true);

        let crud = services.crud.clone();
        let key = key.clone();
        spawn(async move {
            match crud.delete(kind, &key).await {
                Ok(()) => {
                    APP_STATE.write().cancel_delete();
                    bump_revision(kind);
                    notify(format!("{} {} deleted", kind.singular(), key), ToastLevel::Success);
                }
                Err(err) => {
                    tracing::error!(resource = %kind, key = %key, error = %err, "Delete failed");
                    notify(err.user_message(), ToastLevel::Error);
                }
            }
            is_deleting.set(false);
        });
    };

    let deleting = *is_deleting.read();

    rsx! {
        div {
            class: "dialog confirm-delete-dialog",
            role: "alertdialog",
            aria_labelledby: "confirm-delete-title",

            div {
                class: "dialog-header",
                span { class: "dialog-icon dialog-icon--danger", "⚠️" }
                div {
                    h2 {
                        id: "confirm-delete-title",
                        class: "dialog-title dialog-title--danger",
                        "{title}"
                    }
                    p { class: "dialog-message", "{message}" }
                }
            }

            div {
                class: "dialog-item",
                span { class: "dialog-item-label", "Item:" }
                span { class: "dialog-item-name", "{item_name}" }
            }

            div {
                class: "dialog-actions",

                button {
                    r#type: "button",
                    class: "btn btn-secondary",
                    disabled: deleting,
                    onclick: move |_| APP_STATE.write().cancel_delete(),
                    "Cancel"
                }

                button {
                    r#type: "button",
                    class: "btn btn-danger",
                    disabled: deleting,
                    onclick: handle_delete,

                    if deleting {
                        span { class: "spinner", "⏳" }
                        "Deleting..."
                    } else {
                        span { "🗑️" }
                        "Delete"
                    }
                }
            }
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Confirmation text for a record
pub fn delete_message(record: &Record) -> String {
    format!(
        "Are you sure you want to delete {} \"{}\"? This action cannot be undone.",
        record.kind().singular().to_lowercase(),
        record.key()
    )
}

// ============================================================================
// Tests
// ============================================================================
