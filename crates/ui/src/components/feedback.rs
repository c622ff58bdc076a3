//! # Feedback Components
//!
//! - **LoadErrorAlert**: inline alert for a failed read, with a retry button
//! - **ToastStack**: transient notifications for mutation outcomes
//! - **Spinner**: loading placeholder

use dioxus::prelude::*;

use crate::state::{APP_STATE, ToastLevel};

// ============================================================================
// Load Error Alert
// ============================================================================

#[derive(Props, Clone, PartialEq)]
pub struct LoadErrorAlertProps {
    /// What failed to load, e.g. "machines"
    pub subject: String,

    /// User-facing error message
    pub message: String,

    pub on_retry: EventHandler<()>,
}

/// Inline alert shown when a read fails; the page stays usable
#[component]
pub fn LoadErrorAlert(props: LoadErrorAlertProps) -> Element {
    let on_retry = props.on_retry;

    rsx! {
        div {
            class: "alert alert--error",
            role: "alert",

            span { class: "alert-icon", "❌" }
            div {
                class: "alert-body",
                p { class: "alert-title", "Could not load {props.subject}" }
                p { class: "alert-message", "{props.message}" }
            }
            button {
                class: "btn btn-secondary",
                r#type: "button",
                onclick: move |_| on_retry.call(()),
                "Retry"
            }
        }
    }
}

// ============================================================================
// Toasts
// ============================================================================

/// Stack of active toasts, newest at the bottom
#[component]
pub fn ToastStack() -> Element {
    let toasts = APP_STATE.read().toasts.clone();

    rsx! {
        div {
            class: "toast-stack",
            aria_live: "polite",

            for toast in toasts {
                div {
                    key: "{toast.id}",
                    class: match toast.level {
                        ToastLevel::Success => "toast toast--success",
                        ToastLevel::Error => "toast toast--error",
                    },
                    role: if toast.level == ToastLevel::Error { "alert" } else { "status" },

                    span {
                        class: "toast-icon",
                        match toast.level {
                            ToastLevel::Success => "✓",
                            ToastLevel::Error => "⚠",
                        }
                    }
                    span { class: "toast-text", "{toast.text}" }
                    button {
                        class: "toast-close",
                        r#type: "button",
                        title: "Dismiss",
                        onclick: move |_| APP_STATE.write().dismiss_toast(toast.id),
                        "✕"
                    }
                }
            }
        }
    }
}

// ============================================================================
// Spinner
// ============================================================================

#[component]
pub fn Spinner(#[props(default = "Loading...".to_string())] label: String) -> Element {
    rsx! {
        div {
            class: "loading",
            role: "status",
            span { class: "spinner", "⏳" }
            span { "{label}" }
        }
    }
}
