//! # Side Sheet Component
//!
//! Panel sliding in from the right over a dimmed backdrop, used for the
//! create/edit forms.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct SideSheetProps {
    pub title: String,

    #[props(default)]
    pub description: Option<String>,

    /// Called on backdrop click, the close button or Escape
    pub on_close: EventHandler<()>,

    pub children: Element,
}

/// Right-hand side sheet
#[component]
pub fn SideSheet(props: SideSheetProps) -> Element {
    let on_close = props.on_close;

    rsx! {
        div {
            class: "sheet-overlay",
            onkeydown: move |e| {
                if e.key() == Key::Escape {
                    on_close.call(());
                }
            },

            // Backdrop
            div {
                class: "sheet-backdrop",
                onclick: move |_| on_close.call(()),
            }

            aside {
                class: "sheet",
                role: "dialog",
                aria_modal: "true",
                aria_labelledby: "sheet-title",
                onclick: move |e| e.stop_propagation(),

                header {
                    class: "sheet-header",
                    div {
                        h2 { id: "sheet-title", class: "sheet-title", "{props.title}" }
                        if let Some(description) = &props.description {
                            p { class: "sheet-description", "{description}" }
                        }
                    }
                    button {
                        class: "btn btn-icon",
                        r#type: "button",
                        title: "Close",
                        onclick: move |_| on_close.call(()),
                        "✕"
                    }
                }

                div {
                    class: "sheet-body",
                    {props.children}
                }
            }
        }
    }
}
