//! Resource List Page Component
//!
//! Generic list page for one resource: header with a create button, the
//! data table, and an inline alert with retry when the list cannot be read.

use atelier_model::{Record, ResourceKind};
use dioxus::prelude::*;

use crate::Services;
use crate::components::{DataTable, LoadErrorAlert, Spinner};
use crate::hooks::{LoadState, use_list};
use crate::state::{APP_STATE, resource_icon};

/// List page of a resource
#[component]
pub fn ResourceListPage(kind: ResourceKind) -> Element {
    let services = use_context::<Services>();
    let mut query = use_list(kind);

    let icon = resource_icon(kind);
    let title = kind.plural();
    let new_label = format!("New {}", kind.singular());
    let filter = APP_STATE.read().filter(kind);
    let page_size = services.config.page_size;
    let subject = title.to_lowercase();

    rsx! {
        div {
            class: "resource-page",

            header {
                class: "resource-page-header",
                h1 {
                    class: "resource-page-title",
                    span { "{icon}" }
                    "{title}"
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| APP_STATE.write().open_create(kind),
                    "＋ {new_label}"
                }
            }

            match query.get() {
                LoadState::Loading => rsx! {
                    Spinner { label: format!("Loading {}...", subject) }
                },
                LoadState::Failed(message) => rsx! {
                    LoadErrorAlert {
                        subject: subject.clone(),
                        message: message,
                        on_retry: move |_| query.retry(),
                    }
                },
                LoadState::Ready(rows) => rsx! {
                    DataTable {
                        kind: kind,
                        rows: rows,
                        filter: filter.clone(),
                        page_size: page_size,
                        on_filter_change: move |text: String| APP_STATE.write().set_filter(kind, text),
                        on_edit: move |record: Record| APP_STATE.write().open_edit(record),
                        on_delete: move |record: Record| APP_STATE.write().confirm_delete(record),
                    }
                },
            }
        }
    }
}
