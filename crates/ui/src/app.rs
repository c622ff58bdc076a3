//! Main Application Component for Atelier
//!
//! Root Dioxus component: navigation sidebar, the active page, the
//! create/edit sheet, the delete confirmation, toasts and the status bar.

use atelier_model::ResourceKind;
use dioxus::prelude::*;

use crate::components::{ConfirmDeleteDialog, ResourceForm, SideSheet, ToastStack};
use crate::pages::{HomePage, ResourceListPage};
use crate::state::{APP_STATE, Page};
use crate::{NAME, Services, VERSION};

// ============================================================================
// Main App Component
// ============================================================================

/// Root application component
#[component]
pub fn App() -> Element {
    use_effect(|| {
        tracing::info!("Atelier UI initialized");
    });

    rsx! {
        div {
            class: "app-container",

            div {
                class: "app-body",

                // Left Sidebar (navigation)
                Sidebar {}

                // Main Content Area
                MainContent {}
            }

            // Status Bar
            StatusBar {}

            // Overlays
            SheetOverlay {}
            DialogOverlay {}
            ToastStack {}
        }
    }
}

// ============================================================================
// Sidebar Component
// ============================================================================

/// Left sidebar with navigation
#[component]
fn Sidebar() -> Element {
    let state = APP_STATE.read();
    let collapsed = state.sidebar_collapsed;
    let current_page = state.active_page;
    drop(state);

    rsx! {
        aside {
            class: if collapsed { "sidebar sidebar--collapsed" } else { "sidebar" },

            // Header with toggle button
            div {
                class: "sidebar-header",

                if !collapsed {
                    span { class: "sidebar-brand", "🏭 {NAME}" }
                }

                button {
                    class: "btn btn-icon",
                    r#type: "button",
                    title: if collapsed { "Expand sidebar" } else { "Collapse sidebar" },
                    onclick: move |_| APP_STATE.write().toggle_sidebar(),
                    if collapsed { "☰" } else { "✕" }
                }
            }

            // Navigation items
            nav {
                class: "sidebar-nav",

                SidebarItem {
                    page: Page::Home,
                    current: current_page,
                    collapsed: collapsed,
                }

                div { class: "sidebar-divider" }

                for kind in ResourceKind::ALL {
                    SidebarItem {
                        key: "{kind}",
                        page: Page::Resource(kind),
                        current: current_page,
                        collapsed: collapsed,
                    }
                }
            }
        }
    }
}

/// Sidebar navigation item
#[component]
fn SidebarItem(page: Page, current: Page, collapsed: bool) -> Element {
    let icon = page.icon();
    let name = page.display_name();
    let class = item_class(page == current);

    rsx! {
        button {
            class: "{class}",
            r#type: "button",
            title: "{name}",
            aria_current: if page == current { "page" } else { "false" },
            onclick: move |_| APP_STATE.write().navigate(page),
            span { class: "sidebar-item-icon", "{icon}" }
            if !collapsed {
                span { class: "sidebar-item-label", "{name}" }
            }
        }
    }
}

fn item_class(is_active: bool) -> &'static str {
    if is_active {
        "sidebar-item sidebar-item--active"
    } else {
        "sidebar-item"
    }
}

// ============================================================================
// Main Content Component
// ============================================================================

/// Main content area that renders the active page
#[component]
fn MainContent() -> Element {
    let current_page = APP_STATE.read().active_page;

    rsx! {
        main {
            class: "main-content",

            match current_page {
                Page::Home => rsx! { HomePage {} },
                // Keyed so each resource gets fresh table state
                Page::Resource(kind) => rsx! { ResourceListPage { key: "{kind}", kind: kind } },
            }
        }
    }
}

// ============================================================================
// Status Bar Component
// ============================================================================

/// Bottom status bar
#[component]
fn StatusBar() -> Element {
    let services = use_context::<Services>();
    let api_url = services.config.base_url().to_string();
    let page_name = APP_STATE.read().active_page.display_name();

    rsx! {
        footer {
            class: "status-bar",

            span { "{page_name}" }

            // Spacer
            div { class: "status-bar-spacer" }

            span { class: "status-bar-api", title: "API base URL", "🔗 {api_url}" }
            span { "v{VERSION}" }
        }
    }
}

// ============================================================================
// Overlays
// ============================================================================

/// Create/edit side sheet
#[component]
fn SheetOverlay() -> Element {
    let sheet = APP_STATE.read().sheet.clone();

    let Some(sheet) = sheet else {
        return rsx! {};
    };

    let title = sheet.title();
    let description = "Fields marked * are required.".to_string();

    rsx! {
        SideSheet {
            title: title,
            description: description,
            on_close: move |_| APP_STATE.write().close_sheet(),

            ResourceForm { sheet: sheet }
        }
    }
}

/// Modal delete confirmation
#[component]
fn DialogOverlay() -> Element {
    let pending = APP_STATE.read().pending_delete.clone();

    let Some(record) = pending else {
        return rsx! {};
    };

    rsx! {
        div {
            class: "dialog-overlay",

            // Backdrop
            div {
                class: "dialog-backdrop",
                onclick: move |_| APP_STATE.write().cancel_delete(),
            }

            div {
                class: "dialog-container",
                onclick: move |e| e.stop_propagation(),

                ConfirmDeleteDialog { record: record }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
