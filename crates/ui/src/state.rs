//! Application State Management for Atelier
//!
//! UI state lives in Dioxus 0.7 global signals: navigation, the create/edit
//! sheet, the delete confirmation, toast notifications and per-resource
//! revision counters used to re-read lists after a mutation.

use atelier_model::{Record, ResourceKind};
use dioxus::prelude::*;
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

/// How long a toast stays on screen
pub const TOAST_DURATION: Duration = Duration::from_secs(4);

// ============================================================================
// Page Navigation
// ============================================================================

/// Application pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    /// Overview of every resource
    #[default]
    Home,
    /// List page of one resource
    Resource(ResourceKind),
}

impl Page {
    /// Get the display name for this page
    pub fn display_name(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Resource(kind) => kind.plural(),
        }
    }

    /// Get the icon for this page
    pub fn icon(&self) -> &'static str {
        match self {
            Page::Home => "🏠",
            Page::Resource(kind) => resource_icon(*kind),
        }
    }

    pub fn resource(&self) -> Option<ResourceKind> {
        match self {
            Page::Home => None,
            Page::Resource(kind) => Some(*kind),
        }
    }
}

/// Sidebar icon of a resource
pub fn resource_icon(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Client => "🏢",
        ResourceKind::Operator => "👷",
        ResourceKind::Machine => "⚙️",
        ResourceKind::WorkOrder => "📋",
        ResourceKind::Production => "🏭",
        ResourceKind::Repair => "🔧",
        ResourceKind::Defect => "⚠️",
        ResourceKind::Cause => "🔍",
        ResourceKind::Material => "📦",
        ResourceKind::Consumption => "📉",
        ResourceKind::QualityCheck => "✅",
    }
}

// ============================================================================
// Sheet & Dialog
// ============================================================================

/// What the side sheet is editing
#[derive(Debug, Clone, PartialEq)]
pub enum SheetMode {
    Create,
    Edit(Record),
}

/// Open create/edit side sheet
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub kind: ResourceKind,
    pub mode: SheetMode,
}

impl Sheet {
    pub fn title(&self) -> String {
        match &self.mode {
            SheetMode::Create => format!("New {}", self.kind.singular()),
            SheetMode::Edit(record) => format!("Edit {} {}", self.kind.singular(), record.key()),
        }
    }
}

// ============================================================================
// Toasts
// ============================================================================

/// Toast severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

/// Transient notification
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub text: String,
    pub level: ToastLevel,
}

// ============================================================================
// UI State
// ============================================================================

/// General UI state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UiState {
    /// Currently active page
    pub active_page: Page,
    /// Whether the sidebar is collapsed
    pub sidebar_collapsed: bool,
    /// Open create/edit sheet
    pub sheet: Option<Sheet>,
    /// Record awaiting delete confirmation
    pub pending_delete: Option<Record>,
    /// Visible notifications, oldest first
    pub toasts: Vec<Toast>,
    /// Search text per resource list
    pub filters: HashMap<ResourceKind, String>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigate to a page, closing any sheet or dialog
    pub fn navigate(&mut self, page: Page) {
        self.active_page = page;
        self.sheet = None;
        self.pending_delete = None;
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_collapsed = !self.sidebar_collapsed;
    }

    pub fn open_create(&mut self, kind: ResourceKind) {
        self.sheet = Some(Sheet {
            kind,
            mode: SheetMode::Create,
        });
    }

    pub fn open_edit(&mut self, record: Record) {
        self.sheet = Some(Sheet {
            kind: record.kind(),
            mode: SheetMode::Edit(record),
        });
    }

    pub fn close_sheet(&mut self) {
        self.sheet = None;
    }

    pub fn confirm_delete(&mut self, record: Record) {
        self.pending_delete = Some(record);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Show a toast, returning its id for dismissal
    pub fn push_toast(&mut self, text: impl Into<String>, level: ToastLevel) -> Uuid {
        let id = Uuid::new_v4();
        self.toasts.push(Toast {
            id,
            text: text.into(),
            level,
        });
        id
    }

    pub fn dismiss_toast(&mut self, id: Uuid) {
        self.toasts.retain(|t| t.id != id);
    }

    pub fn filter(&self, kind: ResourceKind) -> String {
        self.filters.get(&kind).cloned().unwrap_or_default()
    }

    pub fn set_filter(&mut self, kind: ResourceKind, query: String) {
        if query.is_empty() {
            self.filters.remove(&kind);
        } else {
            self.filters.insert(kind, query);
        }
    }
}

// ============================================================================
// Global State
// ============================================================================

/// Global UI state signal
pub static APP_STATE: GlobalSignal<UiState> = Signal::global(UiState::new);

/// Bumped after every successful mutation of a resource
///
/// Queries read their resource's counter so they re-run once the cache
/// entry has been invalidated.
pub static REVISIONS: GlobalSignal<HashMap<ResourceKind, u64>> = Signal::global(HashMap::new);

/// Current revision of a resource
pub fn revision(kind: ResourceKind) -> u64 {
    REVISIONS.read().get(&kind).copied().unwrap_or(0)
}

/// Mark a resource as changed
pub fn bump_revision(kind: ResourceKind) {
    *REVISIONS.write().entry(kind).or_insert(0) += 1;
}

/// Show a toast and dismiss it after [`TOAST_DURATION`]
pub fn notify(text: impl Into<String>, level: ToastLevel) {
    let id = APP_STATE.write().push_toast(text, level);
    spawn(async move {
        tokio::time::sleep(TOAST_DURATION).await;
        APP_STATE.write().dismiss_toast(id);
    });
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn machine() -> Record {
        Record::from_value(
            ResourceKind::Machine,
            json!({"codeMachine": "M1", "designation": "Lathe"}),
        )
        .unwrap()
    }

    #[test]
    fn test_page_properties() {
        assert_eq!(Page::Home.display_name(), "Home");
        assert_eq!(Page::Resource(ResourceKind::Machine).display_name(), "Machines");
        assert_eq!(Page::Resource(ResourceKind::Repair).resource(), Some(ResourceKind::Repair));
        assert_eq!(Page::Home.resource(), None);
    }

    #[test]
    fn test_navigation_closes_overlays() {
        let mut ui = UiState::new();
        ui.open_create(ResourceKind::Machine);
        ui.confirm_delete(machine());

        ui.navigate(Page::Resource(ResourceKind::Client));
        assert_eq!(ui.active_page, Page::Resource(ResourceKind::Client));
        assert!(ui.sheet.is_none());
        assert!(ui.pending_delete.is_none());
    }

    #[test]
    fn test_sheet_titles() {
        let mut ui = UiState::new();
        ui.open_create(ResourceKind::Machine);
        assert_eq!(ui.sheet.as_ref().map(Sheet::title).as_deref(), Some("New Machine"));

        ui.open_edit(machine());
        assert_eq!(
            ui.sheet.as_ref().map(Sheet::title).as_deref(),
            Some("Edit Machine M1")
        );

        ui.close_sheet();
        assert!(ui.sheet.is_none());
    }

    #[test]
    fn test_toasts() {
        let mut ui = UiState::new();
        let first = ui.push_toast("Saved", ToastLevel::Success);
        ui.push_toast("Failed", ToastLevel::Error);
        assert_eq!(ui.toasts.len(), 2);

        ui.dismiss_toast(first);
        assert_eq!(ui.toasts.len(), 1);
        assert_eq!(ui.toasts[0].text, "Failed");
    }

    #[test]
    fn test_filters_per_resource() {
        let mut ui = UiState::new();
        ui.set_filter(ResourceKind::Machine, "lathe".to_string());
        assert_eq!(ui.filter(ResourceKind::Machine), "lathe");
        assert_eq!(ui.filter(ResourceKind::Client), "");

        ui.set_filter(ResourceKind::Machine, String::new());
        assert!(ui.filters.is_empty());
    }
}
