//! # Data Table Component
//!
//! Renders a resource's records through the generic table engine: sortable
//! headers, a search box, a column visibility menu and page navigation.
//!
//! The global filter is controlled by the owner, which keeps the search text
//! across navigation; everything else is owned by the table.

use atelier_core::PAGE_SIZES;
use atelier_model::{
    ControlledState, PageAction, Record, ResourceKind, SortDirection, TableEvent, TableState,
    compute, record_columns,
};
use dioxus::prelude::*;
use std::sync::Arc;

// ============================================================================
// Component Props
// ============================================================================

#[derive(Props, Clone, PartialEq)]
pub struct DataTableProps {
    pub kind: ResourceKind,

    pub rows: Arc<Vec<Record>>,

    /// Global search text
    #[props(default)]
    pub filter: String,

    /// Initial page size
    #[props(default = PAGE_SIZES[0])]
    pub page_size: usize,

    /// Proposed search text
    #[props(default)]
    pub on_filter_change: EventHandler<String>,

    #[props(default)]
    pub on_edit: EventHandler<Record>,

    #[props(default)]
    pub on_delete: EventHandler<Record>,
}

// ============================================================================
// Main Component
// ============================================================================

/// Table of records with sorting, search, column toggles and paging
#[component]
pub fn DataTable(props: DataTableProps) -> Element {
    let initial_page_size = props.page_size;
    let mut table = use_signal(move || {
        TableState::with_page_size(initial_page_size).unwrap_or_default()
    });
    let mut columns_open = use_signal(|| false);

    let columns = record_columns(props.kind);
    let controlled = ControlledState {
        sort: None,
        global_filter: Some(props.filter.clone()),
    };
    let state = controlled.overlay(&table.read());
    let view = compute(&columns, &props.rows, &state);
    let pages = view.page_count;

    let mut dispatch = move |event: TableEvent| {
        if let Err(err) = table.write().apply(&event, pages) {
            tracing::warn!(error = %err, "Rejected table event");
        }
    };

    let on_filter_change = props.on_filter_change;
    let on_edit = props.on_edit;
    let on_delete = props.on_delete;

    let toggles: Vec<(String, String, bool)> = columns
        .iter()
        .filter(|c| c.hideable)
        .map(|c| (c.key.clone(), c.header.clone(), !state.is_hidden(&c.key)))
        .collect();
    let headers: Vec<(String, String, bool, &'static str)> = view
        .columns
        .iter()
        .map(|c| {
            let indicator = match &state.sort {
                Some(s) if s.column == c.key => sort_indicator(s.direction),
                _ => "",
            };
            (c.key.clone(), c.header.clone(), c.sortable, indicator)
        })
        .collect();
    let body: Vec<(String, Record, Vec<String>)> = view
        .rows
        .iter()
        .map(|row| {
            let cells = view.columns.iter().map(|c| c.render(row)).collect();
            (row.key().to_string(), (*row).clone(), cells)
        })
        .collect();
    let column_count = headers.len() + 1;
    let page_label = if pages == 0 {
        "Page 0 of 0".to_string()
    } else {
        format!("Page {} of {}", view.page_index + 1, pages)
    };
    let range_label = view.range_label();
    let current_page = view.page_index + 1;
    let max_page = pages.max(1);
    let page_size = state.page_size;
    let has_previous = view.has_previous();
    let has_next = view.has_next();
    let is_empty = view.is_empty();
    let empty_message = if props.rows.is_empty() {
        format!("No {} yet.", props.kind.plural().to_lowercase())
    } else {
        "No results match your search.".to_string()
    };

    rsx! {
        div {
            class: "data-table",

            // Toolbar
            div {
                class: "data-table-toolbar",

                input {
                    class: "input data-table-search",
                    r#type: "search",
                    placeholder: "Search...",
                    aria_label: "Search",
                    value: "{props.filter}",
                    oninput: move |e| {
                        let query = e.value();
                        dispatch(TableEvent::GlobalFilter(query.clone()));
                        on_filter_change.call(query);
                    },
                }

                div {
                    class: "data-table-columns",

                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        aria_expanded: columns_open(),
                        onclick: move |_| columns_open.toggle(),
                        "Columns ▾"
                    }

                    if columns_open() {
                        div {
                            class: "data-table-columns-menu",
                            for (key, header, visible) in toggles {
                                label {
                                    key: "{key}",
                                    class: "data-table-columns-item",
                                    input {
                                        r#type: "checkbox",
                                        checked: visible,
                                        onchange: {
                                            let key = key.clone();
                                            move |_| dispatch(TableEvent::ToggleColumn(key.clone()))
                                        },
                                    }
                                    "{header}"
                                }
                            }
                        }
                    }
                }
            }

            // Table
            table {
                class: "data-table-grid",

                thead {
                    tr {
                        for (key, header, sortable, indicator) in headers {
                            th {
                                key: "{key}",
                                scope: "col",
                                class: if sortable { "sortable" } else { "" },
                                aria_sort: aria_sort(indicator),
                                onclick: {
                                    let key = key.clone();
                                    move |_| {
                                        if sortable {
                                            dispatch(TableEvent::ToggleSort(key.clone()));
                                        }
                                    }
                                },
                                "{header}"
                                span { class: "sort-indicator", "{indicator}" }
                            }
                        }
                        th { class: "data-table-actions-header", "Actions" }
                    }
                }

                tbody {
                    if is_empty {
                        tr {
                            td {
                                class: "data-table-empty",
                                colspan: "{column_count}",
                                "{empty_message}"
                            }
                        }
                    }

                    for (row_key, record, cells) in body {
                        tr {
                            key: "{row_key}",
                            for (index, cell) in cells.into_iter().enumerate() {
                                td { key: "{index}", "{cell}" }
                            }
                            td {
                                class: "data-table-actions",
                                button {
                                    class: "btn btn-icon",
                                    r#type: "button",
                                    title: "Edit",
                                    onclick: {
                                        let record = record.clone();
                                        move |_| on_edit.call(record.clone())
                                    },
                                    "✏️"
                                }
                                button {
                                    class: "btn btn-icon btn-icon--danger",
                                    r#type: "button",
                                    title: "Delete",
                                    onclick: {
                                        let record = record.clone();
                                        move |_| on_delete.call(record.clone())
                                    },
                                    "🗑️"
                                }
                            }
                        }
                    }
                }
            }

            // Pagination
            div {
                class: "data-table-footer",

                span { class: "data-table-range", "{range_label}" }

                div {
                    class: "data-table-pager",

                    button {
                        class: "btn btn-icon",
                        r#type: "button",
                        title: "First page",
                        disabled: !has_previous,
                        onclick: move |_| dispatch(TableEvent::Page(PageAction::First)),
                        "«"
                    }
                    button {
                        class: "btn btn-icon",
                        r#type: "button",
                        title: "Previous page",
                        disabled: !has_previous,
                        onclick: move |_| dispatch(TableEvent::Page(PageAction::Previous)),
                        "‹"
                    }
                    span { class: "data-table-page", "{page_label}" }
                    button {
                        class: "btn btn-icon",
                        r#type: "button",
                        title: "Next page",
                        disabled: !has_next,
                        onclick: move |_| dispatch(TableEvent::Page(PageAction::Next)),
                        "›"
                    }
                    button {
                        class: "btn btn-icon",
                        r#type: "button",
                        title: "Last page",
                        disabled: !has_next,
                        onclick: move |_| dispatch(TableEvent::Page(PageAction::Last)),
                        "»"
                    }

                    label {
                        class: "data-table-jump",
                        "Go to"
                        input {
                            class: "input",
                            r#type: "number",
                            min: "1",
                            max: "{max_page}",
                            value: "{current_page}",
                            disabled: pages == 0,
                            onchange: move |e| {
                                if let Some(index) = parse_page_jump(&e.value()) {
                                    dispatch(TableEvent::Page(PageAction::Go(index)));
                                }
                            },
                        }
                    }
                }

                select {
                    class: "input input--select data-table-size",
                    aria_label: "Rows per page",
                    onchange: move |e| {
                        if let Ok(size) = e.value().parse::<usize>() {
                            dispatch(TableEvent::PageSize(size));
                        }
                    },
                    for size in PAGE_SIZES {
                        option {
                            key: "{size}",
                            value: "{size}",
                            selected: size == page_size,
                            "Show {size}"
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn sort_indicator(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Ascending => "▲",
        SortDirection::Descending => "▼",
    }
}

fn aria_sort(indicator: &str) -> &'static str {
    match indicator {
        "▲" => "ascending",
        "▼" => "descending",
        _ => "none",
    }
}

/// One-based page number typed by the user, as a zero-based index
fn parse_page_jump(input: &str) -> Option<usize> {
    input.trim().parse::<usize>().ok()?.checked_sub(1)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sort_indicator() {
        assert_eq!(sort_indicator(SortDirection::Ascending), "▲");
        assert_eq!(aria_sort(sort_indicator(SortDirection::Descending)), "descending");
        assert_eq!(aria_sort(""), "none");
    }

    #[test]
    fn test_parse_page_jump() {
        assert_eq!(parse_page_jump("3"), Some(2));
        assert_eq!(parse_page_jump(" 1 "), Some(0));
        assert_eq!(parse_page_jump("0"), None);
        assert_eq!(parse_page_jump("abc"), None);
    }
}
