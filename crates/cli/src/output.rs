//! Plain-text rendering of records and tables

use atelier_model::{Record, ResourceKind, TableView};

/// Gap between table columns
const GAP: &str = "  ";

/// Align rows of cells into columns, with a dashed rule under the header
pub fn grid(header: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    push_line(&mut out, header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    out.push_str(padded.join(GAP).trim_end());
    out.push('\n');
}

/// The resource catalogue
pub fn resources() -> String {
    let header = ["Name", "Resource", "Key", "Endpoint"].map(String::from);
    let rows: Vec<Vec<String>> = ResourceKind::ALL
        .iter()
        .map(|kind| {
            vec![
                kind.slug().to_string(),
                kind.singular().to_string(),
                kind.key_field().to_string(),
                format!("/{}", kind.slug()),
            ]
        })
        .collect();
    grid(&header, &rows)
}

/// One page of a table, with a range and page footer
pub fn table(view: &TableView<'_, Record>) -> String {
    if view.is_empty() {
        return if view.total_count == 0 {
            "No records.\n".to_string()
        } else {
            "No results match the filter.\n".to_string()
        };
    }

    let header: Vec<String> = view.columns.iter().map(|c| c.header.clone()).collect();
    let rows: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|row| view.columns.iter().map(|c| c.render(row)).collect())
        .collect();

    let mut out = grid(&header, &rows);
    out.push_str(&format!(
        "\n{} · Page {} of {}\n",
        view.range_label(),
        view.page_index + 1,
        view.page_count
    ));
    out
}

/// Every field of a record as `Label: value` lines
pub fn record(record: &Record) -> String {
    let fields = record.kind().fields();
    let labels: Vec<String> = fields.iter().map(|f| f.display_label()).collect();
    let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for (field, label) in fields.iter().zip(&labels) {
        let value = field.cell(record.get(field.name)).display();
        let pad = width.saturating_sub(label.chars().count());
        out.push_str(&format!("{}:{} {}\n", label, " ".repeat(pad), value));
    }
    out
}

/// Records as a pretty JSON array
pub fn records_json<'a>(records: impl IntoIterator<Item = &'a Record>) -> serde_json::Result<String> {
    let values: Vec<serde_json::Value> = records.into_iter().map(Record::to_value).collect();
    serde_json::to_string_pretty(&values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_model::{TableState, compute, record_columns};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn causes() -> Vec<Record> {
        [("CA1", "Usure"), ("CA2", "Vibration excessive")]
            .into_iter()
            .map(|(code, libelle)| {
                Record::from_value(
                    ResourceKind::Cause,
                    json!({"code_causse": code, "libelle": libelle}),
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_grid_aligns_columns() {
        let header = vec!["Code".to_string(), "Libellé".to_string()];
        let rows = vec![
            vec!["CA1".to_string(), "Usure".to_string()],
            vec!["CA10".to_string(), "Vibration".to_string()],
        ];
        assert_eq!(
            grid(&header, &rows),
            "Code  Libellé\n----  ---------\nCA1   Usure\nCA10  Vibration\n"
        );
    }

    #[test]
    fn test_table_footer() {
        let rows = causes();
        let columns = record_columns(ResourceKind::Cause);
        let view = compute(&columns, &rows, &TableState::default());
        let text = table(&view);
        assert!(text.starts_with("Code  Libellé\n"));
        assert!(text.contains("CA2   Vibration excessive\n"));
        assert!(text.ends_with("1-2 of 2 · Page 1 of 1\n"));
    }

    #[test]
    fn test_table_empty_messages() {
        let columns = record_columns(ResourceKind::Cause);
        let none: Vec<Record> = Vec::new();
        assert_eq!(table(&compute(&columns, &none, &TableState::default())), "No records.\n");

        let rows = causes();
        let mut state = TableState::default();
        state.set_global_filter("zzz");
        assert_eq!(
            table(&compute(&columns, &rows, &state)),
            "No results match the filter.\n"
        );
    }

    #[test]
    fn test_record_lines() {
        let rows = causes();
        assert_eq!(record(&rows[0]), "Code:    CA1\nLibellé: Usure\n");
    }

    #[test]
    fn test_resources_lists_every_kind() {
        let text = resources();
        assert_eq!(text.lines().count(), ResourceKind::ALL.len() + 2);
        assert!(text.contains("/causses"));
    }

    #[test]
    fn test_records_json() {
        let rows = causes();
        let text = records_json(rows.iter().take(1)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, json!([{"code_causse": "CA1", "libelle": "Usure"}]));
    }
}
