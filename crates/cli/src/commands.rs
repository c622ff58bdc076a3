//! Command implementations
//!
//! Each command returns the text to print so it can be tested without a
//! terminal; [`execute`] writes it to stdout.

use anyhow::bail;
use atelier_api::{CrudService, allowed_values};
use atelier_core::AppConfig;
use atelier_model::form::apply_assignments;
use atelier_model::{
    AppError, AppResult, DataTable, FormValues, PageAction, ReferenceOptions, ResourceKind,
    SortState, TableEvent, TableState, record_columns,
};
use colored::Colorize;

use crate::Command;
use crate::output;

/// Options of the `list` command
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub filter: Option<String>,
    pub sort: Option<String>,
    /// One-based
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub hide: Vec<String>,
    pub json: bool,
}

/// Run one command and print its output
pub async fn execute(command: Command, config: &AppConfig) -> anyhow::Result<()> {
    let crud = || CrudService::from_config(config);

    let text = match command {
        Command::Resources => output::resources(),
        Command::Config => config.to_toml()?,
        Command::List {
            resource,
            filter,
            sort,
            page,
            page_size,
            hide,
            json,
        } => {
            let options = ListOptions {
                filter,
                sort,
                page,
                page_size: Some(page_size.unwrap_or(config.page_size)),
                hide,
                json,
            };
            list(&crud()?, resource.parse()?, &options).await?
        }
        Command::Get {
            resource,
            key,
            json,
        } => get(&crud()?, resource.parse()?, &key, json).await?,
        Command::Create {
            resource,
            assignments,
        } => create(&crud()?, resource.parse()?, &assignments).await?,
        Command::Update {
            resource,
            key,
            assignments,
        } => update(&crud()?, resource.parse()?, &key, &assignments).await?,
        Command::Delete { resource, key, yes } => {
            delete(&crud()?, resource.parse()?, &key, yes).await?
        }
    };
    print!("{}", text);
    Ok(())
}

// ============================================================================
// Reads
// ============================================================================

/// Filter, sort and page a resource's records
pub async fn list(
    crud: &CrudService,
    kind: ResourceKind,
    options: &ListOptions,
) -> anyhow::Result<String> {
    let rows = crud.list(kind).await?;

    let mut state = match options.page_size {
        Some(size) => TableState::with_page_size(size)?,
        None => TableState::default(),
    };
    for column in &options.hide {
        check_hideable(kind, column)?;
        state.set_visible(column, false);
    }
    let mut table = DataTable::new(record_columns(kind)).with_state(state);

    if let Some(query) = &options.filter {
        table.dispatch(TableEvent::GlobalFilter(query.clone()), &rows)?;
    }
    if let Some(sort) = &options.sort {
        table.dispatch(TableEvent::SetSort(Some(parse_sort(kind, sort)?)), &rows)?;
    }
    if let Some(page) = options.page {
        if page == 0 {
            bail!("Pages are numbered from 1");
        }
        table.dispatch(TableEvent::Page(PageAction::Go(page - 1)), &rows)?;
    }

    let view = table.view(&rows);
    if options.json {
        let mut text = output::records_json(view.rows.iter().copied())?;
        text.push('\n');
        return Ok(text);
    }
    Ok(output::table(&view))
}

/// Show one record
pub async fn get(
    crud: &CrudService,
    kind: ResourceKind,
    key: &str,
    json: bool,
) -> anyhow::Result<String> {
    let record = crud.get(kind, key).await?;
    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(&record.to_value())?));
    }
    Ok(output::record(&record))
}

// ============================================================================
// Mutations
// ============================================================================

pub async fn create(
    crud: &CrudService,
    kind: ResourceKind,
    assignments: &[String],
) -> anyhow::Result<String> {
    let mut form = FormValues::new(kind);
    apply_assignments(&mut form, assignments)?;

    let references = reference_options(crud, kind).await;
    let created = crud.create(&form, references.as_ref()).await?;
    Ok(format!(
        "{} Created {} {}\n",
        "✓".green(),
        kind.singular().to_lowercase(),
        created.key()
    ))
}

pub async fn update(
    crud: &CrudService,
    kind: ResourceKind,
    key: &str,
    assignments: &[String],
) -> anyhow::Result<String> {
    let current = crud.get(kind, key).await?;
    let mut form = FormValues::from_record(&current);
    apply_assignments(&mut form, assignments)?;

    let references = reference_options(crud, kind).await;
    let updated = crud.update(&form, references.as_ref()).await?;
    Ok(format!(
        "{} Updated {} {}\n",
        "✓".green(),
        kind.singular().to_lowercase(),
        updated.key()
    ))
}

pub async fn delete(
    crud: &CrudService,
    kind: ResourceKind,
    key: &str,
    yes: bool,
) -> anyhow::Result<String> {
    if !yes {
        bail!(
            "Refusing to delete {} {} without --yes",
            kind.singular().to_lowercase(),
            key
        );
    }
    crud.delete(kind, key).await?;
    Ok(format!(
        "{} Deleted {} {}\n",
        "✓".green(),
        kind.singular().to_lowercase(),
        key
    ))
}

/// Allowed reference values, or `None` when they cannot be loaded
async fn reference_options(crud: &CrudService, kind: ResourceKind) -> Option<ReferenceOptions> {
    match crud.field_options(kind).await {
        Ok(options) => Some(allowed_values(&options)),
        Err(err) => {
            tracing::warn!(resource = %kind, error = %err, "Reference options unavailable");
            None
        }
    }
}

// ============================================================================
// Argument Parsing
// ============================================================================

/// Parse `column` or `column:asc|desc`
pub fn parse_sort(kind: ResourceKind, raw: &str) -> AppResult<SortState> {
    let (column, direction) = match raw.split_once(':') {
        Some((column, direction)) => (column.trim(), Some(direction.trim().to_lowercase())),
        None => (raw.trim(), None),
    };
    check_listed(kind, column)?;

    match direction.as_deref() {
        None | Some("asc") => Ok(SortState::ascending(column)),
        Some("desc") => Ok(SortState::descending(column)),
        Some(other) => Err(AppError::validation(format!(
            "Sort direction must be 'asc' or 'desc', got '{}'",
            other
        ))),
    }
}

fn check_listed(kind: ResourceKind, column: &str) -> AppResult<()> {
    let field = kind.field(column)?;
    if !field.show_in_list {
        return Err(AppError::validation(format!(
            "Column '{}' is not shown in the {} list",
            column,
            kind.slug()
        )));
    }
    Ok(())
}

fn check_hideable(kind: ResourceKind, column: &str) -> AppResult<()> {
    check_listed(kind, column)?;
    let hideable = record_columns(kind)
        .iter()
        .any(|c| c.key == column && c.hideable);
    if !hideable {
        return Err(AppError::validation(format!(
            "Column '{}' cannot be hidden",
            column
        )));
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_api::{ApiClient, QueryCache};
    use atelier_model::SortDirection;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer) -> CrudService {
        let api = ApiClient::with_base_url(&format!("{}/api", server.uri()), Duration::from_secs(5))
            .unwrap();
        CrudService::new(api, QueryCache::default())
    }

    async fn mount_causes(server: &MockServer, count: usize) {
        let items: Vec<serde_json::Value> = (1..=count)
            .map(|i| json!({"code_causse": format!("CA{:02}", i), "libelle": format!("Cause {}", i)}))
            .collect();
        Mock::given(method("GET"))
            .and(path("/api/causses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": items})))
            .mount(server)
            .await;
    }

    #[test]
    fn test_parse_sort() {
        let sort = parse_sort(ResourceKind::Cause, "libelle:DESC").unwrap();
        assert_eq!(sort.column, "libelle");
        assert_eq!(sort.direction, SortDirection::Descending);

        let sort = parse_sort(ResourceKind::Cause, "code_causse").unwrap();
        assert_eq!(sort.direction, SortDirection::Ascending);

        assert!(parse_sort(ResourceKind::Cause, "libelle:sideways").is_err());
        assert!(parse_sort(ResourceKind::Cause, "nope").is_err());
        // Long text is not a table column
        assert!(parse_sort(ResourceKind::Repair, "description").is_err());
    }

    #[test]
    fn test_key_column_cannot_be_hidden() {
        assert!(check_hideable(ResourceKind::Cause, "libelle").is_ok());
        assert!(check_hideable(ResourceKind::Cause, "code_causse").is_err());
    }

    #[tokio::test]
    async fn test_list_pages_and_sorts() {
        let server = MockServer::start().await;
        mount_causes(&server, 25).await;
        let crud = service(&server);

        let options = ListOptions {
            sort: Some("code_causse:desc".into()),
            page: Some(3),
            page_size: Some(10),
            ..Default::default()
        };
        let text = list(&crud, ResourceKind::Cause, &options).await.unwrap();
        assert!(text.contains("CA05"));
        assert!(text.contains("CA01"));
        assert!(!text.contains("CA06"));
        assert!(text.ends_with("21-25 of 25 · Page 3 of 3\n"));
    }

    #[tokio::test]
    async fn test_list_filter_and_json() {
        let server = MockServer::start().await;
        mount_causes(&server, 12).await;
        let crud = service(&server);

        let options = ListOptions {
            filter: Some("cause 11".into()),
            json: true,
            ..Default::default()
        };
        let text = list(&crud, ResourceKind::Cause, &options).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, json!([{"code_causse": "CA11", "libelle": "Cause 11"}]));
    }

    #[tokio::test]
    async fn test_list_hidden_column() {
        let server = MockServer::start().await;
        mount_causes(&server, 2).await;
        let crud = service(&server);

        let options = ListOptions {
            hide: vec!["libelle".into()],
            ..Default::default()
        };
        let text = list(&crud, ResourceKind::Cause, &options).await.unwrap();
        assert!(text.starts_with("Code\n"));
        assert!(!text.contains("Cause 1"));
    }

    #[tokio::test]
    async fn test_list_rejects_page_zero() {
        let server = MockServer::start().await;
        mount_causes(&server, 2).await;
        let crud = service(&server);

        let options = ListOptions {
            page: Some(0),
            ..Default::default()
        };
        let err = list(&crud, ResourceKind::Cause, &options).await.unwrap_err();
        assert_eq!(err.to_string(), "Pages are numbered from 1");
    }

    #[tokio::test]
    async fn test_update_merges_assignments() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/causses/CA1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"code_causse": "CA1", "libelle": "Usure"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/causses/CA1"))
            .and(body_partial_json(json!({"code_causse": "CA1", "libelle": "Usure outil"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"code_causse": "CA1", "libelle": "Usure outil"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let crud = service(&server);
        let text = update(
            &crud,
            ResourceKind::Cause,
            "CA1",
            &["libelle=Usure outil".to_string()],
        )
        .await
        .unwrap();
        assert!(text.contains("Updated causse CA1"));
    }

    #[tokio::test]
    async fn test_update_rejects_key_change() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/causses/CA1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"code_causse": "CA1", "libelle": "Usure"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let crud = service(&server);
        let result = update(
            &crud,
            ResourceKind::Cause,
            "CA1",
            &["code_causse=CA9".to_string()],
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let crud = service(&server);
        let err = delete(&crud, ResourceKind::Cause, "CA1", false)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Refusing to delete causse CA1 without --yes");
    }
}
