//! CRUD service
//!
//! Kind-dispatched operations over every resource. Reads go through the
//! [`QueryCache`]; successful mutations invalidate the affected queries:
//!
//! - create: the resource list
//! - update(k): the list and item `k`
//! - delete(k): the list, and item `k` is dropped

use crate::cache::{QueryCache, QueryKey};
use crate::client::{ApiClient, ResourceClient};
use crate::error::{ClientError, ClientResult};
use atelier_core::AppConfig;
use atelier_model::entities::{
    Cause, Client, Consumption, Defect, Machine, Material, Operator, Production, QualityCheck,
    Repair, WorkOrder,
};
use atelier_model::{
    Candidate, FieldKind, FormMode, FormValues, OperatorRole, Record, ReferenceOptions, Resource,
    ResourceKind, SubmitError, candidates_from_map,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Run `$body` with `$r` bound to the typed struct of `$kind`
macro_rules! with_resource {
    ($kind:expr, $r:ident => $body:expr) => {
        match $kind {
            ResourceKind::Client => {
                type $r = Client;
                $body
            }
            ResourceKind::Operator => {
                type $r = Operator;
                $body
            }
            ResourceKind::Machine => {
                type $r = Machine;
                $body
            }
            ResourceKind::WorkOrder => {
                type $r = WorkOrder;
                $body
            }
            ResourceKind::Production => {
                type $r = Production;
                $body
            }
            ResourceKind::Repair => {
                type $r = Repair;
                $body
            }
            ResourceKind::Defect => {
                type $r = Defect;
                $body
            }
            ResourceKind::Cause => {
                type $r = Cause;
                $body
            }
            ResourceKind::Material => {
                type $r = Material;
                $body
            }
            ResourceKind::Consumption => {
                type $r = Consumption;
                $body
            }
            ResourceKind::QualityCheck => {
                type $r = QualityCheck;
                $body
            }
        }
    };
}

/// Option lists for every reference field of a form, keyed by field name
pub type FieldOptions = BTreeMap<&'static str, Vec<Candidate>>;

/// Allowed reference values derived from loaded option lists
pub fn allowed_values(options: &FieldOptions) -> ReferenceOptions {
    options
        .iter()
        .map(|(field, candidates)| {
            (*field, candidates.iter().map(|c| c.value.clone()).collect())
        })
        .collect()
}

/// Cached CRUD access to every resource
#[derive(Debug)]
pub struct CrudService {
    api: ApiClient,
    cache: QueryCache,
}

impl CrudService {
    pub fn new(api: ApiClient, cache: QueryCache) -> Self {
        Self { api, cache }
    }

    /// Build the service from the application configuration
    pub fn from_config(config: &AppConfig) -> ClientResult<Self> {
        Ok(Self::new(
            ApiClient::new(config)?,
            QueryCache::new(config.stale_after()),
        ))
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    fn client<R: Resource>(&self) -> ResourceClient<R> {
        ResourceClient::new(self.api.clone())
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// All records of a resource
    pub async fn list(&self, kind: ResourceKind) -> ClientResult<Arc<Vec<Record>>> {
        self.cache
            .get_or_fetch(&QueryKey::list(kind), || self.fetch_list(kind))
            .await
    }

    async fn fetch_list(&self, kind: ResourceKind) -> ClientResult<Vec<Record>> {
        let records = with_resource!(kind, R => {
            let items = self.client::<R>().list().await?;
            items
                .iter()
                .map(|item| item.to_record())
                .collect::<Result<Vec<_>, _>>()?
        });
        tracing::debug!(resource = %kind, count = records.len(), "Loaded list");
        Ok(records)
    }

    /// One record by key
    pub async fn get(&self, kind: ResourceKind, key: &str) -> ClientResult<Arc<Record>> {
        self.cache
            .get_or_fetch(&QueryKey::item(kind, key), || self.fetch_item(kind, key))
            .await
    }

    async fn fetch_item(&self, kind: ResourceKind, key: &str) -> ClientResult<Record> {
        let record = with_resource!(kind, R => self.client::<R>().get(key).await?.to_record()?);
        Ok(record)
    }

    /// Autocomplete candidates for a resource, optionally operators of one role
    pub async fn options(
        &self,
        kind: ResourceKind,
        role: Option<&OperatorRole>,
    ) -> ClientResult<Vec<Candidate>> {
        let records = self.list(kind).await?;
        Ok(candidates_from_map(
            records
                .iter()
                .filter(|r| role.is_none() || r.role().as_ref() == role)
                .map(|r| (r.key().to_string(), r.option_label())),
        ))
    }

    /// Option lists for every reference field of a resource's form
    pub async fn field_options(&self, kind: ResourceKind) -> ClientResult<FieldOptions> {
        let mut options = FieldOptions::new();
        for field in kind.fields() {
            if let FieldKind::Reference { target, role } = &field.kind {
                let candidates = self.options(*target, role.as_ref()).await?;
                options.insert(field.name, candidates);
            }
        }
        Ok(options)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    fn prepare(
        form: &FormValues,
        references: Option<&ReferenceOptions>,
    ) -> ClientResult<Record> {
        form.to_record(references).map_err(|e| match e {
            SubmitError::Invalid(errors) => ClientError::Validation(errors),
            SubmitError::Schema(err) => ClientError::App(err),
        })
    }

    /// Validate a create form and send it; nothing is sent when invalid
    pub async fn create(
        &self,
        form: &FormValues,
        references: Option<&ReferenceOptions>,
    ) -> ClientResult<Record> {
        let kind = form.kind();
        let record = Self::prepare(form, references)?;

        let created = with_resource!(kind, R => {
            let typed = R::from_record(&record)?;
            self.client::<R>().create(&typed).await?.to_record()?
        });

        self.cache.invalidate(&QueryKey::list(kind));
        tracing::info!(resource = %kind, key = created.key(), "Created record");
        Ok(created)
    }

    /// Validate an edit form and send it; nothing is sent when invalid
    pub async fn update(
        &self,
        form: &FormValues,
        references: Option<&ReferenceOptions>,
    ) -> ClientResult<Record> {
        let kind = form.kind();
        if form.mode() != FormMode::Edit {
            return Err(atelier_core::AppError::internal("update requires an edit form").into());
        }
        let record = Self::prepare(form, references)?;
        let key = record.key().to_string();

        let updated = with_resource!(kind, R => {
            let typed = R::from_record(&record)?;
            self.client::<R>().update(&key, &typed).await?.to_record()?
        });

        self.cache.invalidate(&QueryKey::list(kind));
        self.cache.invalidate(&QueryKey::item(kind, key.as_str()));
        tracing::info!(resource = %kind, key = %key, "Updated record");
        Ok(updated)
    }

    /// Delete a record by key
    pub async fn delete(&self, kind: ResourceKind, key: &str) -> ClientResult<()> {
        with_resource!(kind, R => self.client::<R>().delete(key).await?);

        self.cache.invalidate(&QueryKey::list(kind));
        self.cache.remove(&QueryKey::item(kind, key));
        tracing::info!(resource = %kind, key = %key, "Deleted record");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn service(server: &MockServer) -> CrudService {
        let api = ApiClient::with_base_url(&format!("{}/api", server.uri()), Duration::from_secs(5))
            .unwrap();
        CrudService::new(api, QueryCache::default())
    }

    async fn mount_list(server: &MockServer, slug: &str, items: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(format!("/api/{}", slug)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"data": items}})))
            .mount(server)
            .await;
    }

    fn cause_form(code: &str, libelle: &str) -> FormValues {
        let mut form = FormValues::new(ResourceKind::Cause);
        form.set("code_causse", code);
        form.set("libelle", libelle);
        form
    }

    #[tokio::test]
    async fn test_list_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/causses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"data": [{"code_causse": "CA1", "libelle": "Usure"}]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let service = service(&server).await;
        let first = service.list(ResourceKind::Cause).await.unwrap();
        let second = service.list(ResourceKind::Cause).await.unwrap();
        assert_eq!(first.len(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_create_invalidates_list() {
        let server = MockServer::start().await;
        mount_list(&server, "causses", json!([])).await;
        Mock::given(method("POST"))
            .and(path("/api/causses"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": {"code_causse": "CA2", "libelle": "Vibration", "id": 7}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let service = service(&server).await;
        service.list(ResourceKind::Cause).await.unwrap();
        assert!(service.cache().is_fresh(&QueryKey::list(ResourceKind::Cause)));

        let created = service
            .create(&cause_form("CA2", "Vibration"), None)
            .await
            .unwrap();
        assert_eq!(created.key(), "CA2");
        assert_eq!(created.get("id"), None);
        assert!(!service.cache().is_fresh(&QueryKey::list(ResourceKind::Cause)));
    }

    #[tokio::test]
    async fn test_invalid_form_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let service = service(&server).await;
        let err = service.create(&cause_form("CA3", ""), None).await.unwrap_err();
        assert_eq!(
            err.form_errors().and_then(|e| e.get("libelle")),
            Some("This field is required")
        );
    }

    #[tokio::test]
    async fn test_update_and_delete_invalidate_item() {
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
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"code_causse": "CA1", "libelle": "Usure outil"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/causses/CA1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let service = service(&server).await;
        let item = QueryKey::item(ResourceKind::Cause, "CA1");
        let record = service.get(ResourceKind::Cause, "CA1").await.unwrap();
        assert!(service.cache().is_fresh(&item));

        let mut form = FormValues::from_record(&record);
        form.set("libelle", "Usure outil");
        let updated = service.update(&form, None).await.unwrap();
        assert_eq!(updated.text("libelle"), "Usure outil");
        assert!(!service.cache().is_fresh(&item));

        service.get(ResourceKind::Cause, "CA1").await.unwrap();
        service.delete(ResourceKind::Cause, "CA1").await.unwrap();
        assert!(!service.cache().is_fresh(&item));
    }

    #[tokio::test]
    async fn test_update_requires_edit_form() {
        let server = MockServer::start().await;
        let service = service(&server).await;
        let err = service
            .update(&cause_form("CA1", "Usure"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::App(_)));
    }

    #[tokio::test]
    async fn test_mutation_error_keeps_cache() {
        let server = MockServer::start().await;
        mount_list(&server, "causses", json!([])).await;
        Mock::given(method("POST"))
            .and(path("/api/causses"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "Database down"})))
            .mount(&server)
            .await;

        let service = service(&server).await;
        service.list(ResourceKind::Cause).await.unwrap();
        let err = service
            .create(&cause_form("CA2", "Vibration"), None)
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Database down");
        assert_eq!(err.kind(true), crate::ErrorKind::Mutation);
        assert!(service.cache().is_fresh(&QueryKey::list(ResourceKind::Cause)));
    }

    #[tokio::test]
    async fn test_options_filter_by_role() {
        let server = MockServer::start().await;
        mount_list(
            &server,
            "operateurs",
            json!([
                {"matricule": "OP1", "nom": "Martin", "prenom": "Luc", "fonction": "Soudeur"},
                {"matricule": "OP2", "nom": "Bernard", "prenom": "Eva", "fonction": "contrôleur"},
                {"matricule": "OP3", "nom": "Roux", "prenom": "Tom", "fonction": "Régleur"}
            ]),
        )
        .await;

        let service = service(&server).await;
        let welders = service
            .options(ResourceKind::Operator, Some(&OperatorRole::Soudeur))
            .await
            .unwrap();
        assert_eq!(welders, vec![Candidate::new("OP1", "OP1 - Martin")]);

        let all = service.options(ResourceKind::Operator, None).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_field_options_and_allowed_values() {
        let server = MockServer::start().await;
        mount_list(
            &server,
            "machines",
            json!([{"codeMachine": "M1", "designation": "Lathe"}]),
        )
        .await;
        mount_list(
            &server,
            "operateurs",
            json!([{"matricule": "OP1", "nom": "Martin", "prenom": "Luc", "fonction": "soudeur"}]),
        )
        .await;

        let service = service(&server).await;
        let options = service.field_options(ResourceKind::Repair).await.unwrap();
        assert_eq!(options["codeMachine"], vec![Candidate::new("M1", "M1 - Lathe")]);
        assert_eq!(options["matricule"].len(), 1);

        let allowed = allowed_values(&options);
        assert_eq!(allowed["codeMachine"], vec!["M1".to_string()]);
    }
}
