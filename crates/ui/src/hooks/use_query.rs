//! # Query Hooks
//!
//! Read resources through the shared [`CrudService`] cache. A query re-runs
//! when it is retried or when one of the resources it depends on is
//! mutated; the cache decides whether that costs a request.

use atelier_api::{ClientResult, CrudService, FieldOptions};
use atelier_model::{Record, ResourceKind};
use dioxus::prelude::*;
use std::future::Future;
use std::sync::Arc;

use crate::Services;
use crate::state::revision;

// ============================================================================
// Load State
// ============================================================================

/// Progress of a read
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    /// User-facing error message
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

// ============================================================================
// Query Handle
// ============================================================================

/// Handle returned by the query hooks
pub struct Query<T: 'static> {
    pub state: Signal<LoadState<T>>,
    attempt: Signal<u32>,
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Query<T> {}

impl<T: Clone + 'static> Query<T> {
    /// Snapshot of the current state
    pub fn get(&self) -> LoadState<T> {
        self.state.read().clone()
    }

    /// Run the query again
    pub fn retry(&mut self) {
        *self.attempt.write() += 1;
    }
}

fn use_query<T, F, Fut>(depends_on: Vec<ResourceKind>, fetch: F) -> Query<T>
where
    T: Clone + 'static,
    F: Fn(Arc<CrudService>) -> Fut + 'static,
    Fut: Future<Output = ClientResult<T>> + 'static,
{
    let services = use_context::<Services>();
    let mut state = use_signal(|| LoadState::Loading);
    let attempt = use_signal(|| 0u32);

    use_effect(move || {
        let _ = attempt();
        for kind in &depends_on {
            let _ = revision(*kind);
        }

        if state.peek().error().is_some() {
            state.set(LoadState::Loading);
        }

        let request = fetch(Arc::clone(&services.crud));
        spawn(async move {
            match request.await {
                Ok(value) => state.set(LoadState::Ready(value)),
                Err(err) => {
                    tracing::warn!(error = %err, "Query failed");
                    state.set(LoadState::Failed(err.user_message()));
                }
            }
        });
    });

    Query { state, attempt }
}

/// All records of a resource
pub fn use_list(kind: ResourceKind) -> Query<Arc<Vec<Record>>> {
    use_query(vec![kind], move |crud| async move { crud.list(kind).await })
}

/// Option lists for the reference fields of a resource's form
pub fn use_field_options(kind: ResourceKind) -> Query<Arc<FieldOptions>> {
    use_query(kind.dependencies(), move |crud| async move {
        crud.field_options(kind).await.map(Arc::new)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_state_accessors() {
        let loading: LoadState<u32> = LoadState::Loading;
        assert!(loading.is_loading());
        assert_eq!(loading.value(), None);

        assert_eq!(LoadState::Ready(3).value(), Some(&3));

        let failed: LoadState<u32> = LoadState::Failed("Server returned status 500".into());
        assert_eq!(failed.error(), Some("Server returned status 500"));
        assert!(!failed.is_loading());
    }
}
