//! Atelier API
//!
//! Talks to the workshop REST API. The [`ApiClient`] handles transport and
//! response envelopes, the [`QueryCache`] shares read results, and the
//! [`CrudService`] puts both behind one kind-dispatched interface.

pub mod cache;
pub mod client;
pub mod error;
pub mod service;

pub use cache::{QueryCache, QueryKey, Scope};
pub use client::{ApiClient, ItemEnvelope, ListEnvelope, ResourceClient};
pub use error::{ClientError, ClientResult, ErrorKind};
pub use service::{CrudService, FieldOptions, allowed_values};
