//! Generated API domains: action and resource-type metadata, the built-in catalogue,
//! generic handlers and the management API client they call.

mod action;
mod catalog;
mod client;
mod domain;
pub mod handlers;
mod resource;

pub use action::{ApiAction, LABEL_KEYS};
pub use catalog::builtin_domains;
pub use client::{normalize_base_url, HttpManagementApi, ManagementApi};
pub(crate) use client::{map_http_error, status_error, API_CONNECT_TIMEOUT};
pub use domain::{resource_name_completer, ApiDomainSpec};
pub use resource::{ResourceOperations, ResourceType};
