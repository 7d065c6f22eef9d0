//! Per-resource handlers and the registry that dispatches jobs to them
//!
//! Every handler follows the same shape: cast the job payload, validate it,
//! convert it to the inventory representation, issue one call and convert the
//! answer back.

mod instance;
mod locations;
mod region;
mod site;
pub mod telemetry;

pub use instance::InstanceHandler;
pub use locations::LocationsHandler;
pub use region::RegionHandler;
pub use site::SiteHandler;
pub use telemetry::{
    TelemetryLogsGroupHandler, TelemetryLogsProfileHandler, TelemetryMetricsGroupHandler,
    TelemetryMetricsProfileHandler,
};

use crate::api::{MetadataItem, ResourceIdParams};
use crate::client::InventoryClient;
use crate::error::{HandlerError, HandlerResult};
use crate::job::{Job, Operation, Payload, ResourceKind};
use crate::pagination::Pagination;
use async_trait::async_trait;
use invgw_proto::{Resource, ResourceFilter, ResourceVariant};
use std::collections::HashMap;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::{info, warn};

/// Translates the jobs of one resource type.
///
/// Operations a resource does not support keep the default body and fail with
/// not-implemented.
#[async_trait]
pub trait Handler: Send + Sync {
    fn resource(&self) -> ResourceKind;

    async fn create(&self, _job: &Job) -> HandlerResult<Payload> {
        Err(unsupported(self.resource(), Operation::Post))
    }

    async fn get(&self, _job: &Job) -> HandlerResult<Payload> {
        Err(unsupported(self.resource(), Operation::Get))
    }

    /// Put and Patch; `job.is_patch()` selects a partial update.
    async fn update(&self, job: &Job) -> HandlerResult<Payload> {
        Err(unsupported(self.resource(), job.operation))
    }

    async fn delete(&self, _job: &Job) -> HandlerResult<Payload> {
        Err(unsupported(self.resource(), Operation::Delete))
    }

    async fn list(&self, _job: &Job) -> HandlerResult<Payload> {
        Err(unsupported(self.resource(), Operation::List))
    }
}

pub(crate) fn unsupported(resource: ResourceKind, operation: Operation) -> HandlerError {
    HandlerError::not_implemented(format!("{operation} is not supported for {resource}"))
}

/// Build the handler of a resource type.
pub fn new_inventory_resource_handler(
    kind: ResourceKind,
    client: Arc<dyn InventoryClient>,
) -> Box<dyn Handler> {
    match kind {
        ResourceKind::Region => Box::new(RegionHandler::new(client)),
        ResourceKind::Site => Box::new(SiteHandler::new(client)),
        ResourceKind::Instance => Box::new(InstanceHandler::new(client)),
        ResourceKind::TelemetryLogsGroup => Box::new(TelemetryLogsGroupHandler::new(client)),
        ResourceKind::TelemetryMetricsGroup => Box::new(TelemetryMetricsGroupHandler::new(client)),
        ResourceKind::TelemetryLogsProfile => Box::new(TelemetryLogsProfileHandler::new(client)),
        ResourceKind::TelemetryMetricsProfile => {
            Box::new(TelemetryMetricsProfileHandler::new(client))
        }
        ResourceKind::Locations => Box::new(LocationsHandler::new(client)),
    }
}

/// One handler per resource type, sharing a single inventory client.
pub struct HandlerRegistry {
    handlers: HashMap<ResourceKind, Box<dyn Handler>>,
}

impl HandlerRegistry {
    pub fn new(client: Arc<dyn InventoryClient>) -> Self {
        let handlers = ResourceKind::iter()
            .map(|kind| (kind, new_inventory_resource_handler(kind, client.clone())))
            .collect();
        Self { handlers }
    }

    pub fn handler(&self, kind: ResourceKind) -> Option<&dyn Handler> {
        self.handlers.get(&kind).map(|h| h.as_ref())
    }

    /// Run a job against the handler of its resource type.
    pub async fn dispatch(&self, job: &Job) -> HandlerResult<Payload> {
        let handler = self.handler(job.resource).ok_or_else(|| {
            HandlerError::internal(format!("no handler registered for {}", job.resource))
        })?;

        info!(
            request_id = %job.context.request_id,
            resource = %job.resource,
            operation = %job.operation,
            "dispatching job"
        );

        let result = match job.operation {
            Operation::Post => handler.create(job).await,
            Operation::Get => handler.get(job).await,
            Operation::Put | Operation::Patch => handler.update(job).await,
            Operation::Delete => handler.delete(job).await,
            Operation::List => handler.list(job).await,
        };

        if let Err(e) = &result {
            warn!(
                request_id = %job.context.request_id,
                resource = %job.resource,
                operation = %job.operation,
                code = ?e.code(),
                "job failed: {}",
                e
            );
        }
        result
    }
}

// ============================================================================
// Helpers shared by the handlers
// ============================================================================

/// `resourceId` path parameter of Get/Update/Delete.
pub(crate) fn resource_id(job: &Job) -> HandlerResult<String> {
    let params: ResourceIdParams = job.payload.cast_params()?;
    if params.resource_id.is_empty() {
        return Err(HandlerError::invalid_argument("resourceId must not be empty"));
    }
    Ok(params.resource_id)
}

pub(crate) fn resource(variant: ResourceVariant) -> Resource {
    Resource {
        resource: Some(variant),
    }
}

/// List request selecting the table through an empty resource of its kind.
pub(crate) fn resource_filter(
    variant: ResourceVariant,
    filter: String,
    order_by: Option<String>,
    page: Pagination,
) -> ResourceFilter {
    tracing::debug!(%filter, limit = page.limit, offset = page.offset, "list filter");
    ResourceFilter {
        resource: Some(resource(variant)),
        filter,
        order_by: order_by.unwrap_or_default(),
        limit: page.limit,
        offset: page.offset,
    }
}

/// Variant of a backend answer; an empty oneof is an inventory fault.
pub(crate) fn variant(resource: Option<Resource>) -> HandlerResult<ResourceVariant> {
    resource
        .and_then(|r| r.resource)
        .ok_or_else(|| HandlerError::internal("inventory returned an empty resource"))
}

pub(crate) fn unexpected(expected: ResourceKind) -> HandlerError {
    HandlerError::internal(format!("inventory returned a resource that is not a {expected}"))
}

pub(crate) fn require_non_empty(value: Option<&str>, field: &str) -> HandlerResult<()> {
    match value {
        Some(v) if !v.is_empty() => Ok(()),
        _ => {
            warn!(field, "required field missing");
            Err(HandlerError::invalid_argument(format!("{field} is required")))
        }
    }
}

/// Metadata travels to the inventory as JSON text.
pub(crate) fn metadata_to_proto(metadata: Option<&Vec<MetadataItem>>) -> HandlerResult<String> {
    match metadata {
        None => Ok(String::new()),
        Some(items) => serde_json::to_string(items)
            .map_err(|e| HandlerError::internal(format!("failed to encode metadata: {e}"))),
    }
}

pub(crate) fn metadata_from_proto(metadata: &str) -> HandlerResult<Option<Vec<MetadataItem>>> {
    if metadata.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(metadata)
        .map(Some)
        .map_err(|e| HandlerError::internal(format!("inventory returned invalid metadata: {e}")))
}
