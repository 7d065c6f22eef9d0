use super::{GroupApi, GroupFields};
use crate::api::{TelemetryCollectorKind, TelemetryGroupListParams, Timestamps, non_empty};
use crate::client::InventoryClient;
use crate::error::{HandlerError, HandlerResult};
use crate::filter;
use crate::handlers::{
    Handler, require_non_empty, resource, resource_filter, resource_id, unexpected, unsupported,
    variant,
};
use crate::job::{Job, Payload, ResourceKind};
use crate::pagination::parse_pagination;
use async_trait::async_trait;
use invgw_proto as pb;
use invgw_proto::{ResourceVariant, TelemetryGroupResource};
use std::marker::PhantomData;
use std::sync::Arc;

/// Handler of a telemetry group resource (logs or metrics).
pub struct TelemetryGroupHandler<G> {
    client: Arc<dyn InventoryClient>,
    _api: PhantomData<fn() -> G>,
}

impl<G: GroupApi> TelemetryGroupHandler<G> {
    pub fn new(client: Arc<dyn InventoryClient>) -> Self {
        Self {
            client,
            _api: PhantomData,
        }
    }
}

fn validate_create(fields: &GroupFields) -> HandlerResult<()> {
    require_non_empty(fields.name.as_deref(), "name")?;
    if fields.collector_kind.unwrap_or_default() == TelemetryCollectorKind::Unspecified {
        return Err(HandlerError::invalid_argument("collectorKind must be specified"));
    }
    if fields.groups.as_ref().is_none_or(|g| g.is_empty()) {
        return Err(HandlerError::invalid_argument("groups must not be empty"));
    }
    Ok(())
}

pub(crate) fn group_to_proto<G: GroupApi>(fields: GroupFields) -> TelemetryGroupResource {
    TelemetryGroupResource {
        name: fields.name.unwrap_or_default(),
        kind: G::KIND as i32,
        collector_kind: pb::TelemetryCollectorKind::from(fields.collector_kind.unwrap_or_default())
            as i32,
        groups: fields.groups.unwrap_or_default(),
        ..Default::default()
    }
}

/// Convert a backend group, rejecting one of the other kind.
pub(crate) fn group_from_proto<G: GroupApi>(group: TelemetryGroupResource) -> HandlerResult<G> {
    if group.kind() != G::KIND {
        return Err(HandlerError::internal(format!(
            "inventory returned a {} group for {}",
            group.kind().as_str_name(),
            G::RESOURCE
        )));
    }
    Ok(G::from_fields(GroupFields {
        id: non_empty(&group.resource_id),
        name: non_empty(&group.name),
        collector_kind: Some(group.collector_kind().into()),
        timestamps: Timestamps::from_backend(&group.created_at, &group.updated_at),
        groups: Some(group.groups),
    }))
}

fn expect_group<G: GroupApi>(variant: ResourceVariant) -> HandlerResult<G> {
    match variant {
        ResourceVariant::TelemetryGroup(g) => group_from_proto(g),
        _ => Err(unexpected(G::RESOURCE)),
    }
}

#[async_trait]
impl<G: GroupApi> Handler for TelemetryGroupHandler<G> {
    fn resource(&self) -> ResourceKind {
        G::RESOURCE
    }

    async fn create(&self, job: &Job) -> HandlerResult<Payload> {
        let fields = job.payload.cast_data::<G>()?.into_fields();
        validate_create(&fields)?;

        let created = self
            .client
            .create(
                &job.context,
                resource(ResourceVariant::TelemetryGroup(group_to_proto::<G>(fields))),
            )
            .await?;
        Payload::from_data(&expect_group::<G>(variant(Some(created))?)?)
    }

    async fn get(&self, job: &Job) -> HandlerResult<Payload> {
        let id = resource_id(job)?;
        let found = self.client.get(&job.context, &id).await?;
        Payload::from_data(&expect_group::<G>(variant(Some(found))?)?)
    }

    /// Groups are immutable; change a profile to point at a new group instead.
    async fn update(&self, job: &Job) -> HandlerResult<Payload> {
        Err(unsupported(G::RESOURCE, job.operation))
    }

    async fn delete(&self, job: &Job) -> HandlerResult<Payload> {
        let id = resource_id(job)?;
        self.client.delete(&job.context, &id).await?;
        Ok(Payload::empty())
    }

    async fn list(&self, job: &Job) -> HandlerResult<Payload> {
        let params: TelemetryGroupListParams = job.payload.cast_data_or_default()?;
        let page = parse_pagination(params.page_size, params.offset)?;

        let response = self
            .client
            .list(
                &job.context,
                resource_filter(
                    ResourceVariant::TelemetryGroup(TelemetryGroupResource::default()),
                    filter::telemetry_kind(G::KIND),
                    params.order_by,
                    page,
                ),
            )
            .await?;

        let items = response
            .resources
            .into_iter()
            .map(|r| expect_group::<G>(variant(r.resource)?))
            .collect::<HandlerResult<Vec<_>>>()?;

        Payload::from_data(&G::list(items, response.has_next, response.total_elements))
    }
}
