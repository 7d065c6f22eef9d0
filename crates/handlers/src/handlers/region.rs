use super::{
    Handler, metadata_from_proto, metadata_to_proto, require_non_empty, resource,
    resource_filter, resource_id, unexpected, variant,
};
use crate::api::{Region, RegionList, RegionListParams, Timestamps, non_empty};
use crate::client::InventoryClient;
use crate::error::HandlerResult;
use crate::fieldmask::build_field_mask;
use crate::filter;
use crate::job::{Job, Payload, ResourceKind};
use crate::pagination::parse_pagination;
use async_trait::async_trait;
use invgw_proto::{RegionResource, ResourceVariant};
use std::sync::Arc;

pub struct RegionHandler {
    client: Arc<dyn InventoryClient>,
}

impl RegionHandler {
    pub fn new(client: Arc<dyn InventoryClient>) -> Self {
        Self { client }
    }
}

pub(crate) fn region_to_proto(region: &Region) -> HandlerResult<RegionResource> {
    Ok(RegionResource {
        name: region.name.clone().unwrap_or_default(),
        parent_region: region
            .parent_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| {
                Box::new(RegionResource {
                    resource_id: id.to_string(),
                    ..Default::default()
                })
            }),
        metadata: metadata_to_proto(region.metadata.as_ref())?,
        ..Default::default()
    })
}

/// Convert an inventory region, following its eagerly loaded parent chain.
pub(crate) fn region_from_proto(region: RegionResource) -> HandlerResult<Region> {
    let parent_region = match region.parent_region {
        Some(parent) => Some(Box::new(region_from_proto(*parent)?)),
        None => None,
    };
    Ok(Region {
        resource_id: non_empty(&region.resource_id),
        name: non_empty(&region.name),
        parent_id: parent_region.as_ref().and_then(|p| p.resource_id.clone()),
        parent_region,
        metadata: metadata_from_proto(&region.metadata)?,
        timestamps: Timestamps::from_backend(&region.created_at, &region.updated_at),
    })
}

fn expect_region(variant: ResourceVariant) -> HandlerResult<RegionResource> {
    match variant {
        ResourceVariant::Region(r) => Ok(r),
        _ => Err(unexpected(ResourceKind::Region)),
    }
}

#[async_trait]
impl Handler for RegionHandler {
    fn resource(&self) -> ResourceKind {
        ResourceKind::Region
    }

    async fn create(&self, job: &Job) -> HandlerResult<Payload> {
        let body: Region = job.payload.cast_data()?;
        require_non_empty(body.name.as_deref(), "name")?;

        let created = self
            .client
            .create(&job.context, resource(ResourceVariant::Region(region_to_proto(&body)?)))
            .await?;
        let region = region_from_proto(expect_region(variant(Some(created))?)?)?;
        Payload::from_data(&region)
    }

    async fn get(&self, job: &Job) -> HandlerResult<Payload> {
        let id = resource_id(job)?;
        let found = self.client.get(&job.context, &id).await?;
        let region = region_from_proto(expect_region(variant(Some(found))?)?)?;
        Payload::from_data(&region)
    }

    async fn update(&self, job: &Job) -> HandlerResult<Payload> {
        let id = resource_id(job)?;
        let body: Region = job.payload.cast_data()?;
        if !job.is_patch() {
            require_non_empty(body.name.as_deref(), "name")?;
        }
        let mask = build_field_mask(&body, job.is_patch())?;

        let updated = self
            .client
            .update(
                &job.context,
                &id,
                mask,
                resource(ResourceVariant::Region(region_to_proto(&body)?)),
            )
            .await?;
        let region = region_from_proto(expect_region(variant(Some(updated))?)?)?;
        Payload::from_data(&region)
    }

    async fn delete(&self, job: &Job) -> HandlerResult<Payload> {
        let id = resource_id(job)?;
        self.client.delete(&job.context, &id).await?;
        Ok(Payload::empty())
    }

    async fn list(&self, job: &Job) -> HandlerResult<Payload> {
        let params: RegionListParams = job.payload.cast_data_or_default()?;
        let page = parse_pagination(params.page_size, params.offset)?;

        let parent = params
            .parent
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| filter::edge_eq("parent_region", "resource_id", p));
        let filter = filter::and_all(params.filter.into_iter().chain(parent));

        let response = self
            .client
            .list(
                &job.context,
                resource_filter(
                    ResourceVariant::Region(RegionResource::default()),
                    filter,
                    params.order_by,
                    page,
                ),
            )
            .await?;

        let regions = response
            .resources
            .into_iter()
            .map(|r| region_from_proto(expect_region(variant(r.resource)?)?))
            .collect::<HandlerResult<Vec<_>>>()?;

        Payload::from_data(&RegionList {
            regions,
            has_next: response.has_next,
            total_elements: response.total_elements,
        })
    }
}
