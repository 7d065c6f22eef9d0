use super::region::region_from_proto;
use super::{
    Handler, metadata_from_proto, metadata_to_proto, require_non_empty, resource,
    resource_filter, resource_id, unexpected, variant,
};
use crate::api::{Site, SiteList, SiteListParams, Timestamps, non_empty};
use crate::client::InventoryClient;
use crate::error::HandlerResult;
use crate::fieldmask::build_field_mask;
use crate::filter;
use crate::job::{Job, Payload, ResourceKind};
use crate::pagination::parse_pagination;
use async_trait::async_trait;
use invgw_proto::{RegionResource, ResourceVariant, SiteResource};
use std::sync::Arc;

pub struct SiteHandler {
    client: Arc<dyn InventoryClient>,
}

impl SiteHandler {
    pub fn new(client: Arc<dyn InventoryClient>) -> Self {
        Self { client }
    }
}

fn site_to_proto(site: &Site) -> HandlerResult<SiteResource> {
    Ok(SiteResource {
        name: site.name.clone().unwrap_or_default(),
        region: site
            .region_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| RegionResource {
                resource_id: id.to_string(),
                ..Default::default()
            }),
        site_lat: site.site_lat.unwrap_or_default(),
        site_lng: site.site_lng.unwrap_or_default(),
        metadata: metadata_to_proto(site.metadata.as_ref())?,
        ..Default::default()
    })
}

pub(crate) fn site_from_proto(site: SiteResource) -> HandlerResult<Site> {
    let region = site.region.map(region_from_proto).transpose()?;
    Ok(Site {
        resource_id: non_empty(&site.resource_id),
        name: non_empty(&site.name),
        region_id: region.as_ref().and_then(|r| r.resource_id.clone()),
        region,
        site_lat: Some(site.site_lat),
        site_lng: Some(site.site_lng),
        metadata: metadata_from_proto(&site.metadata)?,
        timestamps: Timestamps::from_backend(&site.created_at, &site.updated_at),
    })
}

fn expect_site(variant: ResourceVariant) -> HandlerResult<SiteResource> {
    match variant {
        ResourceVariant::Site(s) => Ok(s),
        _ => Err(unexpected(ResourceKind::Site)),
    }
}

#[async_trait]
impl Handler for SiteHandler {
    fn resource(&self) -> ResourceKind {
        ResourceKind::Site
    }

    async fn create(&self, job: &Job) -> HandlerResult<Payload> {
        let body: Site = job.payload.cast_data()?;
        require_non_empty(body.name.as_deref(), "name")?;

        let created = self
            .client
            .create(&job.context, resource(ResourceVariant::Site(site_to_proto(&body)?)))
            .await?;
        Payload::from_data(&site_from_proto(expect_site(variant(Some(created))?)?)?)
    }

    async fn get(&self, job: &Job) -> HandlerResult<Payload> {
        let id = resource_id(job)?;
        let found = self.client.get(&job.context, &id).await?;
        Payload::from_data(&site_from_proto(expect_site(variant(Some(found))?)?)?)
    }

    async fn update(&self, job: &Job) -> HandlerResult<Payload> {
        let id = resource_id(job)?;
        let body: Site = job.payload.cast_data()?;
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
                resource(ResourceVariant::Site(site_to_proto(&body)?)),
            )
            .await?;
        Payload::from_data(&site_from_proto(expect_site(variant(Some(updated))?)?)?)
    }

    async fn delete(&self, job: &Job) -> HandlerResult<Payload> {
        let id = resource_id(job)?;
        self.client.delete(&job.context, &id).await?;
        Ok(Payload::empty())
    }

    async fn list(&self, job: &Job) -> HandlerResult<Payload> {
        let params: SiteListParams = job.payload.cast_data_or_default()?;
        let page = parse_pagination(params.page_size, params.offset)?;

        let region = params
            .region_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| filter::edge_eq("region", "resource_id", id));
        let filter = filter::and_all(params.filter.into_iter().chain(region));

        let response = self
            .client
            .list(
                &job.context,
                resource_filter(
                    ResourceVariant::Site(SiteResource::default()),
                    filter,
                    params.order_by,
                    page,
                ),
            )
            .await?;

        let sites = response
            .resources
            .into_iter()
            .map(|r| site_from_proto(expect_site(variant(r.resource)?)?))
            .collect::<HandlerResult<Vec<_>>>()?;

        Payload::from_data(&SiteList {
            sites,
            has_next: response.has_next,
            total_elements: response.total_elements,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::{Call, MockInventory};
    use crate::job::Operation;
    use serde_json::json;
    use tonic::{Code, Status};

    #[tokio::test]
    async fn test_create_site() {
        let mock = Arc::new(MockInventory::default());
        let handler = SiteHandler::new(mock.clone());
        let job = Job::new(
            Operation::Post,
            ResourceKind::Site,
            Payload::new(
                Some(json!({
                    "name": "berlin-1",
                    "regionId": "region-de",
                    "siteLat": 525200066,
                    "siteLng": 134049540
                })),
                None,
            ),
        );

        let out = handler.create(&job).await.unwrap().data.unwrap();
        assert_eq!(out["regionId"], "region-de");
        assert_eq!(out["siteLat"], 525200066);

        let Call::Create(sent) = &mock.calls()[0] else {
            panic!("expected a create call");
        };
        let Some(ResourceVariant::Site(sent)) = &sent.resource else {
            panic!("expected a site");
        };
        assert_eq!(sent.site_lng, 134049540);
        assert_eq!(
            sent.region.as_ref().map(|r| r.resource_id.as_str()),
            Some("region-de")
        );
    }

    #[tokio::test]
    async fn test_create_requires_name() {
        let handler = SiteHandler::new(Arc::new(MockInventory::default()));
        let job = Job::new(
            Operation::Post,
            ResourceKind::Site,
            Payload::new(Some(json!({"name": ""})), None),
        );
        assert!(handler.create(&job).await.unwrap_err().is_invalid_argument());
    }

    #[tokio::test]
    async fn test_put_masks_every_field() {
        let mock = Arc::new(MockInventory::default());
        let handler = SiteHandler::new(mock.clone());
        let job = Job::new(
            Operation::Put,
            ResourceKind::Site,
            Payload::new(
                Some(json!({"name": "berlin-1"})),
                Some(json!({"resourceId": "site-1"})),
            ),
        );
        handler.update(&job).await.unwrap();

        let Call::Update(_, mask, _) = &mock.calls()[0] else {
            panic!("expected an update call");
        };
        assert_eq!(mask.paths.len(), 5);
        assert!(mask.paths.contains(&"region".to_string()));
    }

    #[tokio::test]
    async fn test_backend_error_passes_through() {
        let handler = SiteHandler::new(Arc::new(MockInventory::failing(Status::not_found(
            "site-9 not found",
        ))));
        let job = Job::new(
            Operation::Delete,
            ResourceKind::Site,
            Payload::new(None, Some(json!({"resourceId": "site-9"}))),
        );
        let err = handler.delete(&job).await.unwrap_err();
        assert_eq!(err.code(), Code::NotFound);
    }

    #[tokio::test]
    async fn test_list_combines_filters() {
        let mock = Arc::new(MockInventory::default());
        let handler = SiteHandler::new(mock.clone());
        let job = Job::new(
            Operation::List,
            ResourceKind::Site,
            Payload::new(
                Some(json!({"regionId": "region-de", "filter": "name = \"berlin-1\""})),
                None,
            ),
        );
        let out = handler.list(&job).await.unwrap().data.unwrap();
        assert_eq!(out["sites"], json!([]));

        let Call::List(sent) = &mock.calls()[0] else {
            panic!("expected a list call");
        };
        assert_eq!(
            sent.filter,
            r#"(name = "berlin-1") AND (has(region) AND region.resource_id = "region-de")"#
        );
        assert_eq!(sent.limit, 0);
    }
}
