//! Location search over regions and sites
//!
//! Matches are returned as a flat node list together with their ancestor
//! chains, so a client can rebuild the part of the location tree it needs.

use super::{Handler, resource_filter, unexpected, variant};
use crate::api::{LocationNode, LocationType, LocationsParams, LocationsResponse};
use crate::client::InventoryClient;
use crate::error::{HandlerError, HandlerResult};
use crate::filter;
use crate::job::{Job, Payload, ResourceKind};
use crate::pagination::Pagination;
use async_trait::async_trait;
use invgw_proto::{RegionResource, ResourceVariant, SiteResource};
use std::collections::HashSet;
use std::sync::Arc;

/// Direct matches returned per resource kind.
pub const MAX_LOCATION_RESULTS: u32 = 20;

pub struct LocationsHandler {
    client: Arc<dyn InventoryClient>,
}

impl LocationsHandler {
    pub fn new(client: Arc<dyn InventoryClient>) -> Self {
        Self { client }
    }
}

fn parent_id(region: &RegionResource) -> Option<String> {
    region
        .parent_region
        .as_ref()
        .map(|p| p.resource_id.clone())
        .filter(|id| !id.is_empty())
}

fn region_node(region: &RegionResource) -> LocationNode {
    LocationNode {
        resource_id: region.resource_id.clone(),
        name: region.name.clone(),
        parent_id: parent_id(region),
        kind: LocationType::Region,
    }
}

fn site_node(site: &SiteResource) -> LocationNode {
    LocationNode {
        resource_id: site.resource_id.clone(),
        name: site.name.clone(),
        parent_id: site
            .region
            .as_ref()
            .map(|r| r.resource_id.clone())
            .filter(|id| !id.is_empty()),
        kind: LocationType::Site,
    }
}

/// Flat node list, hits first, then ancestors; every id appears once.
#[derive(Default)]
struct NodeSet {
    seen: HashSet<String>,
    nodes: Vec<LocationNode>,
}

impl NodeSet {
    fn push(&mut self, node: LocationNode) {
        if self.seen.insert(node.resource_id.clone()) {
            self.nodes.push(node);
        }
    }

    fn push_ancestors(&mut self, mut parent: Option<&RegionResource>) {
        while let Some(region) = parent {
            if region.resource_id.is_empty() {
                break;
            }
            self.push(region_node(region));
            parent = region.parent_region.as_deref();
        }
    }
}

impl LocationsHandler {
    async fn search(
        &self,
        job: &Job,
        empty: ResourceVariant,
        name: &str,
    ) -> HandlerResult<(Vec<ResourceVariant>, i32)> {
        let page = Pagination {
            limit: MAX_LOCATION_RESULTS,
            offset: 0,
        };
        let response = self
            .client
            .list(
                &job.context,
                resource_filter(empty, filter::contains("name", name), None, page),
            )
            .await?;
        let hits = response
            .resources
            .into_iter()
            .map(|r| variant(r.resource))
            .collect::<HandlerResult<Vec<_>>>()?;
        Ok((hits, response.total_elements))
    }
}

#[async_trait]
impl Handler for LocationsHandler {
    fn resource(&self) -> ResourceKind {
        ResourceKind::Locations
    }

    async fn list(&self, job: &Job) -> HandlerResult<Payload> {
        let params: LocationsParams = job.payload.cast_data_or_default()?;
        let name = params
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| HandlerError::invalid_argument("name is required"))?;
        let show_regions = params.show_regions.unwrap_or(false);
        let show_sites = params.show_sites.unwrap_or(false);
        if !show_regions && !show_sites {
            return Err(HandlerError::invalid_argument(
                "at least one of showRegions or showSites must be true",
            ));
        }

        let mut regions = Vec::new();
        let mut sites = Vec::new();
        let mut total_elements = 0;

        if show_regions {
            let (hits, total) = self
                .search(job, ResourceVariant::Region(RegionResource::default()), name)
                .await?;
            for hit in hits {
                match hit {
                    ResourceVariant::Region(r) => regions.push(r),
                    _ => return Err(unexpected(ResourceKind::Region)),
                }
            }
            total_elements += total;
        }
        if show_sites {
            let (hits, total) = self
                .search(job, ResourceVariant::Site(SiteResource::default()), name)
                .await?;
            for hit in hits {
                match hit {
                    ResourceVariant::Site(s) => sites.push(s),
                    _ => return Err(unexpected(ResourceKind::Site)),
                }
            }
            total_elements += total;
        }

        let mut set = NodeSet::default();
        regions.iter().for_each(|r| set.push(region_node(r)));
        sites.iter().for_each(|s| set.push(site_node(s)));
        let output_elements = i32::try_from(set.nodes.len())?;

        for region in &regions {
            set.push_ancestors(region.parent_region.as_deref());
        }
        for site in &sites {
            set.push_ancestors(site.region.as_ref());
        }

        Payload::from_data(&LocationsResponse {
            nodes: set.nodes,
            output_elements,
            total_elements,
        })
    }
}
