use super::{MetadataItem, Timestamps};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Region {
    /// Read-only.
    pub resource_id: Option<String>,
    pub name: Option<String>,
    pub parent_id: Option<String>,
    /// Read-only, the parent chain as loaded by the inventory.
    pub parent_region: Option<Box<Region>>,
    pub metadata: Option<Vec<MetadataItem>>,
    /// Read-only.
    pub timestamps: Option<Timestamps>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegionListParams {
    pub page_size: Option<i32>,
    pub offset: Option<i32>,
    pub order_by: Option<String>,
    pub filter: Option<String>,
    /// Only regions whose direct parent is this region
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionList {
    pub regions: Vec<Region>,
    pub has_next: bool,
    pub total_elements: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Site {
    /// Read-only.
    pub resource_id: Option<String>,
    pub name: Option<String>,
    pub region_id: Option<String>,
    /// Read-only.
    pub region: Option<Region>,
    /// Latitude in 1e-7 degrees.
    pub site_lat: Option<i32>,
    /// Longitude in 1e-7 degrees.
    pub site_lng: Option<i32>,
    pub metadata: Option<Vec<MetadataItem>>,
    /// Read-only.
    pub timestamps: Option<Timestamps>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SiteListParams {
    pub page_size: Option<i32>,
    pub offset: Option<i32>,
    pub order_by: Option<String>,
    pub filter: Option<String>,
    pub region_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteList {
    pub sites: Vec<Site>,
    pub has_next: bool,
    pub total_elements: i32,
}

/// Query of the location search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LocationsParams {
    pub name: Option<String>,
    pub show_sites: Option<bool>,
    pub show_regions: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationType {
    #[serde(rename = "RESOURCE_KIND_REGION")]
    Region,
    #[serde(rename = "RESOURCE_KIND_SITE")]
    Site,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationNode {
    pub resource_id: String,
    pub name: String,
    pub parent_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: LocationType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationsResponse {
    pub nodes: Vec<LocationNode>,
    /// Number of direct matches in `nodes`; the rest are their ancestors.
    pub output_elements: i32,
    pub total_elements: i32,
}
