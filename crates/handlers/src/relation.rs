//! Telemetry profile target relation
//!
//! A profile applies to exactly one instance, site or region. The REST surface
//! carries the three candidates as independent optional ids, so the handlers
//! count them here before building anything for the backend.

use crate::error::{HandlerError, HandlerResult};
use invgw_proto::{
    InheritBy, InheritById, InstanceResource, RegionResource, SiteResource,
    TelemetryProfileRelation,
};

/// Candidate targets of a telemetry profile. Empty strings count as unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Relation<'a> {
    pub instance: Option<&'a str>,
    pub site: Option<&'a str>,
    pub region: Option<&'a str>,
}

fn set(id: Option<&str>) -> Option<&str> {
    id.filter(|s| !s.is_empty())
}

impl<'a> Relation<'a> {
    pub fn new(instance: Option<&'a str>, site: Option<&'a str>, region: Option<&'a str>) -> Self {
        Self {
            instance: set(instance),
            site: set(site),
            region: set(region),
        }
    }

    /// Set relations as `(edge, id)`, always in instance, site, region order.
    pub fn edges(&self) -> impl Iterator<Item = (&'static str, &'a str)> + '_ {
        [
            ("instance", self.instance),
            ("site", self.site),
            ("region", self.region),
        ]
        .into_iter()
        .filter_map(|(edge, id)| set(id).map(|id| (edge, id)))
    }

    pub fn count(&self) -> usize {
        self.edges().count()
    }

    /// At most one relation may be set; with `required` at least one must be.
    pub fn validate(&self, required: bool) -> HandlerResult<()> {
        match self.count() {
            0 if required => {
                tracing::warn!("telemetry profile without relation");
                Err(HandlerError::invalid_argument("no relation set"))
            }
            0 | 1 => Ok(()),
            n => {
                tracing::warn!(count = n, "telemetry profile with conflicting relations");
                Err(HandlerError::invalid_argument("more than one relation set"))
            }
        }
    }

    /// Backend oneof for a validated relation; `None` when nothing is set.
    pub fn to_proto(&self) -> Option<TelemetryProfileRelation> {
        let (edge, id) = self.edges().next()?;
        let resource_id = id.to_string();
        Some(match edge {
            "instance" => TelemetryProfileRelation::Instance(InstanceResource {
                resource_id,
                ..Default::default()
            }),
            "site" => TelemetryProfileRelation::Site(SiteResource {
                resource_id,
                ..Default::default()
            }),
            _ => TelemetryProfileRelation::Region(RegionResource {
                resource_id,
                ..Default::default()
            }),
        })
    }

    /// Key of the inherited listing. Exactly one relation must be set.
    pub fn inherit_by(&self) -> HandlerResult<InheritBy> {
        let mut edges = self.edges();
        let (edge, id) = match (edges.next(), edges.next()) {
            (Some(only), None) => only,
            (None, _) => {
                return Err(HandlerError::invalid_argument(
                    "inherited listing needs one of instanceId, siteId or regionId",
                ));
            }
            (Some(_), Some(_)) => {
                return Err(HandlerError::invalid_argument(
                    "inherited listing accepts only one of instanceId, siteId or regionId",
                ));
            }
        };

        let id = id.to_string();
        let id = match edge {
            "instance" => InheritById::InstanceId(id),
            "site" => InheritById::SiteId(id),
            _ => InheritById::RegionId(id),
        };
        Ok(InheritBy { id: Some(id) })
    }

    /// Read a relation back from the backend oneof.
    pub fn from_proto(relation: Option<&'a TelemetryProfileRelation>) -> Self {
        match relation {
            Some(TelemetryProfileRelation::Instance(r)) => {
                Self::new(Some(r.resource_id.as_str()), None, None)
            }
            Some(TelemetryProfileRelation::Site(r)) => {
                Self::new(None, Some(r.resource_id.as_str()), None)
            }
            Some(TelemetryProfileRelation::Region(r)) => {
                Self::new(None, None, Some(r.resource_id.as_str()))
            }
            None => Self::default(),
        }
    }
}
