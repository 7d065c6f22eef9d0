//! Update field masks
//!
//! Every updatable API type lists its fields once: the mapping from OpenAPI
//! names to inventory field paths, and the names that must never reach a mask
//! (identity and read-only fields). Presence is enumerated by hand per type.

use crate::api::{Instance, Region, Site, TelemetryLogsProfile, TelemetryMetricsProfile};
use crate::error::{HandlerError, HandlerResult};
use invgw_proto::FieldMask;

/// OpenAPI ↔ inventory field table of an updatable type.
pub trait FieldMapped {
    /// `(openapi name, inventory field path)`, in mask order.
    const FIELD_MAP: &'static [(&'static str, &'static str)];
    /// Identity and read-only fields.
    const EXCLUDED: &'static [&'static str];
    /// Fields updated together: when one is present all are masked.
    const GROUPS: &'static [&'static [&'static str]] = &[];

    /// OpenAPI names of the fields set on this value.
    fn present_fields(&self) -> Vec<&'static str>;
}

/// Build the mask of an update.
///
/// With `partial` (Patch) only the present mapped fields are included, and an
/// empty result is rejected. Otherwise (Put) every mapped field is included.
pub fn build_field_mask<T: FieldMapped>(value: &T, partial: bool) -> HandlerResult<FieldMask> {
    if !partial {
        return Ok(FieldMask {
            paths: T::FIELD_MAP.iter().map(|(_, path)| path.to_string()).collect(),
        });
    }

    let mut present = value.present_fields();
    for name in &present {
        if T::EXCLUDED.contains(name) {
            tracing::debug!(field = *name, "read-only field ignored in patch");
        } else if !T::FIELD_MAP.iter().any(|(api, _)| api == name) {
            return Err(HandlerError::internal(format!(
                "field {name} has no inventory mapping"
            )));
        }
    }
    for group in T::GROUPS {
        if group.iter().any(|f| present.contains(f)) {
            present.extend(group.iter().copied());
        }
    }

    let paths: Vec<String> = T::FIELD_MAP
        .iter()
        .filter(|(api, _)| present.contains(api))
        .map(|(_, path)| path.to_string())
        .collect();
    if paths.is_empty() {
        return Err(HandlerError::invalid_argument("no updatable field in patch"));
    }

    tracing::debug!(?paths, "built field mask");
    Ok(FieldMask { paths })
}

fn push_if<T>(out: &mut Vec<&'static str>, name: &'static str, value: &Option<T>) {
    if value.is_some() {
        out.push(name);
    }
}

const TIMESTAMPS: &str = "timestamps";
const RELATION_GROUP: &[&str] = &["targetInstance", "targetSite", "targetRegion"];

impl FieldMapped for Region {
    const FIELD_MAP: &'static [(&'static str, &'static str)] = &[
        ("name", "name"),
        ("parentId", "parent_region"),
        ("metadata", "metadata"),
    ];
    const EXCLUDED: &'static [&'static str] = &["resourceId", "parentRegion", TIMESTAMPS];

    fn present_fields(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        push_if(&mut out, "resourceId", &self.resource_id);
        push_if(&mut out, "name", &self.name);
        push_if(&mut out, "parentId", &self.parent_id);
        push_if(&mut out, "parentRegion", &self.parent_region);
        push_if(&mut out, "metadata", &self.metadata);
        push_if(&mut out, TIMESTAMPS, &self.timestamps);
        out
    }
}

impl FieldMapped for Site {
    const FIELD_MAP: &'static [(&'static str, &'static str)] = &[
        ("name", "name"),
        ("regionId", "region"),
        ("siteLat", "site_lat"),
        ("siteLng", "site_lng"),
        ("metadata", "metadata"),
    ];
    const EXCLUDED: &'static [&'static str] = &["resourceId", "region", TIMESTAMPS];

    fn present_fields(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        push_if(&mut out, "resourceId", &self.resource_id);
        push_if(&mut out, "name", &self.name);
        push_if(&mut out, "regionId", &self.region_id);
        push_if(&mut out, "region", &self.region);
        push_if(&mut out, "siteLat", &self.site_lat);
        push_if(&mut out, "siteLng", &self.site_lng);
        push_if(&mut out, "metadata", &self.metadata);
        push_if(&mut out, TIMESTAMPS, &self.timestamps);
        out
    }
}

impl FieldMapped for Instance {
    const FIELD_MAP: &'static [(&'static str, &'static str)] = &[
        ("name", "name"),
        ("kind", "kind"),
        ("osID", "os"),
        ("desiredState", "desired_state"),
        ("securityFeature", "security_feature"),
    ];
    // host 只能在创建时指定
    const EXCLUDED: &'static [&'static str] = &[
        "resourceId",
        "hostID",
        "host",
        "os",
        "currentState",
        TIMESTAMPS,
    ];

    fn present_fields(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        push_if(&mut out, "resourceId", &self.resource_id);
        push_if(&mut out, "name", &self.name);
        push_if(&mut out, "kind", &self.kind);
        push_if(&mut out, "hostID", &self.host_id);
        push_if(&mut out, "osID", &self.os_id);
        push_if(&mut out, "desiredState", &self.desired_state);
        push_if(&mut out, "currentState", &self.current_state);
        push_if(&mut out, "securityFeature", &self.security_feature);
        push_if(&mut out, "host", &self.host);
        push_if(&mut out, "os", &self.os);
        push_if(&mut out, TIMESTAMPS, &self.timestamps);
        out
    }
}

impl FieldMapped for TelemetryLogsProfile {
    const FIELD_MAP: &'static [(&'static str, &'static str)] = &[
        ("targetInstance", "instance"),
        ("targetSite", "site"),
        ("targetRegion", "region"),
        ("logLevel", "log_level"),
        ("logsGroupId", "group"),
    ];
    const EXCLUDED: &'static [&'static str] = &["profileId", "logsGroup", TIMESTAMPS];
    const GROUPS: &'static [&'static [&'static str]] = &[RELATION_GROUP];

    fn present_fields(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        push_if(&mut out, "profileId", &self.profile_id);
        push_if(&mut out, "targetInstance", &self.target_instance);
        push_if(&mut out, "targetSite", &self.target_site);
        push_if(&mut out, "targetRegion", &self.target_region);
        push_if(&mut out, "logLevel", &self.log_level);
        push_if(&mut out, "logsGroupId", &self.logs_group_id);
        push_if(&mut out, "logsGroup", &self.logs_group);
        push_if(&mut out, TIMESTAMPS, &self.timestamps);
        out
    }
}

impl FieldMapped for TelemetryMetricsProfile {
    const FIELD_MAP: &'static [(&'static str, &'static str)] = &[
        ("targetInstance", "instance"),
        ("targetSite", "site"),
        ("targetRegion", "region"),
        ("metricsInterval", "metrics_interval"),
        ("metricsGroupId", "group"),
    ];
    const EXCLUDED: &'static [&'static str] = &["profileId", "metricsGroup", TIMESTAMPS];
    const GROUPS: &'static [&'static [&'static str]] = &[RELATION_GROUP];

    fn present_fields(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        push_if(&mut out, "profileId", &self.profile_id);
        push_if(&mut out, "targetInstance", &self.target_instance);
        push_if(&mut out, "targetSite", &self.target_site);
        push_if(&mut out, "targetRegion", &self.target_region);
        push_if(&mut out, "metricsInterval", &self.metrics_interval);
        push_if(&mut out, "metricsGroupId", &self.metrics_group_id);
        push_if(&mut out, "metricsGroup", &self.metrics_group);
        push_if(&mut out, TIMESTAMPS, &self.timestamps);
        out
    }
}
