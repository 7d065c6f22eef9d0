use super::{GroupApi, GroupFields, ProfileApi, ProfileFields};
use crate::api::{
    TelemetryMetricsGroup, TelemetryMetricsGroupList, TelemetryMetricsProfile,
    TelemetryMetricsProfileList,
};
use crate::error::{HandlerError, HandlerResult};
use crate::job::ResourceKind;
use crate::relation::Relation;
use invgw_proto::{TelemetryProfile, TelemetryResourceKind};

impl GroupApi for TelemetryMetricsGroup {
    const RESOURCE: ResourceKind = ResourceKind::TelemetryMetricsGroup;
    const KIND: TelemetryResourceKind = TelemetryResourceKind::Metrics;

    type List = TelemetryMetricsGroupList;

    fn into_fields(self) -> GroupFields {
        GroupFields {
            id: self.telemetry_metrics_group_id,
            name: self.name,
            collector_kind: self.collector_kind,
            groups: self.groups,
            timestamps: self.timestamps,
        }
    }

    fn from_fields(fields: GroupFields) -> Self {
        Self {
            telemetry_metrics_group_id: fields.id,
            name: fields.name,
            collector_kind: fields.collector_kind,
            groups: fields.groups,
            timestamps: fields.timestamps,
        }
    }

    fn list(items: Vec<Self>, has_next: bool, total_elements: i32) -> Self::List {
        TelemetryMetricsGroupList {
            telemetry_metrics_groups: items,
            has_next,
            total_elements,
        }
    }
}

impl ProfileApi for TelemetryMetricsProfile {
    const RESOURCE: ResourceKind = ResourceKind::TelemetryMetricsProfile;
    const KIND: TelemetryResourceKind = TelemetryResourceKind::Metrics;
    const GROUP_ID_FIELD: &'static str = "metricsGroupId";

    type Group = TelemetryMetricsGroup;
    type List = TelemetryMetricsProfileList;

    fn relation(&self) -> Relation<'_> {
        Relation::new(
            self.target_instance.as_deref(),
            self.target_site.as_deref(),
            self.target_region.as_deref(),
        )
    }

    fn group_id(&self) -> Option<&str> {
        self.metrics_group_id.as_deref()
    }

    fn validate_create(&self) -> HandlerResult<()> {
        match self.metrics_interval {
            Some(interval) if interval > 0 => Ok(()),
            _ => Err(HandlerError::invalid_argument(
                "metricsInterval must be greater than 0",
            )),
        }
    }

    fn apply_specific(&self, profile: &mut TelemetryProfile) {
        profile.metrics_interval = self.metrics_interval.unwrap_or_default();
    }

    fn from_parts(fields: ProfileFields<Self::Group>, profile: &TelemetryProfile) -> Self {
        Self {
            profile_id: fields.profile_id,
            target_instance: fields.target_instance,
            target_site: fields.target_site,
            target_region: fields.target_region,
            metrics_interval: Some(profile.metrics_interval),
            metrics_group_id: fields.group_id,
            metrics_group: fields.group,
            timestamps: fields.timestamps,
        }
    }

    fn list(items: Vec<Self>, has_next: bool, total_elements: i32) -> Self::List {
        TelemetryMetricsProfileList {
            telemetry_metrics_profiles: items,
            has_next,
            total_elements,
        }
    }
}
