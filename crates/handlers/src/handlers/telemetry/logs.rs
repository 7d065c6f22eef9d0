use super::{GroupApi, GroupFields, ProfileApi, ProfileFields};
use crate::api::{
    SeverityLevel, TelemetryLogsGroup, TelemetryLogsGroupList, TelemetryLogsProfile,
    TelemetryLogsProfileList,
};
use crate::error::HandlerResult;
use crate::job::ResourceKind;
use crate::relation::Relation;
use invgw_proto as pb;
use invgw_proto::{TelemetryProfile, TelemetryResourceKind};

impl From<SeverityLevel> for pb::SeverityLevel {
    fn from(level: SeverityLevel) -> Self {
        match level {
            SeverityLevel::Unspecified => pb::SeverityLevel::Unspecified,
            SeverityLevel::Critical => pb::SeverityLevel::Critical,
            SeverityLevel::Error => pb::SeverityLevel::Error,
            SeverityLevel::Warn => pb::SeverityLevel::Warn,
            SeverityLevel::Info => pb::SeverityLevel::Info,
            SeverityLevel::Debug => pb::SeverityLevel::Debug,
        }
    }
}

impl From<pb::SeverityLevel> for SeverityLevel {
    fn from(level: pb::SeverityLevel) -> Self {
        match level {
            pb::SeverityLevel::Unspecified => SeverityLevel::Unspecified,
            pb::SeverityLevel::Critical => SeverityLevel::Critical,
            pb::SeverityLevel::Error => SeverityLevel::Error,
            pb::SeverityLevel::Warn => SeverityLevel::Warn,
            pb::SeverityLevel::Info => SeverityLevel::Info,
            pb::SeverityLevel::Debug => SeverityLevel::Debug,
        }
    }
}

impl GroupApi for TelemetryLogsGroup {
    const RESOURCE: ResourceKind = ResourceKind::TelemetryLogsGroup;
    const KIND: TelemetryResourceKind = TelemetryResourceKind::Logs;

    type List = TelemetryLogsGroupList;

    fn into_fields(self) -> GroupFields {
        GroupFields {
            id: self.telemetry_logs_group_id,
            name: self.name,
            collector_kind: self.collector_kind,
            groups: self.groups,
            timestamps: self.timestamps,
        }
    }

    fn from_fields(fields: GroupFields) -> Self {
        Self {
            telemetry_logs_group_id: fields.id,
            name: fields.name,
            collector_kind: fields.collector_kind,
            groups: fields.groups,
            timestamps: fields.timestamps,
        }
    }

    fn list(items: Vec<Self>, has_next: bool, total_elements: i32) -> Self::List {
        TelemetryLogsGroupList {
            telemetry_logs_groups: items,
            has_next,
            total_elements,
        }
    }
}

impl ProfileApi for TelemetryLogsProfile {
    const RESOURCE: ResourceKind = ResourceKind::TelemetryLogsProfile;
    const KIND: TelemetryResourceKind = TelemetryResourceKind::Logs;
    const GROUP_ID_FIELD: &'static str = "logsGroupId";

    type Group = TelemetryLogsGroup;
    type List = TelemetryLogsProfileList;

    fn relation(&self) -> Relation<'_> {
        Relation::new(
            self.target_instance.as_deref(),
            self.target_site.as_deref(),
            self.target_region.as_deref(),
        )
    }

    fn group_id(&self) -> Option<&str> {
        self.logs_group_id.as_deref()
    }

    fn validate_create(&self) -> HandlerResult<()> {
        Ok(())
    }

    fn apply_specific(&self, profile: &mut TelemetryProfile) {
        profile.log_level = pb::SeverityLevel::from(self.log_level.unwrap_or_default()) as i32;
    }

    fn from_parts(fields: ProfileFields<Self::Group>, profile: &TelemetryProfile) -> Self {
        Self {
            profile_id: fields.profile_id,
            target_instance: fields.target_instance,
            target_site: fields.target_site,
            target_region: fields.target_region,
            log_level: Some(profile.log_level().into()),
            logs_group_id: fields.group_id,
            logs_group: fields.group,
            timestamps: fields.timestamps,
        }
    }

    fn list(items: Vec<Self>, has_next: bool, total_elements: i32) -> Self::List {
        TelemetryLogsProfileList {
            telemetry_logs_profiles: items,
            has_next,
            total_elements,
        }
    }
}
