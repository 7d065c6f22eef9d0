//! Telemetry groups and profiles
//!
//! Logs and metrics share one backend table per concept, told apart by the
//! `kind` field. The handlers are written once over [`GroupApi`] and
//! [`ProfileApi`]; `logs` and `metrics` only describe the OpenAPI shapes.

mod group;
mod logs;
mod metrics;
mod profile;

pub use group::TelemetryGroupHandler;
pub use profile::TelemetryProfileHandler;

use crate::api::{TelemetryCollectorKind, Timestamps};
use crate::error::HandlerResult;
use crate::fieldmask::FieldMapped;
use crate::job::ResourceKind;
use crate::relation::Relation;
use invgw_proto as pb;
use invgw_proto::{TelemetryProfile, TelemetryResourceKind};
use serde::{Serialize, de::DeserializeOwned};

pub type TelemetryLogsGroupHandler = TelemetryGroupHandler<crate::api::TelemetryLogsGroup>;
pub type TelemetryMetricsGroupHandler = TelemetryGroupHandler<crate::api::TelemetryMetricsGroup>;
pub type TelemetryLogsProfileHandler = TelemetryProfileHandler<crate::api::TelemetryLogsProfile>;
pub type TelemetryMetricsProfileHandler =
    TelemetryProfileHandler<crate::api::TelemetryMetricsProfile>;

/// Kind-independent fields of a telemetry group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupFields {
    pub id: Option<String>,
    pub name: Option<String>,
    pub collector_kind: Option<TelemetryCollectorKind>,
    pub groups: Option<Vec<String>>,
    pub timestamps: Option<Timestamps>,
}

/// OpenAPI shape of a logs or metrics group.
pub trait GroupApi: Serialize + DeserializeOwned + Send + Sync + 'static {
    const RESOURCE: ResourceKind;
    const KIND: TelemetryResourceKind;

    type List: Serialize;

    fn into_fields(self) -> GroupFields;
    fn from_fields(fields: GroupFields) -> Self;
    fn list(items: Vec<Self>, has_next: bool, total_elements: i32) -> Self::List;
}

/// Kind-independent fields of a telemetry profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileFields<G> {
    pub profile_id: Option<String>,
    pub target_instance: Option<String>,
    pub target_site: Option<String>,
    pub target_region: Option<String>,
    pub group_id: Option<String>,
    pub group: Option<G>,
    pub timestamps: Option<Timestamps>,
}

/// OpenAPI shape of a logs or metrics profile.
pub trait ProfileApi: FieldMapped + Serialize + DeserializeOwned + Send + Sync + 'static {
    const RESOURCE: ResourceKind;
    const KIND: TelemetryResourceKind;
    /// Field naming the referenced group in errors
    const GROUP_ID_FIELD: &'static str;

    type Group: GroupApi;
    type List: Serialize;

    fn relation(&self) -> Relation<'_>;
    fn group_id(&self) -> Option<&str>;

    /// Checks of the kind-specific fields on create.
    fn validate_create(&self) -> HandlerResult<()>;

    /// Copy the kind-specific fields onto the backend profile.
    fn apply_specific(&self, profile: &mut TelemetryProfile);

    fn from_parts(fields: ProfileFields<Self::Group>, profile: &TelemetryProfile) -> Self;
    fn list(items: Vec<Self>, has_next: bool, total_elements: i32) -> Self::List;
}

impl From<TelemetryCollectorKind> for pb::TelemetryCollectorKind {
    fn from(kind: TelemetryCollectorKind) -> Self {
        match kind {
            TelemetryCollectorKind::Unspecified => pb::TelemetryCollectorKind::Unspecified,
            TelemetryCollectorKind::Host => pb::TelemetryCollectorKind::Host,
            TelemetryCollectorKind::Cluster => pb::TelemetryCollectorKind::Cluster,
        }
    }
}

impl From<pb::TelemetryCollectorKind> for TelemetryCollectorKind {
    fn from(kind: pb::TelemetryCollectorKind) -> Self {
        match kind {
            pb::TelemetryCollectorKind::Unspecified => TelemetryCollectorKind::Unspecified,
            pb::TelemetryCollectorKind::Host => TelemetryCollectorKind::Host,
            pb::TelemetryCollectorKind::Cluster => TelemetryCollectorKind::Cluster,
        }
    }
}
