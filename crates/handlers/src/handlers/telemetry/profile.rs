use super::group::group_from_proto;
use super::{ProfileApi, ProfileFields};
use crate::api::{TelemetryProfileListParams, Timestamps, non_empty};
use crate::client::{InheritedProfilesQuery, InventoryClient};
use crate::error::{HandlerError, HandlerResult};
use crate::fieldmask::build_field_mask;
use crate::filter;
use crate::handlers::{
    Handler, require_non_empty, resource, resource_filter, resource_id, unexpected, variant,
};
use crate::job::{Job, Payload, ResourceKind};
use crate::pagination::{has_more, parse_pagination};
use crate::relation::Relation;
use async_trait::async_trait;
use invgw_proto::{ResourceVariant, TelemetryGroupResource, TelemetryProfile};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Handler of a telemetry profile resource (logs or metrics).
pub struct TelemetryProfileHandler<P> {
    client: Arc<dyn InventoryClient>,
    _api: PhantomData<fn() -> P>,
}

impl<P: ProfileApi> TelemetryProfileHandler<P> {
    pub fn new(client: Arc<dyn InventoryClient>) -> Self {
        Self {
            client,
            _api: PhantomData,
        }
    }

    async fn list_inherited(
        &self,
        job: &Job,
        params: TelemetryProfileListParams,
        relation: Relation<'_>,
    ) -> HandlerResult<Payload> {
        relation.validate(true)?;
        let page = parse_pagination(params.page_size, params.offset)?;
        let query = InheritedProfilesQuery {
            inherit_by: relation.inherit_by()?,
            filter: filter::telemetry_kind(P::KIND),
            order_by: params.order_by.unwrap_or_default(),
            limit: page.limit,
            offset: page.offset,
        };
        debug!(inherit_by = ?query.inherit_by, "listing inherited telemetry profiles");

        let response = self
            .client
            .list_inherited_telemetry_profiles(&job.context, query)
            .await?;

        let has_next = has_more(
            page.offset,
            response.telemetry_profiles.len(),
            response.total_elements,
        );
        let items = response
            .telemetry_profiles
            .into_iter()
            .map(profile_from_proto::<P>)
            .collect::<HandlerResult<Vec<_>>>()?;

        Payload::from_data(&P::list(items, has_next, response.total_elements))
    }
}

/// Relation and group checks shared by create and update.
fn validate_targets<P: ProfileApi>(body: &P, require_group: bool) -> HandlerResult<()> {
    body.relation().validate(true)?;
    if require_group {
        require_non_empty(body.group_id(), P::GROUP_ID_FIELD)?;
    }
    Ok(())
}

pub(crate) fn profile_to_proto<P: ProfileApi>(body: &P) -> TelemetryProfile {
    let mut profile = TelemetryProfile {
        relation: body.relation().to_proto(),
        kind: P::KIND as i32,
        group: body
            .group_id()
            .filter(|id| !id.is_empty())
            .map(|id| TelemetryGroupResource {
                resource_id: id.to_string(),
                kind: P::KIND as i32,
                ..Default::default()
            }),
        ..Default::default()
    };
    body.apply_specific(&mut profile);
    profile
}

/// Convert a backend profile, rejecting one of the other kind.
pub(crate) fn profile_from_proto<P: ProfileApi>(profile: TelemetryProfile) -> HandlerResult<P> {
    if profile.kind() != P::KIND {
        return Err(HandlerError::internal(format!(
            "inventory returned a {} profile for {}",
            profile.kind().as_str_name(),
            P::RESOURCE
        )));
    }

    let relation = Relation::from_proto(profile.relation.as_ref());
    let group = profile
        .group
        .clone()
        .map(group_from_proto::<P::Group>)
        .transpose()?;
    let fields = ProfileFields {
        profile_id: non_empty(&profile.resource_id),
        target_instance: relation.instance.map(str::to_string),
        target_site: relation.site.map(str::to_string),
        target_region: relation.region.map(str::to_string),
        group_id: profile
            .group
            .as_ref()
            .and_then(|g| non_empty(&g.resource_id)),
        group,
        timestamps: Timestamps::from_backend(&profile.created_at, &profile.updated_at),
    };
    Ok(P::from_parts(fields, &profile))
}

fn expect_profile<P: ProfileApi>(variant: ResourceVariant) -> HandlerResult<P> {
    match variant {
        ResourceVariant::TelemetryProfile(p) => profile_from_proto(p),
        _ => Err(unexpected(P::RESOURCE)),
    }
}

#[async_trait]
impl<P: ProfileApi> Handler for TelemetryProfileHandler<P> {
    fn resource(&self) -> ResourceKind {
        P::RESOURCE
    }

    async fn create(&self, job: &Job) -> HandlerResult<Payload> {
        let body: P = job.payload.cast_data()?;
        validate_targets(&body, true)?;
        body.validate_create()?;

        let created = self
            .client
            .create(
                &job.context,
                resource(ResourceVariant::TelemetryProfile(profile_to_proto(&body))),
            )
            .await?;
        Payload::from_data(&expect_profile::<P>(variant(Some(created))?)?)
    }

    async fn get(&self, job: &Job) -> HandlerResult<Payload> {
        let id = resource_id(job)?;
        let found = self.client.get(&job.context, &id).await?;
        Payload::from_data(&expect_profile::<P>(variant(Some(found))?)?)
    }

    async fn update(&self, job: &Job) -> HandlerResult<Payload> {
        let id = resource_id(job)?;
        let body: P = job.payload.cast_data()?;
        validate_targets(&body, !job.is_patch())?;
        let mask = build_field_mask(&body, job.is_patch())?;

        let updated = self
            .client
            .update(
                &job.context,
                &id,
                mask,
                resource(ResourceVariant::TelemetryProfile(profile_to_proto(&body))),
            )
            .await?;
        Payload::from_data(&expect_profile::<P>(variant(Some(updated))?)?)
    }

    async fn delete(&self, job: &Job) -> HandlerResult<Payload> {
        let id = resource_id(job)?;
        self.client.delete(&job.context, &id).await?;
        Ok(Payload::empty())
    }

    async fn list(&self, job: &Job) -> HandlerResult<Payload> {
        let params: TelemetryProfileListParams = job.payload.cast_data_or_default()?;
        let instance = params.instance_id.clone();
        let site = params.site_id.clone();
        let region = params.region_id.clone();
        let relation = Relation::new(instance.as_deref(), site.as_deref(), region.as_deref());

        if params.show_inherited.unwrap_or(false) {
            return self.list_inherited(job, params, relation).await;
        }

        relation.validate(false)?;
        let page = parse_pagination(params.page_size, params.offset)?;
        let response = self
            .client
            .list(
                &job.context,
                resource_filter(
                    ResourceVariant::TelemetryProfile(TelemetryProfile::default()),
                    filter::telemetry_profile_filter(P::KIND, &relation),
                    params.order_by,
                    page,
                ),
            )
            .await?;

        let items = response
            .resources
            .into_iter()
            .map(|r| expect_profile::<P>(variant(r.resource)?))
            .collect::<HandlerResult<Vec<_>>>()?;

        Payload::from_data(&P::list(items, response.has_next, response.total_elements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{SeverityLevel, TelemetryLogsProfile, TelemetryMetricsProfile};
    use crate::client::mock::{Call, MockInventory};
    use crate::handlers::telemetry::{TelemetryLogsProfileHandler, TelemetryMetricsProfileHandler};
    use crate::job::Operation;
    use invgw_proto::{
        InheritById, ListInheritedTelemetryProfilesResponse, SiteResource,
        TelemetryProfileRelation, TelemetryResourceKind,
    };
    use serde_json::json;

    fn logs_job(operation: Operation, data: serde_json::Value) -> Job {
        Job::new(
            operation,
            ResourceKind::TelemetryLogsProfile,
            Payload::new(Some(data), Some(json!({"resourceId": "telemetryprofile-1"}))),
        )
    }

    fn backend_profile(kind: TelemetryResourceKind) -> TelemetryProfile {
        TelemetryProfile {
            resource_id: "telemetryprofile-1".into(),
            relation: Some(TelemetryProfileRelation::Site(SiteResource {
                resource_id: "site-1".into(),
                ..Default::default()
            })),
            kind: kind as i32,
            group: Some(TelemetryGroupResource {
                resource_id: "telemetrygroup-1".into(),
                kind: kind as i32,
                ..Default::default()
            }),
            metrics_interval: 60,
            log_level: invgw_proto::SeverityLevel::Warn as i32,
            ..Default::default()
        }
    }

    #[test]
    fn test_logs_profile_mapping() {
        let api = TelemetryLogsProfile {
            target_instance: Some("inst-1".into()),
            log_level: Some(SeverityLevel::Debug),
            logs_group_id: Some("telemetrygroup-1".into()),
            ..Default::default()
        };
        let proto = profile_to_proto(&api);
        assert_eq!(proto.kind(), TelemetryResourceKind::Logs);
        assert_eq!(proto.log_level(), invgw_proto::SeverityLevel::Debug);

        let back: TelemetryLogsProfile = profile_from_proto(proto).unwrap();
        assert_eq!(back.target_instance.as_deref(), Some("inst-1"));
        assert_eq!(back.target_site, None);
        assert_eq!(back.log_level, Some(SeverityLevel::Debug));
        assert_eq!(back.logs_group_id.as_deref(), Some("telemetrygroup-1"));
    }

    #[test]
    fn test_metrics_profile_mapping() {
        let back: TelemetryMetricsProfile =
            profile_from_proto(backend_profile(TelemetryResourceKind::Metrics)).unwrap();
        assert_eq!(back.metrics_interval, Some(60));
        assert_eq!(back.target_site.as_deref(), Some("site-1"));
        assert_eq!(
            back.metrics_group
                .and_then(|g| g.telemetry_metrics_group_id)
                .as_deref(),
            Some("telemetrygroup-1")
        );

        let proto = profile_to_proto(&back_with_region());
        assert!(matches!(
            proto.relation,
            Some(TelemetryProfileRelation::Region(ref r)) if r.resource_id == "region-1"
        ));
        assert_eq!(proto.metrics_interval, 30);
    }

    fn back_with_region() -> TelemetryMetricsProfile {
        TelemetryMetricsProfile {
            target_region: Some("region-1".into()),
            metrics_interval: Some(30),
            metrics_group_id: Some("telemetrygroup-2".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_wrong_kind_is_internal() {
        let err = profile_from_proto::<TelemetryLogsProfile>(backend_profile(
            TelemetryResourceKind::Metrics,
        ))
        .unwrap_err();
        assert!(matches!(err, HandlerError::Internal(_)));
    }

    #[tokio::test]
    async fn test_create_requires_exactly_one_relation() {
        let handler = TelemetryLogsProfileHandler::new(Arc::new(MockInventory::default()));

        let none = logs_job(Operation::Post, json!({"logsGroupId": "telemetrygroup-1"}));
        let err = handler.create(&none).await.unwrap_err();
        assert!(err.to_string().contains("no relation set"));

        let two = logs_job(
            Operation::Post,
            json!({
                "targetInstance": "inst-1",
                "targetSite": "site-1",
                "logsGroupId": "telemetrygroup-1"
            }),
        );
        let err = handler.create(&two).await.unwrap_err();
        assert!(err.to_string().contains("more than one relation set"));

        let no_group = logs_job(Operation::Post, json!({"targetSite": "site-1"}));
        assert!(handler.create(&no_group).await.unwrap_err().is_invalid_argument());
    }

    #[tokio::test]
    async fn test_metrics_interval_must_be_positive() {
        let handler = TelemetryMetricsProfileHandler::new(Arc::new(MockInventory::default()));
        let job = Job::new(
            Operation::Post,
            ResourceKind::TelemetryMetricsProfile,
            Payload::new(
                Some(json!({
                    "targetRegion": "region-1",
                    "metricsGroupId": "telemetrygroup-1",
                    "metricsInterval": 0
                })),
                None,
            ),
        );
        assert!(handler.create(&job).await.unwrap_err().is_invalid_argument());
    }

    #[tokio::test]
    async fn test_patch_relation_masks_all_edges() {
        let mock = Arc::new(MockInventory::default());
        let handler = TelemetryLogsProfileHandler::new(mock.clone());
        let job = logs_job(Operation::Patch, json!({"targetRegion": "region-1"}));

        let out = handler.update(&job).await.unwrap().data.unwrap();
        assert_eq!(out["targetRegion"], "region-1");

        let Call::Update(id, mask, _) = &mock.calls()[0] else {
            panic!("expected an update call");
        };
        assert_eq!(id, "telemetryprofile-1");
        assert_eq!(mask.paths, vec!["instance", "site", "region"]);
    }

    #[tokio::test]
    async fn test_update_requires_exactly_one_relation() {
        let mock = Arc::new(MockInventory::default());
        let handler = TelemetryLogsProfileHandler::new(mock.clone());

        for operation in [Operation::Put, Operation::Patch] {
            let none = logs_job(
                operation,
                json!({"logLevel": "SEVERITY_LEVEL_INFO", "logsGroupId": "telemetrygroup-1"}),
            );
            let err = handler.update(&none).await.unwrap_err();
            assert!(err.to_string().contains("no relation set"), "{operation}: {err}");

            let two = logs_job(
                operation,
                json!({
                    "targetSite": "site-1",
                    "targetRegion": "region-1",
                    "logsGroupId": "telemetrygroup-1"
                }),
            );
            let err = handler.update(&two).await.unwrap_err();
            assert!(
                err.to_string().contains("more than one relation set"),
                "{operation}: {err}"
            );
        }
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_put_requires_group_patch_does_not() {
        let mock = Arc::new(MockInventory::default());
        let logs = TelemetryLogsProfileHandler::new(mock.clone());
        let metrics = TelemetryMetricsProfileHandler::new(mock.clone());

        let put = logs_job(Operation::Put, json!({"targetSite": "site-1"}));
        let err = logs.update(&put).await.unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("logsGroupId"), "{err}");

        let put = Job::new(
            Operation::Put,
            ResourceKind::TelemetryMetricsProfile,
            Payload::new(
                Some(json!({"targetSite": "site-1", "metricsInterval": 30})),
                Some(json!({"resourceId": "telemetryprofile-1"})),
            ),
        );
        let err = metrics.update(&put).await.unwrap_err();
        assert!(err.to_string().contains("metricsGroupId"), "{err}");
        assert!(mock.calls().is_empty());

        let patch = logs_job(Operation::Patch, json!({"targetSite": "site-1"}));
        logs.update(&patch).await.unwrap();
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_put_masks_every_mapped_field() {
        let mock = Arc::new(MockInventory::default());
        let handler = TelemetryLogsProfileHandler::new(mock.clone());
        let job = logs_job(
            Operation::Put,
            json!({
                "targetInstance": "inst-1",
                "logLevel": "SEVERITY_LEVEL_ERROR",
                "logsGroupId": "telemetrygroup-1"
            }),
        );

        let out = handler.update(&job).await.unwrap().data.unwrap();
        assert_eq!(out["targetInstance"], "inst-1");
        assert_eq!(out["logLevel"], "SEVERITY_LEVEL_ERROR");

        let Call::Update(id, mask, sent) = &mock.calls()[0] else {
            panic!("expected an update call");
        };
        assert_eq!(id, "telemetryprofile-1");
        assert_eq!(
            mask.paths,
            vec!["instance", "site", "region", "log_level", "group"]
        );
        let Some(ResourceVariant::TelemetryProfile(profile)) = &sent.resource else {
            panic!("expected a telemetry profile");
        };
        assert_eq!(
            profile.group.as_ref().map(|g| g.resource_id.as_str()),
            Some("telemetrygroup-1")
        );
    }

    #[tokio::test]
    async fn test_direct_list_filter() {
        let mock = Arc::new(MockInventory::default());
        let handler = TelemetryLogsProfileHandler::new(mock.clone());
        let job = Job::new(
            Operation::List,
            ResourceKind::TelemetryLogsProfile,
            Payload::new(Some(json!({"siteId": "site-1", "pageSize": 10, "offset": 5})), None),
        );
        let out = handler.list(&job).await.unwrap().data.unwrap();
        assert_eq!(out["telemetryLogsProfiles"], json!([]));

        let Call::List(sent) = &mock.calls()[0] else {
            panic!("expected a list call");
        };
        assert_eq!(
            sent.filter,
            r#"kind = TELEMETRY_RESOURCE_KIND_LOGS AND (has(site) AND site.resource_id = "site-1")"#
        );
        assert_eq!((sent.limit, sent.offset), (10, 5));
    }

    #[tokio::test]
    async fn test_direct_list_rejects_two_relations() {
        let handler = TelemetryLogsProfileHandler::new(Arc::new(MockInventory::default()));
        let job = Job::new(
            Operation::List,
            ResourceKind::TelemetryLogsProfile,
            Payload::new(Some(json!({"siteId": "site-1", "regionId": "region-1"})), None),
        );
        assert!(handler.list(&job).await.unwrap_err().is_invalid_argument());
    }

    #[tokio::test]
    async fn test_inherited_list() {
        let mock = Arc::new(MockInventory::with_inherited(
            ListInheritedTelemetryProfilesResponse {
                telemetry_profiles: vec![
                    backend_profile(TelemetryResourceKind::Metrics),
                    backend_profile(TelemetryResourceKind::Metrics),
                ],
                total_elements: 12,
            },
        ));
        let handler = TelemetryMetricsProfileHandler::new(mock.clone());
        let job = Job::new(
            Operation::List,
            ResourceKind::TelemetryMetricsProfile,
            Payload::new(
                Some(json!({
                    "instanceId": "inst-1",
                    "showInherited": true,
                    "pageSize": 2,
                    "offset": 10
                })),
                None,
            ),
        );

        let out = handler.list(&job).await.unwrap().data.unwrap();
        assert_eq!(out["hasNext"], false);
        assert_eq!(out["totalElements"], 12);
        assert_eq!(out["telemetryMetricsProfiles"].as_array().unwrap().len(), 2);

        let Call::ListInherited(query) = &mock.calls()[0] else {
            panic!("expected an inherited list call");
        };
        assert_eq!(query.inherit_by.id, Some(InheritById::InstanceId("inst-1".into())));
        assert_eq!(query.filter, "kind = TELEMETRY_RESOURCE_KIND_METRICS");
        assert_eq!((query.limit, query.offset), (2, 10));
    }

    #[tokio::test]
    async fn test_inherited_list_needs_one_relation() {
        let mock = Arc::new(MockInventory::default());
        let handler = TelemetryLogsProfileHandler::new(mock.clone());
        for data in [
            json!({"showInherited": true}),
            json!({"showInherited": true, "instanceId": "inst-1", "siteId": "site-1"}),
        ] {
            let job = Job::new(
                Operation::List,
                ResourceKind::TelemetryLogsProfile,
                Payload::new(Some(data), None),
            );
            assert!(handler.list(&job).await.unwrap_err().is_invalid_argument());
        }
        assert!(mock.calls().is_empty());
    }
}
