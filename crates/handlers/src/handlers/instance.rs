use super::{
    Handler, require_non_empty, resource, resource_filter, resource_id, unexpected, variant,
};
use crate::api::{
    HostSummary, Instance, InstanceKind, InstanceList, InstanceListParams, InstanceState,
    OsSummary, SecurityFeature, Timestamps, non_empty,
};
use crate::client::InventoryClient;
use crate::error::HandlerResult;
use crate::fieldmask::build_field_mask;
use crate::filter;
use crate::job::{Job, Payload, ResourceKind};
use crate::pagination::parse_pagination;
use async_trait::async_trait;
use invgw_proto as pb;
use invgw_proto::{HostResource, InstanceResource, OperatingSystemResource, ResourceVariant};
use std::sync::Arc;

pub struct InstanceHandler {
    client: Arc<dyn InventoryClient>,
}

impl InstanceHandler {
    pub fn new(client: Arc<dyn InventoryClient>) -> Self {
        Self { client }
    }
}

impl From<InstanceKind> for pb::InstanceKind {
    fn from(kind: InstanceKind) -> Self {
        match kind {
            InstanceKind::Unspecified => pb::InstanceKind::Unspecified,
            InstanceKind::Metal => pb::InstanceKind::Metal,
        }
    }
}

impl From<pb::InstanceKind> for InstanceKind {
    fn from(kind: pb::InstanceKind) -> Self {
        match kind {
            pb::InstanceKind::Unspecified => InstanceKind::Unspecified,
            pb::InstanceKind::Metal => InstanceKind::Metal,
        }
    }
}

impl From<InstanceState> for pb::InstanceState {
    fn from(state: InstanceState) -> Self {
        match state {
            InstanceState::Unspecified => pb::InstanceState::Unspecified,
            InstanceState::Running => pb::InstanceState::Running,
            InstanceState::Deleted => pb::InstanceState::Deleted,
            InstanceState::Untrusted => pb::InstanceState::Untrusted,
        }
    }
}

impl From<pb::InstanceState> for InstanceState {
    fn from(state: pb::InstanceState) -> Self {
        match state {
            pb::InstanceState::Unspecified => InstanceState::Unspecified,
            pb::InstanceState::Running => InstanceState::Running,
            pb::InstanceState::Deleted => InstanceState::Deleted,
            pb::InstanceState::Untrusted => InstanceState::Untrusted,
        }
    }
}

impl From<SecurityFeature> for pb::SecurityFeature {
    fn from(feature: SecurityFeature) -> Self {
        match feature {
            SecurityFeature::Unspecified => pb::SecurityFeature::Unspecified,
            SecurityFeature::None => pb::SecurityFeature::None,
            SecurityFeature::SecureBootAndFullDiskEncryption => {
                pb::SecurityFeature::SecureBootAndFullDiskEncryption
            }
        }
    }
}

impl From<pb::SecurityFeature> for SecurityFeature {
    fn from(feature: pb::SecurityFeature) -> Self {
        match feature {
            pb::SecurityFeature::Unspecified => SecurityFeature::Unspecified,
            pb::SecurityFeature::None => SecurityFeature::None,
            pb::SecurityFeature::SecureBootAndFullDiskEncryption => {
                SecurityFeature::SecureBootAndFullDiskEncryption
            }
        }
    }
}

fn instance_to_proto(instance: &Instance) -> InstanceResource {
    let reference = |id: &Option<String>| id.as_deref().filter(|s| !s.is_empty()).map(str::to_string);

    InstanceResource {
        name: instance.name.clone().unwrap_or_default(),
        kind: pb::InstanceKind::from(instance.kind.unwrap_or_default()) as i32,
        desired_state: pb::InstanceState::from(instance.desired_state.unwrap_or_default()) as i32,
        security_feature: pb::SecurityFeature::from(instance.security_feature.unwrap_or_default())
            as i32,
        host: reference(&instance.host_id).map(|resource_id| HostResource {
            resource_id,
            ..Default::default()
        }),
        os: reference(&instance.os_id).map(|resource_id| OperatingSystemResource {
            resource_id,
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub(crate) fn instance_from_proto(instance: InstanceResource) -> Instance {
    let host = instance.host.as_ref().map(|h| HostSummary {
        resource_id: h.resource_id.clone(),
        name: non_empty(&h.name),
        site_id: h.site.as_ref().and_then(|s| non_empty(&s.resource_id)),
    });
    let os = instance.os.as_ref().map(|o| OsSummary {
        resource_id: o.resource_id.clone(),
        name: non_empty(&o.name),
    });

    Instance {
        resource_id: non_empty(&instance.resource_id),
        name: non_empty(&instance.name),
        kind: Some(instance.kind().into()),
        host_id: host.as_ref().and_then(|h| non_empty(&h.resource_id)),
        os_id: os.as_ref().and_then(|o| non_empty(&o.resource_id)),
        desired_state: Some(instance.desired_state().into()),
        current_state: Some(instance.current_state().into()),
        security_feature: Some(instance.security_feature().into()),
        host,
        os,
        timestamps: Timestamps::from_backend(&instance.created_at, &instance.updated_at),
    }
}

fn expect_instance(variant: ResourceVariant) -> HandlerResult<InstanceResource> {
    match variant {
        ResourceVariant::Instance(i) => Ok(i),
        _ => Err(unexpected(ResourceKind::Instance)),
    }
}

#[async_trait]
impl Handler for InstanceHandler {
    fn resource(&self) -> ResourceKind {
        ResourceKind::Instance
    }

    async fn create(&self, job: &Job) -> HandlerResult<Payload> {
        let mut body: Instance = job.payload.cast_data()?;
        require_non_empty(body.host_id.as_deref(), "hostID")?;
        require_non_empty(body.os_id.as_deref(), "osID")?;
        body.kind.get_or_insert(InstanceKind::Metal);
        body.desired_state.get_or_insert(InstanceState::Running);

        let created = self
            .client
            .create(
                &job.context,
                resource(ResourceVariant::Instance(instance_to_proto(&body))),
            )
            .await?;
        let instance = instance_from_proto(expect_instance(variant(Some(created))?)?);
        Payload::from_data(&instance)
    }

    async fn get(&self, job: &Job) -> HandlerResult<Payload> {
        let id = resource_id(job)?;
        let found = self.client.get(&job.context, &id).await?;
        Payload::from_data(&instance_from_proto(expect_instance(variant(Some(found))?)?))
    }

    async fn update(&self, job: &Job) -> HandlerResult<Payload> {
        let id = resource_id(job)?;
        let mut body: Instance = job.payload.cast_data()?;
        if !job.is_patch() {
            body.kind.get_or_insert(InstanceKind::Metal);
        }
        let mask = build_field_mask(&body, job.is_patch())?;

        let updated = self
            .client
            .update(
                &job.context,
                &id,
                mask,
                resource(ResourceVariant::Instance(instance_to_proto(&body))),
            )
            .await?;
        Payload::from_data(&instance_from_proto(expect_instance(variant(Some(updated))?)?))
    }

    async fn delete(&self, job: &Job) -> HandlerResult<Payload> {
        let id = resource_id(job)?;
        self.client.delete(&job.context, &id).await?;
        Ok(Payload::empty())
    }

    async fn list(&self, job: &Job) -> HandlerResult<Payload> {
        let params: InstanceListParams = job.payload.cast_data_or_default()?;
        let page = parse_pagination(params.page_size, params.offset)?;

        let host = params
            .host_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| filter::edge_eq("host", "resource_id", id));
        let site = params
            .site_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| filter::edge_eq("host.site", "resource_id", id));
        let filter = filter::and_all(params.filter.into_iter().chain(host).chain(site));

        let response = self
            .client
            .list(
                &job.context,
                resource_filter(
                    ResourceVariant::Instance(InstanceResource::default()),
                    filter,
                    params.order_by,
                    page,
                ),
            )
            .await?;

        let instances = response
            .resources
            .into_iter()
            .map(|r| Ok(instance_from_proto(expect_instance(variant(r.resource)?)?)))
            .collect::<HandlerResult<Vec<_>>>()?;

        Payload::from_data(&InstanceList {
            instances,
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
    use invgw_proto::SiteResource;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_defaults() {
        let mock = Arc::new(MockInventory::default());
        let handler = InstanceHandler::new(mock.clone());
        let job = Job::new(
            Operation::Post,
            ResourceKind::Instance,
            Payload::new(
                Some(json!({"name": "edge-node", "hostID": "host-1", "osID": "os-1"})),
                None,
            ),
        );

        let out = handler.create(&job).await.unwrap().data.unwrap();
        assert_eq!(out["kind"], "INSTANCE_KIND_METAL");
        assert_eq!(out["desiredState"], "INSTANCE_STATE_RUNNING");
        assert_eq!(out["hostID"], "host-1");

        let Call::Create(sent) = &mock.calls()[0] else {
            panic!("expected a create call");
        };
        let Some(ResourceVariant::Instance(sent)) = &sent.resource else {
            panic!("expected an instance");
        };
        assert_eq!(sent.kind(), pb::InstanceKind::Metal);
        assert_eq!(sent.os.as_ref().map(|o| o.resource_id.as_str()), Some("os-1"));
    }

    #[tokio::test]
    async fn test_create_requires_host_and_os() {
        let handler = InstanceHandler::new(Arc::new(MockInventory::default()));
        for data in [json!({"hostID": "host-1"}), json!({"osID": "os-1"})] {
            let job = Job::new(
                Operation::Post,
                ResourceKind::Instance,
                Payload::new(Some(data), None),
            );
            assert!(handler.create(&job).await.unwrap_err().is_invalid_argument());
        }
    }

    #[tokio::test]
    async fn test_get_embeds_host_and_os() {
        let backend = InstanceResource {
            resource_id: "inst-1".into(),
            name: "edge-node".into(),
            kind: pb::InstanceKind::Metal as i32,
            current_state: pb::InstanceState::Untrusted as i32,
            host: Some(HostResource {
                resource_id: "host-1".into(),
                name: "rack-a".into(),
                site: Some(SiteResource {
                    resource_id: "site-1".into(),
                    ..Default::default()
                }),
            }),
            os: Some(OperatingSystemResource {
                resource_id: "os-1".into(),
                name: "ubuntu".into(),
            }),
            created_at: "2024-05-01T10:00:00Z".into(),
            ..Default::default()
        };
        let handler = InstanceHandler::new(Arc::new(MockInventory::with_get(resource(
            ResourceVariant::Instance(backend),
        ))));
        let job = Job::new(
            Operation::Get,
            ResourceKind::Instance,
            Payload::new(None, Some(json!({"resourceId": "inst-1"}))),
        );

        let out = handler.get(&job).await.unwrap().data.unwrap();
        assert_eq!(out["currentState"], "INSTANCE_STATE_UNTRUSTED");
        assert_eq!(out["host"]["siteId"], "site-1");
        assert_eq!(out["osID"], "os-1");
        assert_eq!(out["timestamps"]["createdAt"], "2024-05-01T10:00:00Z");
    }

    #[tokio::test]
    async fn test_patch_ignores_read_only() {
        let mock = Arc::new(MockInventory::default());
        let handler = InstanceHandler::new(mock.clone());
        let job = Job::new(
            Operation::Patch,
            ResourceKind::Instance,
            Payload::new(
                Some(json!({
                    "hostID": "host-2",
                    "osID": "os-2",
                    "currentState": "INSTANCE_STATE_RUNNING"
                })),
                Some(json!({"resourceId": "inst-1"})),
            ),
        );
        handler.update(&job).await.unwrap();

        let Call::Update(_, mask, _) = &mock.calls()[0] else {
            panic!("expected an update call");
        };
        assert_eq!(mask.paths, vec!["os"]);
    }

    #[tokio::test]
    async fn test_list_by_site() {
        let mock = Arc::new(MockInventory::default());
        let handler = InstanceHandler::new(mock.clone());
        let job = Job::new(
            Operation::List,
            ResourceKind::Instance,
            Payload::new(Some(json!({"siteId": "site-1", "pageSize": 20})), None),
        );
        handler.list(&job).await.unwrap();

        let Call::List(sent) = &mock.calls()[0] else {
            panic!("expected a list call");
        };
        assert_eq!(
            sent.filter,
            r#"has(host.site) AND host.site.resource_id = "site-1""#
        );
        assert_eq!(sent.limit, 20);
    }
}
