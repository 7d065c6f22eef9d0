//! Inventory 客户端
//!
//! Handlers talk to the inventory only through [`InventoryClient`]. The gRPC
//! implementation forwards the request context of each job: tenant in the
//! request message, request id as `x-request-id` metadata, deadline as the
//! gRPC timeout.

use crate::error::{HandlerError, HandlerResult};
use crate::job::RequestContext;
use async_trait::async_trait;
use invgw_common::InventoryConfig;
use invgw_proto::{
    CreateResourceRequest, DeleteResourceRequest, FieldMask, GetResourceRequest, InheritBy,
    InventoryServiceClient, ListInheritedTelemetryProfilesRequest,
    ListInheritedTelemetryProfilesResponse, ListResourcesRequest, ListResourcesResponse, Resource,
    ResourceFilter, UpdateResourceRequest,
};
use std::time::Duration;
use tonic::metadata::AsciiMetadataValue;
use tonic::transport::{Certificate, Channel, ClientTlsConfig, Endpoint, Identity};
use tracing::{debug, info};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Arguments of `ListInheritedTelemetryProfiles`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InheritedProfilesQuery {
    pub inherit_by: InheritBy,
    pub filter: String,
    pub order_by: String,
    pub limit: u32,
    pub offset: u32,
}

/// The inventory operations the handlers depend on.
#[async_trait]
pub trait InventoryClient: Send + Sync {
    async fn create(&self, ctx: &RequestContext, resource: Resource) -> HandlerResult<Resource>;

    async fn get(&self, ctx: &RequestContext, resource_id: &str) -> HandlerResult<Resource>;

    async fn update(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        field_mask: FieldMask,
        resource: Resource,
    ) -> HandlerResult<Resource>;

    async fn delete(&self, ctx: &RequestContext, resource_id: &str) -> HandlerResult<()>;

    async fn list(
        &self,
        ctx: &RequestContext,
        filter: ResourceFilter,
    ) -> HandlerResult<ListResourcesResponse>;

    async fn list_inherited_telemetry_profiles(
        &self,
        ctx: &RequestContext,
        query: InheritedProfilesQuery,
    ) -> HandlerResult<ListInheritedTelemetryProfilesResponse>;
}

/// Inventory gRPC 客户端
#[derive(Debug, Clone)]
pub struct GrpcInventoryClient {
    client: InventoryServiceClient<Channel>,
    client_uuid: String,
    default_tenant: Option<String>,
    /// Deadline of jobs that carry none
    default_timeout: Duration,
}

impl GrpcInventoryClient {
    /// 连接 inventory 服务
    pub async fn connect(config: &InventoryConfig) -> HandlerResult<Self> {
        // 只限制建连；每次调用的 deadline 由 request() 按 job 设置
        let mut endpoint = Endpoint::from_shared(config.endpoint.clone())
            .map_err(|e| HandlerError::Config(format!("Invalid endpoint: {e}")))?
            .connect_timeout(Duration::from_secs(config.timeout_seconds));

        if config.enable_tls {
            let tls_config = Self::build_tls_config(config)?;
            endpoint = endpoint.tls_config(tls_config)?;
            info!("TLS enabled for inventory gRPC client");
        }

        let channel = endpoint.connect().await?;
        info!("Connected to inventory at {}", config.endpoint);

        Ok(Self::from_channel(channel, config))
    }

    /// Wrap an existing channel.
    pub fn from_channel(channel: Channel, config: &InventoryConfig) -> Self {
        Self {
            client: InventoryServiceClient::new(channel),
            client_uuid: config.client_uuid.clone(),
            default_tenant: config.default_tenant.clone(),
            default_timeout: Duration::from_secs(config.timeout_seconds),
        }
    }

    fn build_tls_config(config: &InventoryConfig) -> HandlerResult<ClientTlsConfig> {
        let tls_domain = config.tls_domain.as_ref().ok_or_else(|| {
            HandlerError::Config("tls_domain is required when enable_tls is true".to_string())
        })?;

        let mut tls_config = ClientTlsConfig::new().domain_name(tls_domain);
        debug!("Configuring TLS with domain: {}", tls_domain);

        if let Some(ca_cert_path) = &config.ca_cert {
            let ca_cert_pem = std::fs::read(ca_cert_path).map_err(|e| {
                HandlerError::Config(format!(
                    "Failed to read CA certificate from {ca_cert_path}: {e}"
                ))
            })?;
            tls_config = tls_config.ca_certificate(Certificate::from_pem(ca_cert_pem));
        }

        match (&config.client_cert, &config.client_key) {
            (Some(cert_path), Some(key_path)) => {
                let cert = std::fs::read(cert_path).map_err(|e| {
                    HandlerError::Config(format!(
                        "Failed to read client certificate from {cert_path}: {e}"
                    ))
                })?;
                let key = std::fs::read(key_path).map_err(|e| {
                    HandlerError::Config(format!(
                        "Failed to read client private key from {key_path}: {e}"
                    ))
                })?;
                tls_config = tls_config.identity(Identity::from_pem(cert, key));
                info!("mTLS enabled: client certificate and key loaded");
            }
            (None, None) => {}
            _ => {
                return Err(HandlerError::Config(
                    "Both client_cert and client_key must be provided for mTLS".to_string(),
                ));
            }
        }

        Ok(tls_config)
    }

    fn tenant(&self, ctx: &RequestContext) -> String {
        ctx.tenant_id
            .clone()
            .or_else(|| self.default_tenant.clone())
            .unwrap_or_default()
    }

    fn request<T>(&self, ctx: &RequestContext, message: T) -> HandlerResult<tonic::Request<T>> {
        let mut request = tonic::Request::new(message);
        let request_id: AsciiMetadataValue = ctx
            .request_id
            .to_string()
            .parse()
            .map_err(|e| HandlerError::internal(format!("invalid request id metadata: {e}")))?;
        request.metadata_mut().insert(REQUEST_ID_HEADER, request_id);
        request.set_timeout(ctx.timeout.unwrap_or(self.default_timeout));
        Ok(request)
    }
}

fn required(resource: Option<Resource>, rpc: &str) -> HandlerResult<Resource> {
    resource.ok_or_else(|| HandlerError::internal(format!("{rpc} returned no resource")))
}

#[async_trait]
impl InventoryClient for GrpcInventoryClient {
    async fn create(&self, ctx: &RequestContext, resource: Resource) -> HandlerResult<Resource> {
        let request = self.request(
            ctx,
            CreateResourceRequest {
                client_uuid: self.client_uuid.clone(),
                tenant_id: self.tenant(ctx),
                resource: Some(resource),
            },
        )?;
        let response = self.client.clone().create_resource(request).await?;
        required(response.into_inner().resource, "CreateResource")
    }

    async fn get(&self, ctx: &RequestContext, resource_id: &str) -> HandlerResult<Resource> {
        let request = self.request(
            ctx,
            GetResourceRequest {
                client_uuid: self.client_uuid.clone(),
                tenant_id: self.tenant(ctx),
                resource_id: resource_id.to_string(),
            },
        )?;
        let response = self.client.clone().get_resource(request).await?;
        required(response.into_inner().resource, "GetResource")
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        field_mask: FieldMask,
        resource: Resource,
    ) -> HandlerResult<Resource> {
        let request = self.request(
            ctx,
            UpdateResourceRequest {
                client_uuid: self.client_uuid.clone(),
                tenant_id: self.tenant(ctx),
                resource_id: resource_id.to_string(),
                field_mask: Some(field_mask),
                resource: Some(resource),
            },
        )?;
        let response = self.client.clone().update_resource(request).await?;
        required(response.into_inner().resource, "UpdateResource")
    }

    async fn delete(&self, ctx: &RequestContext, resource_id: &str) -> HandlerResult<()> {
        let request = self.request(
            ctx,
            DeleteResourceRequest {
                client_uuid: self.client_uuid.clone(),
                tenant_id: self.tenant(ctx),
                resource_id: resource_id.to_string(),
            },
        )?;
        self.client.clone().delete_resource(request).await?;
        Ok(())
    }

    async fn list(
        &self,
        ctx: &RequestContext,
        filter: ResourceFilter,
    ) -> HandlerResult<ListResourcesResponse> {
        let request = self.request(
            ctx,
            ListResourcesRequest {
                client_uuid: self.client_uuid.clone(),
                tenant_id: self.tenant(ctx),
                filter: Some(filter),
            },
        )?;
        let response = self.client.clone().list_resources(request).await?;
        Ok(response.into_inner())
    }

    async fn list_inherited_telemetry_profiles(
        &self,
        ctx: &RequestContext,
        query: InheritedProfilesQuery,
    ) -> HandlerResult<ListInheritedTelemetryProfilesResponse> {
        let request = self.request(
            ctx,
            ListInheritedTelemetryProfilesRequest {
                client_uuid: self.client_uuid.clone(),
                tenant_id: self.tenant(ctx),
                inherit_by: Some(query.inherit_by),
                filter: query.filter,
                order_by: query.order_by,
                limit: query.limit,
                offset: query.offset,
            },
        )?;
        let response = self
            .client
            .clone()
            .list_inherited_telemetry_profiles(request)
            .await?;
        Ok(response.into_inner())
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! In-memory inventory used by the handler tests.

    use super::*;
    use std::sync::Mutex;
    use tonic::Status;

    /// One recorded inventory call.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Create(Resource),
        Get(String),
        Update(String, FieldMask, Resource),
        Delete(String),
        List(ResourceFilter),
        ListInherited(InheritedProfilesQuery),
    }

    /// Records every call. Create and Update echo the resource back; Get, List
    /// and the inherited listing return the canned responses.
    #[derive(Default)]
    pub struct MockInventory {
        pub calls: Mutex<Vec<Call>>,
        pub get_response: Mutex<Option<Resource>>,
        pub list_responses: Mutex<Vec<ListResourcesResponse>>,
        pub inherited_response: Mutex<Option<ListInheritedTelemetryProfilesResponse>>,
        pub fail_with: Mutex<Option<Status>>,
    }

    impl MockInventory {
        pub fn with_get(resource: Resource) -> Self {
            let mock = Self::default();
            *mock.get_response.lock().unwrap() = Some(resource);
            mock
        }

        pub fn with_list(responses: Vec<ListResourcesResponse>) -> Self {
            let mock = Self::default();
            *mock.list_responses.lock().unwrap() = responses;
            mock
        }

        pub fn with_inherited(response: ListInheritedTelemetryProfilesResponse) -> Self {
            let mock = Self::default();
            *mock.inherited_response.lock().unwrap() = Some(response);
            mock
        }

        pub fn failing(status: Status) -> Self {
            let mock = Self::default();
            *mock.fail_with.lock().unwrap() = Some(status);
            mock
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) -> HandlerResult<()> {
            self.calls.lock().unwrap().push(call);
            match self.fail_with.lock().unwrap().clone() {
                Some(status) => Err(status.into()),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl InventoryClient for MockInventory {
        async fn create(&self, _ctx: &RequestContext, resource: Resource) -> HandlerResult<Resource> {
            self.record(Call::Create(resource.clone()))?;
            Ok(resource)
        }

        async fn get(&self, _ctx: &RequestContext, resource_id: &str) -> HandlerResult<Resource> {
            self.record(Call::Get(resource_id.to_string()))?;
            self.get_response
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| Status::not_found(resource_id.to_string()).into())
        }

        async fn update(
            &self,
            _ctx: &RequestContext,
            resource_id: &str,
            field_mask: FieldMask,
            resource: Resource,
        ) -> HandlerResult<Resource> {
            self.record(Call::Update(
                resource_id.to_string(),
                field_mask,
                resource.clone(),
            ))?;
            Ok(resource)
        }

        async fn delete(&self, _ctx: &RequestContext, resource_id: &str) -> HandlerResult<()> {
            self.record(Call::Delete(resource_id.to_string()))
        }

        async fn list(
            &self,
            _ctx: &RequestContext,
            filter: ResourceFilter,
        ) -> HandlerResult<ListResourcesResponse> {
            self.record(Call::List(filter))?;
            let mut responses = self.list_responses.lock().unwrap();
            if responses.is_empty() {
                Ok(ListResourcesResponse::default())
            } else {
                Ok(responses.remove(0))
            }
        }

        async fn list_inherited_telemetry_profiles(
            &self,
            _ctx: &RequestContext,
            query: InheritedProfilesQuery,
        ) -> HandlerResult<ListInheritedTelemetryProfilesResponse> {
            self.record(Call::ListInherited(query))?;
            Ok(self
                .inherited_response
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_default())
        }
    }
}
