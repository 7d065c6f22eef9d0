//! Job envelope consumed by the handlers
//!
//! A [`Job`] is produced per inbound REST request by an external dispatcher. It
//! carries the operation, the resource tag, and an untyped [`Payload`] that the
//! handler casts to the concrete type expected for the (operation, resource)
//! pair.

use crate::error::{HandlerError, HandlerResult};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::time::Duration;
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

/// REST operation carried by a job.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    List,
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// Resource type tag used to select the handler.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Region,
    Site,
    Instance,
    TelemetryLogsGroup,
    TelemetryMetricsGroup,
    TelemetryLogsProfile,
    TelemetryMetricsProfile,
    Locations,
}

/// Caller context forwarded to the single downstream call of a job.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: Uuid,
    /// Tenant the request acts for; the client's default tenant applies when unset
    pub tenant_id: Option<String>,
    /// Deadline of the downstream call; the client's configured timeout applies when unset
    pub timeout: Option<Duration>,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            tenant_id: None,
            timeout: None,
        }
    }
}

impl RequestContext {
    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Request body / query struct and path parameters of a job, or the data of a
/// handler result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub data: Option<Value>,
    pub params: Option<Value>,
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

impl Payload {
    pub fn new(data: Option<Value>, params: Option<Value>) -> Self {
        Self { data, params }
    }

    /// Payload without data, returned by Delete.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap an API object as the result of a handler.
    pub fn from_data<T: Serialize>(value: &T) -> HandlerResult<Self> {
        let data = serde_json::to_value(value).map_err(|e| {
            HandlerError::internal(format!(
                "failed to encode {}: {e}",
                short_type_name::<T>()
            ))
        })?;
        Ok(Self {
            data: Some(data),
            params: None,
        })
    }

    /// Cast the job data to `T`, failing with invalid-argument when it is
    /// missing or of another shape.
    pub fn cast_data<T: DeserializeOwned>(&self) -> HandlerResult<T> {
        let data = self.data.as_ref().ok_or_else(|| {
            HandlerError::invalid_argument(format!(
                "missing request data, expected {}",
                short_type_name::<T>()
            ))
        })?;
        cast(data)
    }

    /// Like [`Payload::cast_data`], but an absent value yields `T::default()`.
    /// Used for query parameter structs where every field is optional.
    pub fn cast_data_or_default<T: DeserializeOwned + Default>(&self) -> HandlerResult<T> {
        match &self.data {
            None | Some(Value::Null) => Ok(T::default()),
            Some(data) => cast(data),
        }
    }

    /// Cast the job path parameters to `T`.
    pub fn cast_params<T: DeserializeOwned>(&self) -> HandlerResult<T> {
        let params = self.params.as_ref().ok_or_else(|| {
            HandlerError::invalid_argument(format!(
                "missing request params, expected {}",
                short_type_name::<T>()
            ))
        })?;
        cast(params)
    }
}

fn cast<T: DeserializeOwned>(value: &Value) -> HandlerResult<T> {
    T::deserialize(value).map_err(|e| {
        HandlerError::invalid_argument(format!(
            "unexpected payload, expected {}: {e}",
            short_type_name::<T>()
        ))
    })
}

/// One inbound operation request.
#[derive(Debug, Clone)]
pub struct Job {
    pub context: RequestContext,
    pub operation: Operation,
    pub resource: ResourceKind,
    pub payload: Payload,
}

impl Job {
    pub fn new(operation: Operation, resource: ResourceKind, payload: Payload) -> Self {
        Self {
            context: RequestContext::default(),
            operation,
            resource,
            payload,
        }
    }

    pub fn with_context(mut self, context: RequestContext) -> Self {
        self.context = context;
        self
    }

    pub fn is_patch(&self) -> bool {
        self.operation == Operation::Patch
    }
}
