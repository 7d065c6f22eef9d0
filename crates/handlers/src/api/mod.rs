//! OpenAPI-shaped request and response objects
//!
//! These mirror the JSON bodies and query structs of the REST surface. Every
//! field the caller may omit is an `Option` so that partial updates can tell
//! absent fields from present ones. Unknown fields are rejected, which is how a
//! payload of the wrong resource type is detected.

mod compute;
mod location;
mod telemetry;

pub use compute::*;
pub use location::*;
pub use telemetry::*;

use serde::{Deserialize, Serialize};

/// Creation and last update times, read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Timestamps {
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Timestamps {
    /// Build from the backend representation; `None` when both are empty.
    pub fn from_backend(created_at: &str, updated_at: &str) -> Option<Self> {
        if created_at.is_empty() && updated_at.is_empty() {
            return None;
        }
        Some(Self {
            created_at: non_empty(created_at),
            updated_at: non_empty(updated_at),
        })
    }
}

/// Path parameters of Get/Update/Delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResourceIdParams {
    pub resource_id: String,
}

/// A key/value label attached to regions and sites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetadataItem {
    pub key: String,
    pub value: String,
}

pub(crate) fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
