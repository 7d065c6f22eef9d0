//! Inventory Protocol Buffer Definitions
//!
//! This crate contains the protocol buffer definitions of the inventory
//! service the handlers translate to.
//!
//! # Modules
//!
//! - [`location::v1`]: regions and sites
//! - [`compute::v1`]: instances and the host/os references they embed
//! - [`telemetry::v1`]: telemetry groups and profiles
//! - [`inventory::v1`]: the `InventoryService` and its request/response envelopes
//!
//! # Usage
//!
//! ```ignore
//! use invgw_proto::inventory::v1::{GetResourceRequest, Resource};
//! use invgw_proto::{InventoryServiceClient, TelemetryProfile};
//! ```
//!
//! # Design Notes
//!
//! ## Cross-Package References
//!
//! `inventory.v1` and `telemetry.v1` embed messages of `location.v1` and
//! `compute.v1`. The generated code refers to them through `super::super::`
//! paths, so the module nesting below must mirror the proto package names.

/// Location tree: regions and sites.
pub mod location {
    pub mod v1 {
        tonic::include_proto!("location.v1");
    }
}

/// Compute resources: instances, hosts, operating systems.
pub mod compute {
    pub mod v1 {
        tonic::include_proto!("compute.v1");
    }
}

/// Telemetry groups and profiles.
pub mod telemetry {
    pub mod v1 {
        tonic::include_proto!("telemetry.v1");
    }
}

/// Inventory service definitions.
pub mod inventory {
    pub mod v1 {
        tonic::include_proto!("inventory.v1");
    }
}

// ============================================================================
// Re-exports: resource messages
// ============================================================================

pub use compute::v1::{
    HostResource, InstanceKind, InstanceResource, InstanceState, OperatingSystemResource,
    SecurityFeature,
};
pub use location::v1::{RegionResource, SiteResource};
pub use telemetry::v1::{
    SeverityLevel, TelemetryCollectorKind, TelemetryGroupResource, TelemetryProfile,
    TelemetryResourceKind, telemetry_profile::Relation as TelemetryProfileRelation,
};

// ============================================================================
// Re-exports: InventoryService
// ============================================================================

pub use inventory::v1::{
    CreateResourceRequest,
    CreateResourceResponse,
    DeleteResourceRequest,
    DeleteResourceResponse,
    GetResourceRequest,
    GetResourceResponse,
    ListInheritedTelemetryProfilesRequest,
    ListInheritedTelemetryProfilesResponse,
    ListResourcesRequest,
    ListResourcesResponse,
    Resource,
    ResourceFilter,
    UpdateResourceRequest,
    UpdateResourceResponse,
    // Client and server
    inventory_service_client::InventoryServiceClient,
    inventory_service_server::{InventoryService, InventoryServiceServer},
    list_inherited_telemetry_profiles_request::{InheritBy, inherit_by::Id as InheritById},
    resource::Resource as ResourceVariant,
};

// Note: the FieldMask type carried by UpdateResourceRequest is
// `prost_types::FieldMask`; it is re-exported here so callers do not need a
// direct prost-types dependency.
pub use prost_types::FieldMask;
