//! Inventory handlers
//!
//! REST-to-gRPC translation layer between the OpenAPI surface and the inventory
//! service. A dispatcher hands each inbound request over as a [`Job`]; the
//! [`HandlerRegistry`] picks the handler of the job's resource type, which
//! validates the payload, issues one inventory call through an
//! [`InventoryClient`] and converts the answer back into an OpenAPI object.
//!
//! # Modules
//!
//! - [`job`]: job envelope, operations, resource tags and payload casting
//! - [`api`]: OpenAPI request/response shapes
//! - [`relation`], [`filter`], [`pagination`], [`fieldmask`]: request building
//! - [`client`]: inventory client seam and its gRPC implementation
//! - [`handlers`]: per-resource handlers and the registry
//!
//! # Usage
//!
//! ```ignore
//! use handlers::{GrpcInventoryClient, HandlerRegistry, Job, Operation, Payload, ResourceKind};
//!
//! let client = GrpcInventoryClient::connect(&config.inventory).await?;
//! let registry = HandlerRegistry::new(Arc::new(client));
//! let job = Job::new(Operation::Get, ResourceKind::Site, Payload::new(None, Some(params)));
//! let payload = registry.dispatch(&job).await?;
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod fieldmask;
pub mod filter;
pub mod handlers;
pub mod job;
pub mod pagination;
pub mod relation;

pub use client::{GrpcInventoryClient, InheritedProfilesQuery, InventoryClient};
pub use error::{HandlerError, HandlerResult};
pub use handlers::{Handler, HandlerRegistry, new_inventory_resource_handler};
pub use job::{Job, Operation, Payload, RequestContext, ResourceKind};
