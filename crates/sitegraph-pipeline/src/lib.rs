//! # sitegraph-pipeline: Discovery and Derivation
//!
//! Turns raw component declarations into the [`Manifest`](sitegraph_core::Manifest).
//!
//! ```text
//! AttributeSource ──► Pipeline ──► [RouteProcessor (10)]
//!                                  [NavigationProcessor (20)]
//!                                  [AccessProcessor (30)]
//!                                  [SeoProcessor (40)] ──► DiscoveryReport
//! ```
//!
//! Processors run in ascending priority. Later processors read what earlier
//! ones produced: navigation reads the route, access reads the route's zone,
//! SEO reads the access rule and the navigation label. The default chain is
//! assembled by [`Pipeline::from_config`].
//!
//! ## Attribute sources
//!
//! - [`StaticSource`]: an in-memory list of [`ComponentDescriptor`]s.
//! - [`CatalogSource`]: a YAML catalog file.
//! - [`RegisteredComponents`]: descriptors registered in code with
//!   [`register_component!`], collected at link time by `inventory`.
//!
//! ## Failure policy
//!
//! One bad entity never aborts a run. Entities that fail to load or fail a
//! processor are logged and listed in [`DiscoveryReport::skipped`]; entities
//! without a route are excluded silently; route-name collisions keep the last
//! record and are listed in [`DiscoveryReport::collisions`].

pub mod engine;
pub mod error;
pub mod processor;
pub mod processors;
pub mod source;

pub use engine::{DiscoveryReport, Pipeline, RouteCollision, SkippedEntity};
pub use error::{PipelineError, PipelineResult};
pub use processor::{Processor, RecordDraft};
pub use processors::{AccessProcessor, NavigationProcessor, RouteProcessor, SeoProcessor};
pub use source::{
    AttributeSource, CatalogSource, ComponentDescriptor, ComponentRegistration,
    DiscoveredEntity, EntityFacts, RawAttributes, RegisteredComponents, StaticSource,
};

#[doc(hidden)]
pub use inventory;
