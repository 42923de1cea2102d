//! # Discovery Engine
//!
//! Runs every entity of an [`AttributeSource`] through the processor chain and
//! collects the resulting records into a [`Manifest`].
//!
//! ## Failure policy
//!
//! - Entities a required processor declines (no route attribute) are excluded
//!   silently and counted.
//! - Entities whose inspection or processing fails are skipped, logged at
//!   `warn`, and listed in [`DiscoveryReport::skipped`].
//! - A repeated entity id is skipped; the first entry with that id is the
//!   one processed.
//! - Two entities resolving to the same route name: the later one wins and the
//!   pair is listed in [`DiscoveryReport::collisions`].

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use sitegraph_core::{ComponentRecord, Manifest, SitegraphConfig};

use crate::error::{PipelineError, PipelineResult};
use crate::processor::{Processor, RecordDraft};
use crate::processors::{AccessProcessor, NavigationProcessor, RouteProcessor, SeoProcessor};
use crate::source::{AttributeSource, DiscoveredEntity};

/// Two entities resolved to the same route name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteCollision {
    pub route_name: String,
    /// Entity whose record was replaced.
    pub replaced_entity: String,
    /// Entity whose record was kept.
    pub winner_entity: String,
}

/// An entity dropped because it failed to load or process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntity {
    pub entity_id: String,
    pub reason: String,
}

/// Outcome of one discovery run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiscoveryReport {
    pub manifest: Manifest,
    pub collisions: Vec<RouteCollision>,
    pub skipped: Vec<SkippedEntity>,
    /// Entities without a route attribute.
    pub excluded: usize,
    /// Entities enumerated by the source.
    pub scanned: usize,
}

impl DiscoveryReport {
    /// Whether the run finished without collisions or skipped entities.
    pub fn is_clean(&self) -> bool {
        self.collisions.is_empty() && self.skipped.is_empty()
    }
}

/// Ordered processor chain.
#[derive(Default)]
pub struct Pipeline {
    processors: Vec<Box<dyn Processor>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("processors", &self.processor_names())
            .finish()
    }
}

impl Pipeline {
    /// Empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// The canonical chain: route, navigation, access, SEO.
    pub fn from_config(config: &SitegraphConfig) -> Self {
        let zones = Arc::new(config.zone_registry());
        Self::new()
            .with_processor(RouteProcessor::new(zones, config.naming.clone()))
            .with_processor(NavigationProcessor)
            .with_processor(AccessProcessor::new(config.middleware.clone()))
            .with_processor(SeoProcessor::new(config.seo.clone()))
    }

    /// Add a processor, keeping the chain sorted by priority. Equal
    /// priorities keep registration order.
    pub fn add_processor(&mut self, processor: Box<dyn Processor>) {
        self.processors.push(processor);
        self.processors.sort_by_key(|p| p.priority());
    }

    /// Builder form of [`add_processor`](Self::add_processor).
    pub fn with_processor(mut self, processor: impl Processor + 'static) -> Self {
        self.add_processor(Box::new(processor));
        self
    }

    /// Processor names in run order.
    pub fn processor_names(&self) -> Vec<&'static str> {
        self.processors.iter().map(|p| p.name()).collect()
    }

    /// Run the chain for one entity. `Ok(None)` means a required processor
    /// declined it.
    pub fn process_entity(
        &self,
        entity: &DiscoveredEntity,
        ordinal: usize,
    ) -> PipelineResult<Option<ComponentRecord>> {
        let mut draft = RecordDraft::new(entity.facts.entity_id.clone(), ordinal);
        for processor in &self.processors {
            if !processor.should_process(entity) {
                if processor.required() {
                    return Ok(None);
                }
                continue;
            }
            processor.process(entity, &mut draft)?;
        }
        draft.finish().map(Some)
    }

    /// Run every entity of `source` through the chain.
    pub fn run(&self, source: &dyn AttributeSource) -> DiscoveryReport {
        let mut report = DiscoveryReport::default();
        let mut seen = BTreeSet::new();
        for (ordinal, entity_id) in source.entity_ids().into_iter().enumerate() {
            report.scanned += 1;
            let outcome = if seen.insert(entity_id.clone()) {
                source
                    .inspect(&entity_id)
                    .and_then(|entity| self.process_entity(&entity, ordinal))
            } else {
                Err(PipelineError::DuplicateEntity {
                    entity: entity_id.clone(),
                    ordinal,
                })
            };
            match outcome {
                Ok(Some(record)) => {
                    let route_name = record.name().to_string();
                    if let Some(replaced) = report.manifest.insert(record) {
                        tracing::warn!(
                            route = %route_name,
                            replaced = %replaced.component.entity_id,
                            winner = %entity_id,
                            "route name collision, last registration wins"
                        );
                        report.collisions.push(RouteCollision {
                            route_name,
                            replaced_entity: replaced.component.entity_id,
                            winner_entity: entity_id,
                        });
                    }
                }
                Ok(None) => {
                    tracing::debug!(entity = %entity_id, "no route attribute, excluded");
                    report.excluded += 1;
                }
                Err(e) => {
                    tracing::warn!(entity = %entity_id, error = %e, "skipping entity");
                    report.skipped.push(SkippedEntity {
                        entity_id,
                        reason: e.to_string(),
                    });
                }
            }
        }
        tracing::info!(
            records = report.manifest.len(),
            scanned = report.scanned,
            excluded = report.excluded,
            skipped = report.skipped.len(),
            collisions = report.collisions.len(),
            "discovery finished"
        );
        report
    }
}
