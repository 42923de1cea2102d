//! # Processor Contract
//!
//! A processor derives one kind of metadata for an entity and writes it into
//! the [`RecordDraft`]. Processors run in ascending [`Processor::priority`].

use std::collections::BTreeMap;

use sitegraph_core::{
    ComponentIdentity, ComponentRecord, ResolvedAccess, ResolvedNavigation, ResolvedRoute,
    ResolvedSeo,
};

use crate::error::{PipelineError, PipelineResult};
use crate::source::DiscoveredEntity;

/// One stage of the discovery pipeline.
pub trait Processor: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Lower runs earlier.
    fn priority(&self) -> i32;

    /// Whether this processor applies to the entity.
    fn should_process(&self, _entity: &DiscoveredEntity) -> bool {
        true
    }

    /// Whether an entity this processor declines must be dropped.
    fn required(&self) -> bool {
        false
    }

    /// Derive this processor's fragment and store it in the draft.
    fn process(&self, entity: &DiscoveredEntity, draft: &mut RecordDraft) -> PipelineResult<()>;
}

/// The record accumulated so far for one entity.
#[derive(Debug, Clone, Default)]
pub struct RecordDraft {
    pub entity_id: String,
    /// Position of the entity in discovery order.
    pub ordinal: usize,
    pub component: Option<ComponentIdentity>,
    pub route: Option<ResolvedRoute>,
    pub navigation: Option<ResolvedNavigation>,
    pub access: Option<ResolvedAccess>,
    pub seo: Option<ResolvedSeo>,
    pub middleware: Vec<String>,
    pub custom_meta: Option<BTreeMap<String, serde_json::Value>>,
}

impl RecordDraft {
    pub fn new(entity_id: impl Into<String>, ordinal: usize) -> Self {
        Self {
            entity_id: entity_id.into(),
            ordinal,
            ..Self::default()
        }
    }

    fn missing(&self, fragment: &'static str) -> PipelineError {
        PipelineError::MissingFragment {
            entity: self.entity_id.clone(),
            fragment,
        }
    }

    pub fn route(&self) -> PipelineResult<&ResolvedRoute> {
        self.route.as_ref().ok_or_else(|| self.missing("route"))
    }

    pub fn navigation(&self) -> PipelineResult<&ResolvedNavigation> {
        self.navigation
            .as_ref()
            .ok_or_else(|| self.missing("navigation"))
    }

    pub fn access(&self) -> PipelineResult<&ResolvedAccess> {
        self.access.as_ref().ok_or_else(|| self.missing("access"))
    }

    /// Assemble the final record. Every fragment must be present.
    pub fn finish(self) -> PipelineResult<ComponentRecord> {
        let RecordDraft {
            entity_id,
            component,
            route,
            navigation,
            access,
            seo,
            middleware,
            custom_meta,
            ..
        } = self;
        let missing = |fragment| PipelineError::MissingFragment {
            entity: entity_id.clone(),
            fragment,
        };
        Ok(ComponentRecord {
            component: component.ok_or_else(|| missing("component"))?,
            route: route.ok_or_else(|| missing("route"))?,
            navigation: navigation.ok_or_else(|| missing("navigation"))?,
            access: access.ok_or_else(|| missing("access"))?,
            seo: seo.ok_or_else(|| missing("seo"))?,
            middleware,
            custom_meta,
        })
    }
}
