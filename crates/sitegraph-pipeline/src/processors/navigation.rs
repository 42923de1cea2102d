//! # Navigation Processor
//!
//! Components without a navigation attribute still get a navigation fragment
//! so breadcrumbs can label them, but it is hidden and sorted last.

use sitegraph_core::navigation::split_group;
use sitegraph_core::text::label_from_short_name;
use sitegraph_core::{ResolvedNavigation, AUTO_SORT_ORDER};

use super::NAVIGATION_PRIORITY;
use crate::error::PipelineResult;
use crate::processor::{Processor, RecordDraft};
use crate::source::DiscoveredEntity;

/// Derives [`ResolvedNavigation`] from the attribute and zone defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavigationProcessor;

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl Processor for NavigationProcessor {
    fn name(&self) -> &'static str {
        "navigation"
    }

    fn priority(&self) -> i32 {
        NAVIGATION_PRIORITY
    }

    fn process(&self, entity: &DiscoveredEntity, draft: &mut RecordDraft) -> PipelineResult<()> {
        let route = draft.route()?;
        let defaults = &route.zone_config.navigation;
        let derived_label = label_from_short_name(&entity.facts.short_name);

        let navigation = match &entity.attributes.navigation {
            Some(attr) => {
                let group = non_empty(attr.group.as_ref()).or_else(|| defaults.group.clone());
                ResolvedNavigation {
                    label: non_empty(Some(&attr.label)).unwrap_or(derived_label),
                    group_segments: group.as_deref().map(split_group).unwrap_or_default(),
                    group,
                    icon: non_empty(attr.icon.as_ref()).or_else(|| defaults.icon.clone()),
                    sort: attr.sort,
                    hidden: attr.hidden,
                    badge: attr.badge.clone(),
                    badge_color: attr.badge_color.clone(),
                    parent: non_empty(attr.parent.as_ref()),
                    meta: attr.meta.clone(),
                    route_name: route.name.clone(),
                    has_params: !route.parameter_names.is_empty(),
                    auto_generated: false,
                }
            }
            None => ResolvedNavigation {
                label: derived_label,
                group_segments: defaults.group.as_deref().map(split_group).unwrap_or_default(),
                group: defaults.group.clone(),
                icon: defaults.icon.clone(),
                sort: AUTO_SORT_ORDER,
                hidden: true,
                badge: None,
                badge_color: None,
                parent: None,
                meta: Default::default(),
                route_name: route.name.clone(),
                has_params: !route.parameter_names.is_empty(),
                auto_generated: true,
            },
        };
        draft.navigation = Some(navigation);
        Ok(())
    }
}
