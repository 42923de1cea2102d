//! # SEO Processor
//!
//! Runs last: sitemap eligibility depends on the access rule, and the
//! fallback title is the navigation label.

use sitegraph_core::seo::robots_directive;
use sitegraph_core::{OpenGraph, ResolvedSeo, SeoConfig, TwitterCard};

use super::SEO_PRIORITY;
use crate::error::PipelineResult;
use crate::processor::{Processor, RecordDraft};
use crate::source::DiscoveredEntity;

const DEFAULT_OPEN_GRAPH_TYPE: &str = "website";

/// Derives [`ResolvedSeo`].
#[derive(Debug, Clone, Default)]
pub struct SeoProcessor {
    seo: SeoConfig,
}

impl SeoProcessor {
    pub fn new(seo: SeoConfig) -> Self {
        Self { seo }
    }

    fn with_suffix(&self, title: String) -> String {
        match self.seo.title_suffix.as_deref().filter(|s| !s.is_empty()) {
            Some(suffix) if !title.ends_with(suffix) => format!("{title}{suffix}"),
            _ => title,
        }
    }

    fn twitter_card(&self, declared: Option<TwitterCard>, image: Option<&String>) -> TwitterCard {
        declared.or(self.seo.twitter_card).unwrap_or(if image.is_some() {
            TwitterCard::SummaryLargeImage
        } else {
            TwitterCard::Summary
        })
    }
}

/// Clamp a sitemap priority into `[0, 1]`; non-finite values use `default`.
pub fn clamp_priority(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v.clamp(0.0, 1.0),
        _ => default,
    }
}

impl Processor for SeoProcessor {
    fn name(&self) -> &'static str {
        "seo"
    }

    fn priority(&self) -> i32 {
        SEO_PRIORITY
    }

    fn process(&self, entity: &DiscoveredEntity, draft: &mut RecordDraft) -> PipelineResult<()> {
        let is_public = draft.access()?.is_public();
        let label = draft.navigation()?.label.clone();

        let seo = match &entity.attributes.seo {
            Some(attr) => {
                let title = attr
                    .title
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .unwrap_or(label);
                let title = self.with_suffix(title);
                let image = attr
                    .open_graph
                    .image
                    .clone()
                    .or_else(|| self.seo.default_image.clone());
                let open_graph = OpenGraph {
                    title: attr.open_graph.title.clone().or_else(|| Some(title.clone())),
                    description: attr
                        .open_graph
                        .description
                        .clone()
                        .or_else(|| attr.description.clone()),
                    kind: attr
                        .open_graph
                        .kind
                        .clone()
                        .or_else(|| Some(DEFAULT_OPEN_GRAPH_TYPE.to_string())),
                    image,
                };
                ResolvedSeo {
                    description: attr.description.clone(),
                    noindex: attr.noindex,
                    nofollow: attr.nofollow,
                    robots: robots_directive(attr.noindex, attr.nofollow),
                    priority: clamp_priority(attr.priority, self.seo.default_priority),
                    frequency: attr.frequency.unwrap_or(self.seo.default_frequency),
                    sitemap_include: attr.sitemap,
                    canonical: attr.canonical.clone(),
                    twitter_card: self.twitter_card(attr.twitter_card, open_graph.image.as_ref()),
                    open_graph,
                    keywords: attr.keywords.clone(),
                    last_modified: attr.last_modified,
                    meta: attr.meta.clone(),
                    sitemap_eligible: attr.sitemap && !attr.noindex && is_public,
                    auto_generated: false,
                    title,
                }
            }
            None => {
                let noindex = !is_public;
                let image = self.seo.default_image.clone();
                ResolvedSeo {
                    description: None,
                    noindex,
                    nofollow: false,
                    robots: robots_directive(noindex, false),
                    priority: self.seo.default_priority,
                    frequency: self.seo.default_frequency,
                    sitemap_include: true,
                    canonical: None,
                    twitter_card: self.twitter_card(None, image.as_ref()),
                    open_graph: OpenGraph {
                        title: Some(label.clone()),
                        description: None,
                        image,
                        kind: Some(DEFAULT_OPEN_GRAPH_TYPE.to_string()),
                    },
                    keywords: Vec::new(),
                    last_modified: None,
                    meta: Default::default(),
                    sitemap_eligible: is_public,
                    auto_generated: true,
                    title: label,
                }
            }
        };
        draft.seo = Some(seo);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::processors::fixtures::{draft, entity, zones};
    use crate::processors::{AccessProcessor, NavigationProcessor, RouteProcessor};
    use crate::source::ComponentDescriptor;
    use sitegraph_core::{
        AccessAttribute, NamingConfig, NavigationAttribute, RouteAttribute, SeoAttribute,
        SitemapFrequency,
    };

    fn run(config: SeoConfig, descriptor: ComponentDescriptor) -> ResolvedSeo {
        let entity = entity(descriptor);
        let mut d = draft();
        RouteProcessor::new(zones(), NamingConfig::default())
            .process(&entity, &mut d)
            .unwrap();
        NavigationProcessor.process(&entity, &mut d).unwrap();
        AccessProcessor::default().process(&entity, &mut d).unwrap();
        SeoProcessor::new(config).process(&entity, &mut d).unwrap();
        d.seo.unwrap()
    }

    #[test]
    fn absent_attribute_on_public_page() {
        let seo = run(
            SeoConfig::default(),
            ComponentDescriptor::new("app::AboutPage")
                .route(RouteAttribute::new("/about", "public"))
                .navigation(NavigationAttribute::new("About us", 1)),
        );
        assert_eq!(seo.title, "About us");
        assert!(!seo.noindex);
        assert_eq!(seo.robots, "index, follow");
        assert!(seo.sitemap_eligible);
        assert!(seo.auto_generated);
        assert_eq!(seo.priority, 0.5);
        assert_eq!(seo.frequency, SitemapFrequency::Weekly);
        assert_eq!(seo.twitter_card, TwitterCard::Summary);
    }

    #[test]
    fn absent_attribute_on_protected_page_is_noindex() {
        let seo = run(
            SeoConfig::default(),
            ComponentDescriptor::new("app::UsersPage").route(RouteAttribute::new("/users", "admin")),
        );
        assert_eq!(seo.title, "Users");
        assert!(seo.noindex);
        assert_eq!(seo.robots, "noindex, follow");
        assert!(!seo.sitemap_eligible);
    }

    #[test]
    fn declared_attribute_with_suffix_and_defaults() {
        let config = SeoConfig {
            title_suffix: Some(" | Shop".to_string()),
            default_image: Some("/img/default.png".to_string()),
            ..SeoConfig::default()
        };
        let seo = run(
            config,
            ComponentDescriptor::new("app::PricingPage")
                .route(RouteAttribute::new("/pricing", "public"))
                .seo(SeoAttribute {
                    title: Some("Pricing".to_string()),
                    description: Some("Plans and prices".to_string()),
                    priority: Some(1.7),
                    frequency: Some(SitemapFrequency::Monthly),
                    ..SeoAttribute::default()
                }),
        );
        assert_eq!(seo.title, "Pricing | Shop");
        assert_eq!(seo.priority, 1.0);
        assert_eq!(seo.frequency, SitemapFrequency::Monthly);
        assert_eq!(seo.open_graph.title.as_deref(), Some("Pricing | Shop"));
        assert_eq!(seo.open_graph.description.as_deref(), Some("Plans and prices"));
        assert_eq!(seo.open_graph.image.as_deref(), Some("/img/default.png"));
        assert_eq!(seo.open_graph.kind.as_deref(), Some("website"));
        assert_eq!(seo.twitter_card, TwitterCard::SummaryLargeImage);
        assert!(seo.sitemap_eligible);
    }

    #[test]
    fn suffix_is_not_duplicated() {
        let config = SeoConfig {
            title_suffix: Some(" | Shop".to_string()),
            ..SeoConfig::default()
        };
        let seo = run(
            config,
            ComponentDescriptor::new("app::HomePage")
                .route(RouteAttribute::new("/", "public"))
                .seo(SeoAttribute {
                    title: Some("Home | Shop".to_string()),
                    ..SeoAttribute::default()
                }),
        );
        assert_eq!(seo.title, "Home | Shop");
    }

    #[test]
    fn eligibility_requires_public_access() {
        let seo = run(
            SeoConfig::default(),
            ComponentDescriptor::new("app::AccountPage")
                .route(RouteAttribute::new("/account", "public"))
                .access(AccessAttribute::permissions(["account.view"]))
                .seo(SeoAttribute::default()),
        );
        assert!(seo.sitemap_include);
        assert!(!seo.noindex);
        assert!(!seo.sitemap_eligible);
    }

    #[test]
    fn noindex_excludes_from_sitemap() {
        let seo = run(
            SeoConfig::default(),
            ComponentDescriptor::new("app::DraftPage")
                .route(RouteAttribute::new("/draft", "public"))
                .seo(SeoAttribute {
                    noindex: true,
                    nofollow: true,
                    ..SeoAttribute::default()
                }),
        );
        assert_eq!(seo.robots, "noindex, nofollow");
        assert!(!seo.sitemap_eligible);
    }

    #[test]
    fn priority_clamping() {
        assert_eq!(clamp_priority(Some(-0.3), 0.5), 0.0);
        assert_eq!(clamp_priority(Some(0.8), 0.5), 0.8);
        assert_eq!(clamp_priority(Some(f64::NAN), 0.5), 0.5);
        assert_eq!(clamp_priority(None, 0.4), 0.4);
    }

    #[test]
    fn requires_access_fragment() {
        let mut d = draft();
        let err = SeoProcessor::default()
            .process(&entity(ComponentDescriptor::new("a::X")), &mut d)
            .unwrap_err();
        assert!(matches!(err, PipelineError::MissingFragment { fragment: "access", .. }));
    }
}
