//! # Page Metadata
//!
//! Head metadata for one request. Each field is taken from the first source
//! that has it:
//!
//! 1. overrides set on the [`PageMetaContext`] while handling the request,
//! 2. the manifest record of the page,
//! 3. the site-wide [`PageMetaDefaults`].
//!
//! A context belongs to a single request and is dropped with it.

use std::collections::BTreeMap;

use serde::Serialize;

use sitegraph_core::seo::robots_directive;
use sitegraph_core::{ComponentRecord, OpenGraph, SeoConfig, TwitterCard};

const DEFAULT_OPEN_GRAPH_TYPE: &str = "website";

/// Site-wide fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetaDefaults {
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub title_suffix: Option<String>,
    pub twitter_card: Option<TwitterCard>,
}

impl PageMetaDefaults {
    pub fn from_config(site_title: impl Into<String>, seo: &SeoConfig) -> Self {
        Self {
            title: site_title.into(),
            description: None,
            image: seo.default_image.clone(),
            title_suffix: seo.title_suffix.clone(),
            twitter_card: seo.twitter_card,
        }
    }

    fn with_suffix(&self, title: String) -> String {
        match self.title_suffix.as_deref().filter(|s| !s.is_empty()) {
            Some(suffix) if !title.ends_with(suffix) => format!("{title}{suffix}"),
            _ => title,
        }
    }
}

/// Values set explicitly while handling a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetaOverrides {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub canonical: Option<String>,
    pub noindex: Option<bool>,
    pub keywords: Option<Vec<String>>,
    pub meta: BTreeMap<String, String>,
}

/// Resolved head metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub robots: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    pub open_graph: OpenGraph,
    pub twitter_card: TwitterCard,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, String>,
}

/// Request-scoped metadata builder.
#[derive(Debug, Clone)]
pub struct PageMetaContext<'a> {
    defaults: &'a PageMetaDefaults,
    record: Option<&'a ComponentRecord>,
    overrides: PageMetaOverrides,
}

impl<'a> PageMetaContext<'a> {
    /// Context for a page; `record` is `None` for pages outside the manifest.
    pub fn new(defaults: &'a PageMetaDefaults, record: Option<&'a ComponentRecord>) -> Self {
        Self {
            defaults,
            record,
            overrides: PageMetaOverrides::default(),
        }
    }

    pub fn overrides(&self) -> &PageMetaOverrides {
        &self.overrides
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.overrides.title = Some(title.into());
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.overrides.description = Some(description.into());
        self
    }

    pub fn set_image(&mut self, image: impl Into<String>) -> &mut Self {
        self.overrides.image = Some(image.into());
        self
    }

    pub fn set_canonical(&mut self, canonical: impl Into<String>) -> &mut Self {
        self.overrides.canonical = Some(canonical.into());
        self
    }

    pub fn set_noindex(&mut self, noindex: bool) -> &mut Self {
        self.overrides.noindex = Some(noindex);
        self
    }

    pub fn set_keywords(&mut self, keywords: Vec<String>) -> &mut Self {
        self.overrides.keywords = Some(keywords);
        self
    }

    pub fn set_meta(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.overrides.meta.insert(key.into(), value.into());
        self
    }

    /// Merge overrides, record and defaults.
    pub fn resolve(&self) -> PageMeta {
        let seo = self.record.map(|r| &r.seo);
        let o = &self.overrides;

        let title = match &o.title {
            Some(title) => self.defaults.with_suffix(title.clone()),
            None => seo
                .map(|s| s.title.clone())
                .unwrap_or_else(|| self.defaults.title.clone()),
        };
        let description = o
            .description
            .clone()
            .or_else(|| seo.and_then(|s| s.description.clone()))
            .or_else(|| self.defaults.description.clone());
        let noindex = o.noindex.or(seo.map(|s| s.noindex)).unwrap_or(false);
        let nofollow = seo.is_some_and(|s| s.nofollow);
        let image = o
            .image
            .clone()
            .or_else(|| seo.and_then(|s| s.open_graph.image.clone()))
            .or_else(|| self.defaults.image.clone());

        let record_og = seo.map(|s| &s.open_graph);
        let open_graph = OpenGraph {
            title: match &o.title {
                Some(_) => Some(title.clone()),
                None => record_og
                    .and_then(|og| og.title.clone())
                    .or_else(|| Some(title.clone())),
            },
            description: match &o.description {
                Some(d) => Some(d.clone()),
                None => record_og
                    .and_then(|og| og.description.clone())
                    .or_else(|| description.clone()),
            },
            kind: record_og
                .and_then(|og| og.kind.clone())
                .or_else(|| Some(DEFAULT_OPEN_GRAPH_TYPE.to_string())),
            image,
        };
        let twitter_card = seo
            .map(|s| s.twitter_card)
            .or(self.defaults.twitter_card)
            .unwrap_or(if open_graph.image.is_some() {
                TwitterCard::SummaryLargeImage
            } else {
                TwitterCard::Summary
            });

        let mut meta = seo.map(|s| s.meta.clone()).unwrap_or_default();
        meta.extend(o.meta.clone());

        PageMeta {
            title,
            description,
            robots: robots_directive(noindex, nofollow),
            canonical: o
                .canonical
                .clone()
                .or_else(|| seo.and_then(|s| s.canonical.clone())),
            open_graph,
            twitter_card,
            keywords: o
                .keywords
                .clone()
                .or_else(|| seo.map(|s| s.keywords.clone()))
                .unwrap_or_default(),
            meta,
        }
    }
}
