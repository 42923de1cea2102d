//! # SEO Metadata
//!
//! Titles, robots directives, social cards and sitemap hints.
//! `sitemap_eligible` on [`ResolvedSeo`] is only ever true for public pages.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sitemap `<changefreq>` values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SitemapFrequency {
    Always,
    Hourly,
    Daily,
    #[default]
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl SitemapFrequency {
    /// The sitemap protocol spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl std::fmt::Display for SitemapFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Twitter card types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TwitterCard {
    Summary,
    SummaryLargeImage,
    App,
    Player,
}

/// Open Graph fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenGraph {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Raw SEO declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoAttribute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub noindex: bool,
    #[serde(default)]
    pub nofollow: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<SitemapFrequency>,
    #[serde(default = "default_true")]
    pub sitemap: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    #[serde(default)]
    pub open_graph: OpenGraph,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_card: Option<TwitterCard>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, String>,
}

fn default_true() -> bool {
    true
}

impl Default for SeoAttribute {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            noindex: false,
            nofollow: false,
            priority: None,
            frequency: None,
            sitemap: true,
            canonical: None,
            open_graph: OpenGraph::default(),
            twitter_card: None,
            keywords: Vec::new(),
            last_modified: None,
            meta: BTreeMap::new(),
        }
    }
}

/// Fully resolved SEO metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSeo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub noindex: bool,
    pub nofollow: bool,
    /// `index, follow` style robots directive.
    pub robots: String,
    pub priority: f64,
    pub frequency: SitemapFrequency,
    pub sitemap_include: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    pub open_graph: OpenGraph,
    pub twitter_card: TwitterCard,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<NaiveDate>,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
    /// Include in sitemap, indexable, and publicly accessible.
    pub sitemap_eligible: bool,
    /// True when no SEO attribute was declared.
    #[serde(default)]
    pub auto_generated: bool,
}

/// Robots directive for the given flags.
pub fn robots_directive(noindex: bool, nofollow: bool) -> String {
    let index = if noindex { "noindex" } else { "index" };
    let follow = if nofollow { "nofollow" } else { "follow" };
    format!("{index}, {follow}")
}
