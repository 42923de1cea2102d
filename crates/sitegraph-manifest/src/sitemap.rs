//! # Sitemap
//!
//! Builds sitemap entries from the public routes of a manifest and renders
//! them as a sitemaps.org 0.9 `urlset`. Routes with required parameters have
//! no single URL and are left out.

use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::Serialize;

use sitegraph_core::{ComponentRecord, SitemapFrequency};

use crate::error::{ManifestError, ManifestResult};
use crate::repository::ManifestSnapshot;

const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// One `<url>` element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapEntry {
    /// Absolute URL.
    pub loc: String,
    pub priority: f64,
    pub change_frequency: SitemapFrequency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<NaiveDate>,
}

impl SitemapEntry {
    fn from_record(base_url: &str, record: &ComponentRecord) -> Self {
        Self {
            loc: absolute_url(base_url, &record.route.full_uri),
            priority: record.seo.priority,
            change_frequency: record.seo.frequency,
            last_modified: record.seo.last_modified,
        }
    }
}

/// `base_url` without its trailing slash, followed by `path`.
pub fn absolute_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Entries for every public route without required parameters, sorted by
/// priority (highest first) then URL.
pub fn build_entries(snapshot: &ManifestSnapshot, base_url: &str) -> Vec<SitemapEntry> {
    let mut entries: Vec<SitemapEntry> = snapshot
        .public_routes()
        .filter(|r| !r.route.has_required_parameter)
        .map(|r| SitemapEntry::from_record(base_url, r))
        .collect();
    entries.sort_by(|a, b| {
        b.priority
            .total_cmp(&a.priority)
            .then_with(|| a.loc.cmp(&b.loc))
    });
    entries
}

/// Priority with up to four decimals and at least one: `1.0`, `0.25`, `0.85`.
fn format_priority(priority: f64) -> String {
    let fixed = format!("{priority:.4}");
    let trimmed = fixed.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{trimmed}0")
    } else {
        trimmed.to_string()
    }
}

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render entries as sitemap XML.
pub fn render_xml(entries: &[SitemapEntry]) -> ManifestResult<String> {
    let mut xml = String::new();
    write_xml(&mut xml, entries).map_err(ManifestError::SitemapWrite)?;
    Ok(xml)
}

fn write_xml(xml: &mut String, entries: &[SitemapEntry]) -> std::fmt::Result {
    writeln!(xml, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(xml, r#"<urlset xmlns="{SITEMAP_NAMESPACE}">"#)?;
    for entry in entries {
        writeln!(xml, "  <url>")?;
        writeln!(xml, "    <loc>{}</loc>", escape_xml(&entry.loc))?;
        if let Some(date) = entry.last_modified {
            writeln!(xml, "    <lastmod>{}</lastmod>", date.format("%Y-%m-%d"))?;
        }
        writeln!(xml, "    <changefreq>{}</changefreq>", entry.change_frequency)?;
        writeln!(xml, "    <priority>{}</priority>", format_priority(entry.priority))?;
        writeln!(xml, "  </url>")?;
    }
    writeln!(xml, "</urlset>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitegraph_core::{AccessAttribute, RouteAttribute, SeoAttribute, SitegraphConfig};
    use sitegraph_pipeline::{ComponentDescriptor, Pipeline, StaticSource};
    use std::collections::BTreeSet;

    fn snapshot() -> ManifestSnapshot {
        let source = StaticSource::new(vec![
            ComponentDescriptor::new("HomePage")
                .route(RouteAttribute::new("/", "public"))
                .seo(SeoAttribute {
                    priority: Some(1.0),
                    frequency: Some(SitemapFrequency::Daily),
                    ..SeoAttribute::default()
                }),
            ComponentDescriptor::new("SearchPage")
                .route(RouteAttribute::new("/search?q=a&b", "public"))
                .seo(SeoAttribute {
                    last_modified: NaiveDate::from_ymd_opt(2024, 3, 9),
                    ..SeoAttribute::default()
                }),
            ComponentDescriptor::new("AboutPage").route(RouteAttribute::new("/about", "public")),
            ComponentDescriptor::new("ProductPage")
                .route(RouteAttribute::new("/products/{id}", "public")),
            ComponentDescriptor::new("AccountPage")
                .route(RouteAttribute::new("/account", "public"))
                .access(AccessAttribute::permissions(["account.view"])),
        ]);
        let manifest = Pipeline::from_config(&SitegraphConfig::default())
            .run(&source)
            .manifest;
        ManifestSnapshot::new(manifest, BTreeSet::new())
    }

    #[test]
    fn entries_skip_parameterized_and_private_routes() {
        let entries = build_entries(&snapshot(), "https://example.com/");
        let locs: Vec<&str> = entries.iter().map(|e| e.loc.as_str()).collect();
        assert_eq!(
            locs,
            vec![
                "https://example.com/",
                "https://example.com/about",
                "https://example.com/search?q=a&b",
            ]
        );
        assert_eq!(entries[0].change_frequency, SitemapFrequency::Daily);
    }

    #[test]
    fn xml_is_escaped_and_formatted() {
        let xml = render_xml(&build_entries(&snapshot(), "https://example.com")).unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(SITEMAP_NAMESPACE));
        assert!(xml.contains("<loc>https://example.com/search?q=a&amp;b</loc>"));
        assert!(xml.contains("<lastmod>2024-03-09</lastmod>"));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert!(xml.contains("<priority>0.5</priority>"));
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn priorities_keep_declared_precision() {
        assert_eq!(format_priority(1.0), "1.0");
        assert_eq!(format_priority(0.0), "0.0");
        assert_eq!(format_priority(0.25), "0.25");
        assert_eq!(format_priority(0.85), "0.85");

        let entries = vec![SitemapEntry {
            loc: "https://example.com/faq".to_string(),
            priority: 0.25,
            change_frequency: SitemapFrequency::Weekly,
            last_modified: None,
        }];
        let xml = render_xml(&entries).unwrap();
        assert!(xml.contains("<priority>0.25</priority>"));
    }

    #[test]
    fn empty_sitemap_is_valid() {
        let xml = render_xml(&[]).unwrap();
        assert!(xml.contains("<urlset"));
        assert!(!xml.contains("<url>"));
    }

    #[test]
    fn absolute_url_trims_trailing_slash() {
        assert_eq!(absolute_url("https://a.test//", "/x"), "https://a.test/x");
    }
}
