//! Seed page discovery: article validation and the section index.
//!
//! Discovery is a two-phase build. The seed markup is first split into
//! regions (introduction, then one per heading) and each region's links
//! are collected; the regions are then folded into the section index in
//! one pass.

use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use std::collections::HashSet;

use crate::config::MarkupProfile;
use crate::error::Result;
use crate::topic::{section_title, Topic};

/// Name of the synthetic section covering content before the first heading.
pub const INTRODUCTION: &str = "Introduction";

/// Whether `markup` is a real article: it carries the categories
/// navigation and does not carry the disambiguation marker.
pub fn validate_article(markup: &str, profile: &MarkupProfile) -> bool {
    markup.contains(&profile.article_marker) && !markup.contains(&profile.disambiguation_marker)
}

/// Section name to ordered member topics, plus the URL behind each topic.
#[derive(Debug, Clone, Default)]
pub struct SectionIndex {
    pub sections: IndexMap<String, IndexSet<Topic>>,
    pub urls: IndexMap<Topic, String>,
}

impl SectionIndex {
    fn fold(regions: Vec<Region>) -> Self {
        let mut index = SectionIndex::default();
        index.sections.insert(INTRODUCTION.to_string(), IndexSet::new());

        for region in regions {
            let members = index.sections.entry(region.section).or_default();
            for (topic, url) in region.links {
                members.insert(topic.clone());
                index.urls.entry(topic).or_insert(url);
            }
        }
        index
    }

    /// Total number of distinct topics across all sections.
    pub fn topic_count(&self) -> usize {
        self.urls.len()
    }
}

/// One region of the seed page with its deduplicated links.
#[derive(Debug)]
struct Region {
    section: String,
    links: Vec<(Topic, String)>,
}

/// Compiled form of a [`MarkupProfile`].
#[derive(Debug, Clone)]
pub(crate) struct MarkupRules {
    profile: MarkupProfile,
    heading: Regex,
    link: Regex,
    excluded_namespaces: HashSet<String>,
    excluded_pages: HashSet<String>,
    origin: String,
}

impl MarkupRules {
    /// Compile `profile`; site-relative links are resolved against `origin`.
    pub fn new(profile: &MarkupProfile, origin: impl Into<String>) -> Result<Self> {
        Ok(Self {
            heading: Regex::new(&profile.heading_pattern)?,
            link: Regex::new(&profile.link_pattern)?,
            excluded_namespaces: profile.excluded_namespaces.iter().cloned().collect(),
            excluded_pages: profile.excluded_pages.iter().cloned().collect(),
            origin: origin.into(),
            profile: profile.clone(),
        })
    }

    pub fn is_article(&self, markup: &str) -> bool {
        validate_article(markup, &self.profile)
    }

    /// Build the section index for a seed page.
    pub fn discover(&self, markup: &str) -> SectionIndex {
        SectionIndex::fold(self.regions(markup))
    }

    fn regions(&self, markup: &str) -> Vec<Region> {
        let start = markup
            .find(&self.profile.body_start)
            .map(|i| i + self.profile.body_start.len())
            .unwrap_or(0);
        let end = markup[start..]
            .rfind(&self.profile.body_end)
            .map(|i| start + i)
            .unwrap_or(markup.len());
        let body = &markup[start..end];

        let headings: Vec<_> = self.heading.captures_iter(body).collect();
        let mut regions = Vec::with_capacity(headings.len() + 1);

        let intro_end = headings
            .first()
            .and_then(|caps| caps.get(0))
            .map_or(body.len(), |m| m.start());
        regions.push(Region {
            section: INTRODUCTION.to_string(),
            links: self.links(&body[..intro_end]),
        });

        for (i, caps) in headings.iter().enumerate() {
            let (Some(whole), Some(title)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let section = section_title(title.as_str());
            if section.is_empty() {
                continue;
            }
            let region_end = headings
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(body.len(), |m| m.start());
            regions.push(Region {
                section,
                links: self.links(&body[whole.end()..region_end]),
            });
        }

        regions
    }

    /// Article links in `html`, absolutized, anchors dropped, deduplicated
    /// in first-seen order.
    fn links(&self, html: &str) -> Vec<(Topic, String)> {
        let mut seen = IndexSet::new();
        for caps in self.link.captures_iter(html) {
            let Some(path) = caps.get(1) else { continue };
            let path = path.as_str().split('#').next().unwrap_or_default();
            if self.is_excluded(path) {
                continue;
            }
            let url = format!("{}{}", self.origin, path);
            let topic = Topic::from_url(&url);
            if topic.as_str().is_empty() {
                continue;
            }
            seen.insert((topic, url));
        }
        seen.into_iter().collect()
    }

    fn is_excluded(&self, path: &str) -> bool {
        let page = path.rsplit('/').next().unwrap_or_default();
        if self.excluded_pages.contains(page) {
            return true;
        }
        let Some((namespace, _)) = page.split_once(':') else {
            return false;
        };
        let base = namespace.strip_suffix("_talk").unwrap_or(namespace);
        self.excluded_namespaces.contains(namespace) || self.excluded_namespaces.contains(base)
    }
}
