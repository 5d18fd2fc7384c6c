#![forbid(unsafe_code)]

//! One-shot discovery of the markup the controllers operate on.
//!
//! Everything is looked up once, at mount, and handed to the controllers as
//! plain handles. The set of sections is fixed for the page's lifetime.

use std::fmt;

use crate::config::PageConfig;
use crate::dom::{Document, NodeId};

/// Opaque identifier of a page section (its `id` attribute).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(String);

impl SectionId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A navigation link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub node: NodeId,
    /// Raw `href` attribute.
    pub href: Option<String>,
    /// `data-section` attribute, linking the entry to a section.
    pub section: Option<SectionId>,
}

/// A tracked page section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRoot {
    pub node: NodeId,
    pub id: SectionId,
}

/// An in-page anchor (`a[href^="#"]`, excluding a bare `#`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorLink {
    pub node: NodeId,
    /// Target element id, without the `#`.
    pub target_id: String,
}

/// An element animated by scroll reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animatable {
    pub node: NodeId,
    /// Nearest enclosing grid container, if any.
    pub grid: Option<NodeId>,
}

/// Handles to every piece of markup the controllers need.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiRoots {
    pub nav: Option<NodeId>,
    pub toggle: Option<NodeId>,
    pub nav_list: Option<NodeId>,
    pub nav_links: Vec<NavLink>,
    pub sections: Vec<SectionRoot>,
    pub header: Option<NodeId>,
    pub hero: Option<NodeId>,
    pub hero_content: Option<NodeId>,
    pub anchors: Vec<AnchorLink>,
    pub animatables: Vec<Animatable>,
}

impl UiRoots {
    /// Locate everything in `doc` using the class names in `config`.
    #[must_use]
    pub fn discover<D: Document + ?Sized>(doc: &D, config: &PageConfig) -> Self {
        let sel = &config.selectors;
        let nodes = doc.node_ids();

        let nav_links = doc
            .query_class(&sel.nav_link)
            .into_iter()
            .map(|node| NavLink {
                node,
                href: doc.attribute(node, "href").map(str::to_string),
                section: doc.attribute(node, "data-section").map(SectionId::from),
            })
            .collect();

        let sections = nodes
            .iter()
            .filter(|&&n| doc.tag(n) == Some(sel.section_tag.as_str()))
            .filter_map(|&n| {
                let id = doc.attribute(n, "id")?;
                (!id.is_empty()).then(|| SectionRoot {
                    node: n,
                    id: SectionId::from(id),
                })
            })
            .collect();

        let anchors = nodes
            .iter()
            .filter(|&&n| doc.tag(n) == Some("a"))
            .filter_map(|&n| {
                let target = doc.attribute(n, "href")?.strip_prefix('#')?;
                (!target.is_empty()).then(|| AnchorLink {
                    node: n,
                    target_id: target.to_string(),
                })
            })
            .collect();

        let reveal = &config.reveal;
        let animatables = nodes
            .iter()
            .filter(|&&n| {
                reveal
                    .animatable_classes
                    .iter()
                    .any(|c| doc.has_class(n, c))
            })
            .map(|&node| Animatable {
                node,
                grid: doc.parent(node).and_then(|p| {
                    sel.grid_classes
                        .iter()
                        .filter_map(|g| doc.closest_with_class(p, g))
                        .max_by_key(|&g| depth(doc, g))
                }),
            })
            .collect();

        Self {
            nav: doc.first_with_class(&sel.nav),
            toggle: doc.first_with_class(&sel.toggle),
            nav_list: doc.first_with_class(&sel.nav_list),
            nav_links,
            sections,
            header: doc.first_with_class(&sel.header),
            hero: doc.first_with_class(&sel.hero),
            hero_content: doc.first_with_class(&sel.hero_content),
            anchors,
            animatables,
        }
    }

    /// Section with `id`, if tracked.
    #[must_use]
    pub fn section(&self, id: &str) -> Option<&SectionRoot> {
        self.sections.iter().find(|s| s.id.as_str() == id)
    }
}

fn depth<D: Document + ?Sized>(doc: &D, node: NodeId) -> usize {
    let mut depth = 0;
    let mut cursor = doc.parent(node);
    while let Some(p) = cursor {
        depth += 1;
        cursor = doc.parent(p);
    }
    depth
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDocument;

    #[test]
    fn discovers_stock_markup() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let header = doc.append(body, "header").class("header").id();
        let nav = doc.append(header, "nav").class("nav").id();
        let toggle = doc.append(nav, "button").class("nav__toggle").id();
        let list = doc.append(nav, "ul").class("nav__list").id();
        let link = doc
            .append(list, "a")
            .class("nav__link")
            .attr("href", "#about")
            .attr("data-section", "about")
            .id();
        let about = doc.append(body, "section").attr("id", "about").id();
        let _anon = doc.append(body, "section").id();
        let _top = doc.append(body, "a").attr("href", "#").id();
        let grid = doc.append(about, "div").class("grid").id();
        let card = doc.append(grid, "article").class("card").id();
        let title = doc.append(about, "h2").class("section__title").id();

        let roots = UiRoots::discover(&doc, &PageConfig::default());
        assert_eq!(roots.header, Some(header));
        assert_eq!(roots.nav, Some(nav));
        assert_eq!(roots.toggle, Some(toggle));
        assert_eq!(roots.nav_list, Some(list));
        assert_eq!(roots.nav_links.len(), 1);
        assert_eq!(roots.nav_links[0].section, Some(SectionId::from("about")));
        assert_eq!(roots.sections.len(), 1);
        assert_eq!(roots.section("about").map(|s| s.node), Some(about));
        assert_eq!(
            roots.anchors,
            vec![AnchorLink {
                node: link,
                target_id: "about".into(),
            }]
        );
        assert_eq!(
            roots.animatables,
            vec![
                Animatable {
                    node: card,
                    grid: Some(grid),
                },
                Animatable {
                    node: title,
                    grid: None,
                },
            ]
        );
        assert_eq!(roots.hero, None);
    }

    #[test]
    fn empty_document_discovers_nothing() {
        let doc = MemoryDocument::new();
        let roots = UiRoots::discover(&doc, &PageConfig::default());
        assert_eq!(roots, UiRoots::default());
    }
}
