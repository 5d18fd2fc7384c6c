//! Shared fixture: the stock portfolio markup, laid out for an 800px tall
//! viewport.

#![allow(dead_code)]

use folio_core::{Document, MemoryDocument, NodeId, PageConfig, Viewport};
use folio_runtime::{Page, PageEnv};

pub const SECTIONS: [&str; 3] = ["about", "work", "contact"];

pub struct StockPage {
    pub doc: MemoryDocument,
    pub header: NodeId,
    pub nav: NodeId,
    pub toggle: NodeId,
    pub list: NodeId,
    pub links: Vec<NodeId>,
    pub hero_content: NodeId,
    pub sections: Vec<NodeId>,
    pub titles: Vec<NodeId>,
    pub cards: Vec<NodeId>,
    pub footer_text: NodeId,
}

/// ```text
/// header.header            0..80 (fixed)
/// section.hero             0..800
/// section#about          800..1800
/// section#work          1800..2800   (grid of four project cards)
/// section#contact       2800..3600
/// footer                3600..3800
/// ```
pub fn stock_page() -> StockPage {
    let mut doc = MemoryDocument::new();
    let body = doc.body();

    let header = doc.append(body, "header").class("header").span(0.0, 80.0).id();
    let nav = doc.append(header, "nav").class("nav").id();
    let toggle = doc
        .append(nav, "button")
        .class("nav__toggle")
        .attr("aria-expanded", "false")
        .id();
    let list = doc.append(nav, "ul").class("nav__list").id();
    let links = SECTIONS
        .iter()
        .map(|name| {
            let item = doc.append(list, "li").id();
            doc.append(item, "a")
                .class("nav__link")
                .attr("href", &format!("#{name}"))
                .attr("data-section", name)
                .id()
        })
        .collect();

    let hero = doc.append(body, "section").class("hero").span(0.0, 800.0).id();
    let hero_content = doc.append(hero, "div").class("hero__content").id();

    let mut sections = Vec::new();
    let mut titles = Vec::new();
    let mut cards = Vec::new();
    let tops = [800.0, 1800.0, 2800.0];
    let heights = [1000.0, 1000.0, 800.0];
    for (i, name) in SECTIONS.iter().enumerate() {
        let top = tops[i];
        let section = doc
            .append(body, "section")
            .attr("id", name)
            .span(top, heights[i])
            .id();
        let title = doc
            .append(section, "h2")
            .class("section__title")
            .span(top + 40.0, 60.0)
            .id();
        if *name == "work" {
            let grid = doc.append(section, "div").class("grid").id();
            for c in 0..4 {
                let card = doc
                    .append(grid, "article")
                    .class("project-card")
                    .span(top + 160.0 + f64::from(c) * 200.0, 180.0)
                    .id();
                cards.push(card);
            }
        }
        sections.push(section);
        titles.push(title);
    }

    let footer = doc.append(body, "footer").span(3600.0, 200.0).id();
    let footer_text = doc.append(footer, "p").id();

    StockPage {
        doc,
        header,
        nav,
        toggle,
        list,
        links,
        hero_content,
        sections,
        titles,
        cards,
        footer_text,
    }
}

pub fn env() -> PageEnv {
    PageEnv {
        viewport: Viewport::new(1280.0, 800.0),
        ..PageEnv::default()
    }
}

/// Mount the stock page and run the initial frame.
pub fn mounted(config: PageConfig, env: PageEnv) -> (Page<MemoryDocument>, StockPage) {
    let mut fixture = stock_page();
    let doc = std::mem::take(&mut fixture.doc);
    let mut page = Page::mount(doc, config, env);
    page.frame(std::time::Duration::ZERO);
    (page, fixture)
}

/// Links currently carrying `aria-current="page"`.
pub fn current_links(page: &Page<MemoryDocument>, fixture: &StockPage) -> Vec<usize> {
    fixture
        .links
        .iter()
        .enumerate()
        .filter(|&(_, &l)| page.document().attribute(l, "aria-current") == Some("page"))
        .map(|(i, _)| i)
        .collect()
}
