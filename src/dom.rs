//! Read-only queries over a parsed `scraper::Html` tree.
//!
//! Everything here walks the tree in document order, which is what the
//! extractors rely on for "first match wins".

use scraper::{ElementRef, Html, Node};

/// Elements whose text never reaches the rendered page.
const HIDDEN_TAGS: &[&str] = &["head", "script", "style", "noscript", "template"];

/// Paragraph-, container- and heading-like elements a section can start in.
pub const CONTAINER_TAGS: &[&str] = &[
    "p", "div", "section", "article", "blockquote", "center", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Block elements outside `CONTAINER_TAGS` that still separate words.
const BREAK_TAGS: &[&str] = &["br", "li", "ul", "ol", "table", "tr", "td", "th", "dd", "dt"];

/// Headings that always end a labeled section.
pub const SECTION_HEADINGS: &[&str] = &["h2", "h3", "h4"];

/// A text node together with the element that directly contains it.
#[derive(Clone, Copy)]
pub struct TextHit<'a> {
    pub text: &'a str,
    pub parent: ElementRef<'a>,
}

/// A following sibling, as seen by the section walkers.
pub enum Sibling<'a> {
    Element(ElementRef<'a>),
    /// Loose, non-blank text with no tag of its own.
    Text(&'a str),
}

fn self_and_ancestors(el: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    std::iter::once(el).chain(el.ancestors().filter_map(ElementRef::wrap))
}

fn is_hidden(el: ElementRef<'_>) -> bool {
    self_and_ancestors(el).any(|e| HIDDEN_TAGS.contains(&e.value().name()))
}

/// Visible text nodes in document order.
pub fn visible_texts(doc: &Html) -> impl Iterator<Item = TextHit<'_>> {
    doc.tree.root().descendants().filter_map(|node| {
        let text: &str = node.value().as_text()?;
        let parent = node.parent().and_then(ElementRef::wrap)?;
        if text.trim().is_empty() || is_hidden(parent) {
            return None;
        }
        Some(TextHit { text, parent })
    })
}

/// First visible text node accepted by `pred`.
pub fn find_text<'a>(doc: &'a Html, pred: impl Fn(&str) -> bool) -> Option<TextHit<'a>> {
    visible_texts(doc).find(|hit| pred(hit.text))
}

/// Closest element, starting at `el` itself, whose tag is in `tags`.
pub fn nearest_ancestor<'a>(el: ElementRef<'a>, tags: &[&str]) -> Option<ElementRef<'a>> {
    self_and_ancestors(el).find(|e| tags.contains(&e.value().name()))
}

/// Visible elements with a tag in `tags`, in document order.
pub fn elements_by_tag<'a>(doc: &'a Html, tags: &'a [&'a str]) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    doc.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(move |e| tags.contains(&e.value().name()) && !is_hidden(*e))
}

/// Following siblings of `el`. Blank text, comments and script/style
/// elements are skipped.
pub fn following_siblings(el: ElementRef<'_>) -> impl Iterator<Item = Sibling<'_>> {
    el.next_siblings().filter_map(|node| {
        if let Some(e) = ElementRef::wrap(node) {
            return (!has_tag(e, HIDDEN_TAGS)).then_some(Sibling::Element(e));
        }
        match node.value() {
            Node::Text(t) if !t.trim().is_empty() => Some(Sibling::Text(&**t)),
            _ => None,
        }
    })
}

/// All text under `el`. Inline markup is concatenated as rendered; a
/// space separates `<br>` and block-level elements.
pub fn element_text(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    push_text(el, &mut out);
    out
}

fn push_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(inner) = ElementRef::wrap(child) {
            if has_tag(inner, HIDDEN_TAGS) {
                continue;
            }
            let breaks = has_tag(inner, BREAK_TAGS) || has_tag(inner, CONTAINER_TAGS);
            if breaks {
                out.push(' ');
            }
            push_text(inner, out);
            if breaks {
                out.push(' ');
            }
        }
    }
}

pub fn has_tag(el: ElementRef<'_>, tags: &[&str]) -> bool {
    tags.contains(&el.value().name())
}

pub fn href(el: ElementRef<'_>) -> Option<&str> {
    if el.value().name() == "a" {
        el.value().attr("href")
    } else {
        None
    }
}

/// `el` itself if it is a link, else its first link descendant.
pub fn first_link<'a>(el: ElementRef<'a>, accept: impl Fn(&str) -> bool) -> Option<ElementRef<'a>> {
    el.descendants()
        .filter_map(ElementRef::wrap)
        .find(|e| href(*e).is_some_and(&accept))
}
