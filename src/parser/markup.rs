use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static ALL_ELEMENTS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("*").unwrap());
static META: LazyLock<Selector> = LazyLock::new(|| Selector::parse("meta").unwrap());

/// Read-only queryable view over one parsed document.
///
/// Rebuilt fresh for every extraction call; nothing is cached across
/// documents, so concurrent extractions never share parser state.
pub struct MarkupView {
    doc: Html,
}

impl MarkupView {
    pub fn parse(html: &str) -> Self {
        Self {
            doc: Html::parse_document(html),
        }
    }

    pub(crate) fn document(&self) -> &Html {
        &self.doc
    }

    /// Text of every element matching `tag`, in document order.
    /// Unparseable selectors yield nothing rather than an error.
    pub fn tag_texts(&self, tag: &str) -> Vec<String> {
        let Ok(sel) = Selector::parse(tag) else {
            return Vec::new();
        };
        self.doc
            .select(&sel)
            .map(element_text)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Content of the first `<meta property=...>` tag with the given property.
    pub fn meta_property(&self, property: &str) -> Option<String> {
        self.doc.select(&META).find_map(|el| {
            let prop = el.value().attr("property")?;
            if !prop.eq_ignore_ascii_case(property) {
                return None;
            }
            let content = el.value().attr("content")?.trim();
            (!content.is_empty()).then(|| content.to_string())
        })
    }

    /// Text of every element whose `class` or `id` attribute contains
    /// `needle` (case-insensitive substring match), in document order.
    pub fn attr_texts_containing(&self, needle: &str) -> Vec<String> {
        let needle = needle.to_lowercase();
        self.doc
            .select(&ALL_ELEMENTS)
            .filter(|el| {
                ["class", "id"].iter().any(|attr| {
                    el.value()
                        .attr(attr)
                        .is_some_and(|v| v.to_lowercase().contains(&needle))
                })
            })
            .map(element_text)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Whitespace-collapsed text of one element and its descendants.
fn element_text(el: ElementRef) -> String {
    el.text()
        .flat_map(|t| t.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Tests ──
