pub mod extract;
pub mod lists;
pub mod markup;
pub mod normalize;
pub mod sections;

use extract::JobRecord;

/// Three-pass pipeline: raw markup → parsed view + plain text → field
/// extractors. Infallible by design: any document, including an empty one,
/// yields a fully populated record whose missing fields carry sentinels.
pub fn process_document(html: &str) -> JobRecord {
    let view = markup::MarkupView::parse(html);
    let text = normalize::plain_text(&view);
    extract::extract_all(&view, &text)
}

/// Plain-text rendition only, for callers feeding external collaborators.
pub fn normalized_text(html: &str) -> String {
    normalize::plain_text(&markup::MarkupView::parse(html))
}
