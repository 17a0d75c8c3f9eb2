use scraper::{ElementRef, Html, Selector};

/// Text of an element the way the archive's markup is read everywhere: each
/// text node trimmed, then concatenated.
pub fn stripped_text(element: ElementRef) -> String {
    element.text().map(str::trim).collect()
}

/// The next sibling that is an element, skipping text and comment nodes.
pub fn next_element_sibling(element: ElementRef) -> Option<ElementRef> {
    element.next_siblings().find_map(ElementRef::wrap)
}

pub fn contains_match(markup: &str, selector: &Selector) -> bool {
    Html::parse_document(markup).select(selector).next().is_some()
}
