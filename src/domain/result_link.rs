use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

use super::html_tag::stripped_text;

static RESULT_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.search-result-item-title").expect("static selector"));

/// One entry of a search results page.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultLink {
    pub title: String,
    pub url: Url,
}

/// Result item anchors in document order, with targets resolved against the
/// results page URL. Anchors without a resolvable `href` are skipped.
pub fn extract_result_links(markup: &str, page_url: &Url) -> Vec<ResultLink> {
    let document = Html::parse_document(markup);

    document
        .select(&RESULT_TITLE)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            match page_url.join(href) {
                Ok(url) => Some(ResultLink {
                    title: stripped_text(anchor),
                    url,
                }),
                Err(e) => {
                    log::warn!("Skipping result with unresolvable href {:?}: {}", href, e);
                    None
                }
            }
        })
        .collect()
}
