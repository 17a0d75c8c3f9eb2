use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

use super::html_tag::stripped_text;

static DOWNLOAD_ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.large-download").expect("static selector"));

pub const FULL_SIZE_LABEL: &str = "Full-size image";

/// Absolute URL of the detail page's full resolution download, if the page
/// offers one with a usable `href`.
pub fn find_full_size_image(markup: &str, page_url: &Url) -> Option<Url> {
    let document = Html::parse_document(markup);

    let href = document
        .select(&DOWNLOAD_ANCHOR)
        .find(|anchor| stripped_text(*anchor) == FULL_SIZE_LABEL)?
        .value()
        .attr("href")?;

    match page_url.join(href) {
        Ok(url) => Some(url),
        Err(e) => {
            log::warn!("Unusable download link {:?} on {}: {}", href, page_url, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::find_full_size_image;

    fn page_url() -> Url {
        Url::parse("https://umedia.lib.umn.edu/item/p16022coll175:1").unwrap()
    }

    #[test]
    fn find_full_size_image_valid() {
        let markup = r#"
            <a class="large-download" href="/downloads/small.jpg">Small image</a>
            <a class="btn large-download" href="/downloads/full.jpg">
                Full-size image
            </a>
        "#;

        let url = find_full_size_image(markup, &page_url()).unwrap();
        assert_eq!(url.as_str(), "https://umedia.lib.umn.edu/downloads/full.jpg");
    }

    #[test]
    fn find_full_size_image_requires_class() {
        let markup = r#"<a class="download" href="/downloads/full.jpg">Full-size image</a>"#;
        assert!(find_full_size_image(markup, &page_url()).is_none());
    }

    #[test]
    fn find_full_size_image_requires_exact_label() {
        let markup = r#"<a class="large-download" href="/downloads/full.jpg">Full-size image (TIFF)</a>"#;
        assert!(find_full_size_image(markup, &page_url()).is_none());
    }

    #[test]
    fn find_full_size_image_requires_href() {
        let markup = r#"<a class="large-download">Full-size image</a>"#;
        assert!(find_full_size_image(markup, &page_url()).is_none());
    }

    #[test]
    fn find_full_size_image_keeps_absolute_href() {
        let markup =
            r#"<a class="large-download" href="https://cdn.example.org/iiif/full.jpg">Full-size image</a>"#;

        let url = find_full_size_image(markup, &page_url()).unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.org/iiif/full.jpg");
    }
}
