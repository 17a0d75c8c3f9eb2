use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use super::html_tag::{next_element_sibling, stripped_text};

static CATEGORY_HEADING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3").expect("static selector"));
static TERM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("dt").expect("static selector"));
static VALUE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("dd").expect("static selector"));

pub const TABLE_HEADER: [&str; 3] = ["category", "details", "title"];

/// One category block of a detail page, before it is stamped with the page
/// title.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDetails {
    pub category: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataRecord {
    pub category: String,
    pub details: String,
    pub title: String,
}

impl MetadataRecord {
    pub fn fields(&self) -> [&str; 3] {
        [self.category.as_str(), self.details.as_str(), self.title.as_str()]
    }
}

/// Records collected for one prompt, in the order the pages were visited.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MetadataTable {
    records: Vec<MetadataRecord>,
}

impl MetadataTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_stamped(&mut self, title: &str, entries: Vec<CategoryDetails>) {
        self.records
            .extend(entries.into_iter().map(|entry| MetadataRecord {
                category: entry.category,
                details: entry.details,
                title: title.to_string(),
            }));
    }

    pub fn records(&self) -> &[MetadataRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Reads every `h3` category heading whose next element is a `dl`, joining
/// its term/value pairs as `"term = value"` fragments separated by spaces.
/// Headings without a definition list produce nothing.
pub fn extract_metadata(markup: &str) -> Vec<CategoryDetails> {
    let document = Html::parse_document(markup);

    document
        .select(&CATEGORY_HEADING)
        .filter_map(|heading| {
            let list = next_element_sibling(heading).filter(|e| e.value().name() == "dl")?;

            Some(CategoryDetails {
                category: stripped_text(heading),
                details: join_term_values(list),
            })
        })
        .collect()
}

fn join_term_values(list: ElementRef) -> String {
    list.select(&TERM)
        .zip(list.select(&VALUE))
        .map(|(term, value)| format!("{} = {}", stripped_text(term), stripped_text(value)))
        .collect::<Vec<String>>()
        .join(" ")
}
