use url::{form_urlencoded, Url};

use super::file_name;

/// A search term driving one crawl pass, kept exactly as read (minus
/// surrounding whitespace). The per-prompt image directory and metadata file
/// are named after [`SearchPrompt::file_stem`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchPrompt(String);

impl SearchPrompt {
    pub fn parse(s: &str) -> Result<SearchPrompt, String> {
        let trimmed = s.trim();
        match trimmed.is_empty() {
            true => Err(format!("{:?} is not a valid search prompt", s)),
            false => Ok(Self(trimmed.to_string())),
        }
    }

    /// Query fragment for the archive search endpoint: underscores and
    /// whitespace join words with `+`, everything else is form-encoded.
    pub fn query_fragment(&self) -> String {
        let words: Vec<&str> = self
            .0
            .split(|c: char| c == '_' || c.is_whitespace())
            .filter(|w| !w.is_empty())
            .collect();

        form_urlencoded::byte_serialize(words.join(" ").as_bytes()).collect()
    }

    pub fn search_url(&self, search_base_url: &str) -> Result<Url, url::ParseError> {
        Url::parse(&format!("{}{}", search_base_url, self.query_fragment()))
    }

    /// The prompt as a single path component. Never empty, since a prompt is
    /// never blank.
    pub fn file_stem(&self) -> String {
        file_name::file_stem(&self.0)
    }
}

impl AsRef<str> for SearchPrompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SearchPrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
