use std::path::Path;

use crate::domain::search_prompt::SearchPrompt;

#[derive(Debug, thiserror::Error)]
pub enum PromptFileError {
    #[error("Failed to read prompt file: {0}")]
    Csv(#[from] csv::Error),

    #[error("Prompt file has no {0:?} column")]
    MissingColumn(String),
}

/// Prompts from the `column` of a delimited file, in file order. Blank cells
/// are logged and skipped.
pub fn read_prompts(path: &Path, column: &str) -> Result<Vec<SearchPrompt>, PromptFileError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Fields).from_path(path)?;

    let index = reader
        .headers()?
        .iter()
        .position(|header| header == column)
        .ok_or_else(|| PromptFileError::MissingColumn(column.to_string()))?;

    let mut prompts = vec![];
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        match SearchPrompt::parse(record.get(index).unwrap_or_default()) {
            Ok(prompt) => prompts.push(prompt),
            Err(e) => log::warn!("Skipping row {} of {}: {}", line + 1, path.display(), e),
        }
    }

    Ok(prompts)
}
