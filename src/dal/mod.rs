pub mod metadata_csv;
pub mod prompt_csv;
