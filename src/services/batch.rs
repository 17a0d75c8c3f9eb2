use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    dal::{metadata_csv, prompt_csv},
    domain::{metadata::MetadataTable, search_prompt::SearchPrompt},
};

use super::{ArchiveScraper, SessionLauncher};

#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(SearchPrompt, String)>,
}

/// Crawls every prompt of a prompt file in order, then writes one metadata
/// table per prompt that completed. Prompts sharing a file name share one
/// table; the last crawl wins.
pub struct BatchDriver<L: SessionLauncher> {
    scraper: ArchiveScraper<L>,
    download_limit: usize,
    prompt_column: String,
    metadata_dir: PathBuf,
}

impl<L: SessionLauncher> BatchDriver<L> {
    pub fn new(
        scraper: ArchiveScraper<L>,
        download_limit: usize,
        prompt_column: String,
        metadata_dir: PathBuf,
    ) -> Self {
        BatchDriver {
            scraper,
            download_limit,
            prompt_column,
            metadata_dir,
        }
    }

    pub async fn run_batch(&self, prompt_source: &Path) -> anyhow::Result<BatchReport> {
        let prompts = prompt_csv::read_prompts(prompt_source, &self.prompt_column)
            .with_context(|| format!("Failed to load prompts from {}", prompt_source.display()))?;
        log::info!(
            "Loaded {} prompts from {}",
            prompts.len(),
            prompt_source.display()
        );

        let mut report = BatchReport::default();
        let mut tables: Vec<(SearchPrompt, MetadataTable)> = vec![];

        for prompt in prompts {
            match self.scraper.run(&prompt, self.download_limit).await {
                Ok(table) => {
                    let stem = prompt.file_stem();
                    match tables.iter_mut().find(|(p, _)| p.file_stem() == stem) {
                        Some(entry) => {
                            log::warn!("Prompt {} repeats; keeping its latest results", prompt);
                            *entry = (prompt, table);
                        }
                        None => tables.push((prompt, table)),
                    }
                }
                Err(e) => {
                    log::error!("Scraping prompt {} failed: {:?}", prompt, e);
                    report.failed.push((prompt, e.to_string()));
                }
            }
        }

        std::fs::create_dir_all(&self.metadata_dir).with_context(|| {
            format!(
                "Failed to create metadata directory {}",
                self.metadata_dir.display()
            )
        })?;

        for (prompt, table) in tables {
            let path = self.metadata_dir.join(format!("{}.csv", prompt.file_stem()));
            match metadata_csv::write_table(&path, &table) {
                Ok(()) => {
                    log::info!("Saved {} metadata records to {}", table.len(), path.display());
                    report.written.push(path);
                }
                Err(e) => {
                    log::error!("Failed to write metadata to {}: {:?}", path.display(), e);
                    report.failed.push((prompt, e.to_string()));
                }
            }
        }

        Ok(report)
    }
}
