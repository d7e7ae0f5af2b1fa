//! The page, document and file orchestrator.
//!
//! Pages are walked in order, and each page's documents one after another.
//! Only downloads run concurrently: every accepted file is handed to the
//! [`DownloadEngine`], and [`Harvester::run`] returns once all of them
//! have finished.

mod error;
pub mod filter;

pub use error::HarvestError;
pub use filter::TargetFilter;

pub use crate::config::PageScope;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, instrument, warn};

use crate::api::{ApiClient, DocumentRef, extract_document_ids, extract_file_refs};
use crate::config::HarvestConfig;
use crate::dedup::DocumentIdSet;
use crate::download::{
    DownloadEngine, DownloadStats, Downloader, EngineError, ResolvedTarget, filename_for,
};
use crate::resolver::{RedirectResolver, resolve_or_skip};

/// Crawls the configured page range and downloads every accepted file.
pub struct Harvester {
    config: HarvestConfig,
    api: ApiClient,
    resolver: Box<dyn RedirectResolver>,
    filter: TargetFilter,
    downloader: Downloader,
    show_progress: bool,
}

impl std::fmt::Debug for Harvester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harvester")
            .field("config", &self.config)
            .field("resolver", &self.resolver.name())
            .field("show_progress", &self.show_progress)
            .finish_non_exhaustive()
    }
}

impl Harvester {
    /// Validates `config` and builds the API client and downloader.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::Config`] for invalid settings and
    /// [`HarvestError::Api`] if the HTTP client cannot be built.
    pub fn new(
        config: HarvestConfig,
        resolver: Box<dyn RedirectResolver>,
    ) -> Result<Self, HarvestError> {
        config.validate()?;

        let api = ApiClient::new(
            config.base_url.as_str(),
            config.results_per_page,
            config.api_timeout_secs,
        )
        .map_err(HarvestError::Api)?;
        let downloader =
            Downloader::with_settings(config.download_timeout_secs, &config.expected_content_type);
        let filter = TargetFilter::new(config.skip_rules.clone());

        Ok(Self {
            config,
            api,
            resolver,
            filter,
            downloader,
            show_progress: false,
        })
    }

    /// Enables the page progress bar on stderr.
    #[must_use]
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Runs the whole harvest and returns the download statistics.
    ///
    /// Fetch, parse, resolution and download failures are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::OutputDir`] if the output directory cannot be
    /// created and [`HarvestError::Engine`] if the engine cannot run.
    pub async fn run(&self) -> Result<DownloadStats, HarvestError> {
        let output_dir = &self.config.output_dir;
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|source| HarvestError::OutputDir {
                path: output_dir.clone(),
                source,
            })?;

        let mut engine =
            DownloadEngine::new(self.config.concurrency, self.downloader.clone(), output_dir)?;
        let mut seen = DocumentIdSet::new();

        info!(
            start_page = self.config.start_page,
            end_page = self.config.end_page,
            resolver = self.resolver.name(),
            output_dir = %output_dir.display(),
            "starting harvest"
        );

        let progress = self.page_progress();
        for page in self.config.start_page..=self.config.end_page {
            progress.set_message(format!("page {page}"));
            self.process_page(page, &mut seen, &mut engine).await?;
            progress.inc(1);
        }
        progress.finish_and_clear();

        if seen.is_empty() {
            warn!(
                start_page = self.config.start_page,
                end_page = self.config.end_page,
                "no documents found in page range"
            );
        }
        info!(
            documents = seen.len(),
            enqueued = engine.enqueued(),
            "all pages processed, waiting for downloads"
        );
        Ok(engine.finish().await)
    }

    fn page_progress(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pages = u64::from(self.config.end_page - self.config.start_page) + 1;
        let bar = ProgressBar::new(pages);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} pages {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    }

    #[instrument(level = "info", skip(self, seen, engine))]
    async fn process_page(
        &self,
        page: u32,
        seen: &mut DocumentIdSet,
        engine: &mut DownloadEngine,
    ) -> Result<(), EngineError> {
        let url = self.api.search_url(page);
        let ids = match self.api.fetch_text(&url).await {
            Ok(body) => extract_document_ids(&body),
            Err(e) => {
                warn!(url = %url, error = %e, "search page fetch failed");
                Vec::new()
            }
        };
        let found = ids.len();
        let fresh = seen.extend(ids);

        let selected: Vec<DocumentRef> = match self.config.page_scope {
            PageScope::NewOnly => fresh,
            PageScope::Cumulative => seen.iter().cloned().collect(),
        };
        info!(found, processing = selected.len(), seen = seen.len(), "page fetched");

        for id in &selected {
            self.process_document(id, engine).await?;
        }
        Ok(())
    }

    async fn process_document(
        &self,
        id: &DocumentRef,
        engine: &mut DownloadEngine,
    ) -> Result<(), EngineError> {
        let url = self.api.detail_url(id);
        let files = match self.api.fetch_text(&url).await {
            Ok(body) => extract_file_refs(&body),
            Err(e) => {
                warn!(document = %id, error = %e, "document detail fetch failed");
                return Ok(());
            }
        };
        debug!(document = %id, files = files.len(), "document fetched");

        for file in files {
            if !self.filter.accepts(&file.location) {
                continue;
            }
            let Some(resolved) = resolve_or_skip(self.resolver.as_ref(), &file.location).await
            else {
                continue;
            };
            if !self.filter.accepts_resolved(&resolved) {
                continue;
            }
            engine
                .enqueue(ResolvedTarget::new(filename_for(&file), resolved))
                .await?;
        }
        Ok(())
    }
}
