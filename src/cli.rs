//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use harvester_core::{HarvestConfig, PageScope, ResolverKind};

/// Crawl the SDS document-support search and download every PDF it links to.
///
/// Values not given on the command line come from the config file, then from
/// built-in defaults.
#[derive(Parser, Debug)]
#[command(name = "harvester")]
#[command(author, version, about)]
pub struct Args {
    /// Config file (default: $XDG_CONFIG_HOME/harvester/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// First search page to crawl (inclusive)
    #[arg(short = 's', long, value_name = "PAGE")]
    pub start_page: Option<u32>,

    /// Last search page to crawl (inclusive)
    #[arg(short = 'e', long, value_name = "PAGE")]
    pub end_page: Option<u32>,

    /// Directory the PDFs are written to
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Maximum concurrent downloads (1-100)
    #[arg(short = 'c', long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: Option<u8>,

    /// Results requested per search page (1-500)
    #[arg(long = "per-page", value_parser = clap::value_parser!(u32).range(1..=500))]
    pub per_page: Option<u32>,

    /// API root URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// How document URLs are resolved: browser, http or none
    #[arg(long, value_name = "KIND")]
    pub resolver: Option<ResolverKind>,

    /// Per-file download timeout in seconds (1-3600)
    #[arg(long = "download-timeout", value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub download_timeout: Option<u64>,

    /// Re-walk every document seen so far on each page
    #[arg(long)]
    pub reprocess_seen: bool,

    /// Chrome/Chromium executable for the browser resolver
    #[arg(long, value_name = "PATH")]
    pub chrome: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Overlays every flag that was given onto `config`.
    pub fn apply_to(&self, config: &mut HarvestConfig) {
        if let Some(start_page) = self.start_page {
            config.start_page = start_page;
        }
        if let Some(end_page) = self.end_page {
            config.end_page = end_page;
        }
        if let Some(ref output_dir) = self.output_dir {
            config.output_dir.clone_from(output_dir);
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = usize::from(concurrency);
        }
        if let Some(per_page) = self.per_page {
            config.results_per_page = per_page;
        }
        if let Some(ref base_url) = self.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(resolver) = self.resolver {
            config.resolver = resolver;
        }
        if let Some(secs) = self.download_timeout {
            config.download_timeout_secs = secs;
        }
        if self.reprocess_seen {
            config.page_scope = PageScope::Cumulative;
        }
        if let Some(ref chrome) = self.chrome {
            config.browser.chrome_executable = Some(chrome.clone());
        }
    }
}
