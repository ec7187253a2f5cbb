use core::fmt::Debug;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use futures::future::join_all;
use tokio::fs::create_dir_all;

use crate::config::Config;

#[async_trait::async_trait]
pub trait Report: Debug + Send + Sync {
    /// Name of the report, for logs and summaries
    fn name(&self) -> &'static str;
    /// Renders the report for every suite in the config
    ///
    /// Arguments:
    /// * `config` - Catalog and settings, including where result files live
    /// * `out_dir` - Directory the artifacts are written to
    async fn render(&self, config: &Config, out_dir: &Path) -> Result<ReportSummary>;
}

/// Which programs of a suite made it into the output, in catalog order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SuiteSummary {
    pub suite: String,
    pub rendered: Vec<String>,
    pub skipped: Vec<String>,
}

impl SuiteSummary {
    pub fn new(suite: &str) -> Self {
        Self {
            suite: suite.to_owned(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReportSummary {
    pub suites: Vec<SuiteSummary>,
}

impl ReportSummary {
    pub fn rendered_count(&self) -> usize {
        self.suites.iter().map(|s| s.rendered.len()).sum()
    }

    pub fn skipped_count(&self) -> usize {
        self.suites.iter().map(|s| s.skipped.len()).sum()
    }
}

pub async fn ensure_dirs(dirs: &[PathBuf]) -> Result<()> {
    let create_jobs = dirs.iter().map(create_dir_all);
    for (res, dir) in join_all(create_jobs).await.into_iter().zip(dirs) {
        res.context(format!("Create output dir {}", dir.display()))?;
    }
    Ok(())
}
