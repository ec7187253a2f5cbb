use std::path::PathBuf;

use common::{
    catalog::{Program, Suite},
    config::{Config, Settings},
    results::{avgtime_path, speedup_path},
};
use eyre::Result;
use tokio::fs::try_exists;

pub async fn list_results(config: &Config) -> Result<()> {
    for suite in &config.suites {
        println!("{}", suite.id);
        for program in &suite.programs {
            let present = present_results(suite, program, &config.settings).await;
            let present = if present.is_empty() {
                "no results".to_owned()
            } else {
                present.join(" ")
            };
            println!("  {} ({}) -> {present}", program.name, program.stem);
        }
    }
    Ok(())
}

/// Names of the result files that exist for `program`, in a fixed order.
async fn present_results(suite: &Suite, program: &Program, settings: &Settings) -> Vec<String> {
    let stem = program.stem.as_str();
    let reference = suite.reference();
    let measured = settings.measured.as_str();
    let candidates: Vec<(String, PathBuf)> = vec![
        ("speedup".to_owned(), speedup_path(&settings.runtimes_dir, stem)),
        (
            "aux-speedup".to_owned(),
            speedup_path(&settings.aux_runtimes_dir, stem),
        ),
        (
            format!("{reference}-avgtime"),
            avgtime_path(&settings.runtimes_dir, stem, reference),
        ),
        (
            format!("{measured}-avgtime"),
            avgtime_path(&settings.runtimes_dir, stem, measured),
        ),
        (
            format!("aux-{reference}-avgtime"),
            avgtime_path(&settings.aux_runtimes_dir, stem, reference),
        ),
        (
            format!("aux-{measured}-avgtime"),
            avgtime_path(&settings.aux_runtimes_dir, stem, measured),
        ),
    ];

    let mut present = Vec::new();
    for (name, path) in candidates {
        if try_exists(&path).await.unwrap_or(false) {
            present.push(name);
        }
    }
    present
}
