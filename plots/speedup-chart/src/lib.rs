use std::path::Path;

use common::{
    catalog::Suite,
    config::{Config, Settings},
    report::{Report, ReportSummary, SuiteSummary, ensure_dirs},
    results::{read_measurement, speedup_path},
};
use eyre::{Context, Result, bail};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::Serialize;
use tokio::fs::write;
use tracing::{debug, error, warn};

mod draw;
pub mod layout;

use draw::{ChartJob, draw_chart};
use layout::ChartLayout;

/// Grouped bar chart of per-program speedups, one image per suite.
#[derive(Debug, Default, Clone)]
pub struct SpeedupChart;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedupRecord {
    pub name: String,
    pub speedup: f64,
    /// Zero when the suite has no auxiliary series or its file is missing
    pub aux_speedup: f64,
}

/// Reads the speedups of every program in `suite`, dropping programs whose
/// primary result file is missing or unparseable.
pub async fn collect_records(
    suite: &Suite,
    settings: &Settings,
) -> (Vec<SpeedupRecord>, SuiteSummary) {
    let mut records = Vec::new();
    let mut summary = SuiteSummary::new(&suite.id);

    for program in &suite.programs {
        let path = speedup_path(&settings.runtimes_dir, &program.stem);
        let speedup = match read_measurement(&path).await {
            Ok(speedup) => speedup,
            Err(err) => {
                warn!(
                    "Skipping {} as {} could not be opened: {err}",
                    program.name,
                    path.display()
                );
                summary.skipped.push(program.name.clone());
                continue;
            }
        };

        let aux_speedup = if suite.aux {
            let aux_path = speedup_path(&settings.aux_runtimes_dir, &program.stem);
            read_measurement(&aux_path).await.unwrap_or_else(|err| {
                debug!("No auxiliary speedup for {}: {err}", program.name);
                0.0
            })
        } else {
            0.0
        };

        summary.rendered.push(program.name.clone());
        records.push(SpeedupRecord {
            name: program.name.clone(),
            speedup,
            aux_speedup,
        });
    }
    (records, summary)
}

#[async_trait::async_trait]
impl Report for SpeedupChart {
    fn name(&self) -> &'static str {
        "speedup-chart"
    }

    async fn render(&self, config: &Config, out_dir: &Path) -> Result<ReportSummary> {
        let settings = &config.settings.chart;
        let data_dir = out_dir.join("plot_data");
        let mut dirs = vec![out_dir.to_path_buf()];
        if settings.dump_data {
            dirs.push(data_dir.clone());
        }
        ensure_dirs(&dirs).await?;

        let mut summary = ReportSummary::default();
        let mut jobs = Vec::new();
        for suite in &config.suites {
            let (records, suite_summary) = collect_records(suite, &config.settings).await;
            summary.suites.push(suite_summary);
            if records.is_empty() {
                warn!("No results for suite {}, not plotting", suite.id);
                continue;
            }

            if settings.dump_data {
                let data_path = data_dir.join(format!("{}.json", suite.id));
                write(&data_path, serde_json::to_string_pretty(&records)?)
                    .await
                    .context(format!("Write {}", data_path.display()))?;
            }

            let width = settings.width_per_program * suite.programs.len() as u32;
            jobs.push(ChartJob {
                suite: suite.id.clone(),
                filepath: out_dir.join(format!("{}.{}", suite.id, settings.format.extension())),
                layout: ChartLayout::new(&records, suite.aux, settings),
                size: (width.max(settings.width_per_program), settings.height),
            });
        }

        let failed = jobs
            .into_par_iter()
            .map(|job| draw_chart(&job, settings).map_err(|err| (job.suite.clone(), err)))
            .collect::<Vec<_>>()
            .into_iter()
            .filter_map(|res| res.err())
            .map(|(suite, err)| {
                error!("Could not plot {suite}: {err:#}");
                suite
            })
            .collect::<Vec<_>>();
        if !failed.is_empty() {
            bail!("Plotting failed for suites {failed:?}");
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use common::catalog::{Program, default_catalog};

    use super::*;

    fn settings_in(root: &Path) -> Settings {
        Settings {
            runtimes_dir: root.join("runtimes"),
            aux_runtimes_dir: root.join("aux_runtimes"),
            ..Default::default()
        }
    }

    fn put(dir: &Path, file: &str, contents: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(file), contents).unwrap();
    }

    fn suite(aux: bool) -> Suite {
        Suite {
            id: "rodinia".to_owned(),
            aux,
            reference: None,
            programs: vec![
                Program::new("Backprop", "backprop"),
                Program::new("CFD", "cfd"),
                Program::new("HotSpot", "hotspot"),
            ],
        }
    }

    #[tokio::test]
    async fn drops_programs_without_primary() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        put(&settings.runtimes_dir, "backprop.speedup", "2.5\n");
        put(&settings.runtimes_dir, "cfd.speedup", "not a number");
        put(&settings.runtimes_dir, "hotspot.speedup", "0.8");

        let (records, summary) = collect_records(&suite(true), &settings).await;
        let names = records.iter().map(|r| r.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["Backprop", "HotSpot"]);
        assert_eq!(records[0].speedup, 2.5);
        assert_eq!(summary.rendered, ["Backprop", "HotSpot"]);
        assert_eq!(summary.skipped, ["CFD"]);
    }

    #[tokio::test]
    async fn missing_aux_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        put(&settings.runtimes_dir, "backprop.speedup", "2.5");
        put(&settings.runtimes_dir, "cfd.speedup", "1.5");
        put(&settings.aux_runtimes_dir, "cfd.speedup", "3.25");

        let (records, _) = collect_records(&suite(true), &settings).await;
        assert_eq!(records[0].aux_speedup, 0.0);
        assert_eq!(records[1].aux_speedup, 3.25);
    }

    #[tokio::test]
    async fn aux_ignored_for_suites_without_aux() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        put(&settings.runtimes_dir, "cfd.speedup", "1.5");
        put(&settings.aux_runtimes_dir, "cfd.speedup", "3.25");

        let (records, _) = collect_records(&suite(false), &settings).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].aux_speedup, 0.0);
    }

    #[tokio::test]
    async fn empty_suites_are_summarised_not_plotted() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("out");
        let mut config = Config {
            settings: settings_in(dir.path()),
            suites: default_catalog(),
        };
        config.settings.chart.dump_data = true;

        let summary = SpeedupChart.render(&config, &out_dir).await.unwrap();
        assert_eq!(summary.rendered_count(), 0);
        assert_eq!(summary.skipped_count(), 25);
        let ids = summary
            .suites
            .iter()
            .map(|s| s.suite.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["rodinia", "accelerate", "finpar", "parboil"]);
        assert!(out_dir.join("plot_data").is_dir());
        assert!(!out_dir.join("rodinia.svg").exists());
    }

    #[tokio::test]
    async fn draws_one_svg_per_suite_with_aux_only_where_configured() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("out");
        let config = Config {
            settings: settings_in(dir.path()),
            suites: default_catalog()
                .into_iter()
                .filter(|s| s.id == "accelerate" || s.id == "parboil" || s.id == "finpar")
                .collect(),
        };
        let runtimes = &config.settings.runtimes_dir;
        let aux_runtimes = &config.settings.aux_runtimes_dir;
        put(runtimes, "crystal.speedup", "2.5");
        put(aux_runtimes, "crystal.speedup", "4.0");
        put(runtimes, "sgemm.speedup", "1.75");
        put(aux_runtimes, "sgemm.speedup", "3.0");

        let summary = SpeedupChart.render(&config, &out_dir).await.unwrap();
        assert_eq!(summary.rendered_count(), 2);

        // svg colours may be written in either case
        let svg = |suite: &str| fs::read_to_string(out_dir.join(format!("{suite}.svg"))).unwrap();
        let accelerate = svg("accelerate");
        assert!(accelerate.contains("2.50"));
        assert!(!accelerate.contains("4.00"));
        assert!(!accelerate.to_lowercase().contains("#ee5500"));
        assert!(!accelerate.contains("AMD W8100"));

        let parboil = svg("parboil");
        assert!(parboil.contains("1.75"));
        assert!(parboil.contains("3.00"));
        assert!(parboil.to_lowercase().contains("#ee5500"));
        assert!(parboil.contains("AMD W8100"));

        assert!(!out_dir.join("finpar.svg").exists());
    }
}
