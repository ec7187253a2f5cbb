use std::path::{Path, PathBuf};

use eyre::{Context, Result, bail};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::fs::read_to_string;
use tracing::debug;

use crate::catalog::{Suite, default_catalog};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub settings: Settings,
    pub suites: Vec<Suite>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            suites: default_catalog(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub runtimes_dir: PathBuf,
    pub aux_runtimes_dir: PathBuf,
    /// Implementation tag of the measured program in avgtime file names
    pub measured: String,
    pub chart: ChartSettings,
    pub table: TableSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            runtimes_dir: PathBuf::from("runtimes"),
            aux_runtimes_dir: PathBuf::from("aux_runtimes"),
            measured: "futhark".to_owned(),
            chart: ChartSettings::default(),
            table: TableSettings::default(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Svg,
    Png,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub y_max: f64,
    pub bar_width: f64,
    pub primary_label: String,
    pub aux_label: String,
    pub primary_color: String,
    pub aux_color: String,
    pub grid_color: String,
    /// Image width in pixels contributed by each program of a suite
    pub width_per_program: u32,
    pub height: u32,
    pub format: ImageFormat,
    /// Also write the chart records as json under `plot_data/`
    pub dump_data: bool,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            y_max: 6.0,
            bar_width: 0.5,
            primary_label: "NVIDIA K40".to_owned(),
            aux_label: "AMD W8100".to_owned(),
            primary_color: "#2255ee".to_owned(),
            aux_color: "#ee5500".to_owned(),
            grid_color: "#aaaaaa".to_owned(),
            width_per_program: 120,
            height: 300,
            format: ImageFormat::Svg,
            dump_data: false,
        }
    }
}

impl ChartSettings {
    /// Rejects axis and size values no chart can be drawn with.
    pub fn validate(&self) -> Result<()> {
        if !(self.y_max.is_finite() && self.y_max > 0.0) {
            bail!("chart.y_max must be a positive number, got {}", self.y_max);
        }
        if !(self.bar_width.is_finite() && self.bar_width > 0.0) {
            bail!("chart.bar_width must be a positive number, got {}", self.bar_width);
        }
        if self.width_per_program == 0 || self.height == 0 {
            bail!("chart.width_per_program and chart.height must be non-zero");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    pub precision: usize,
    pub placeholder: String,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            precision: 1,
            placeholder: "---".to_owned(),
        }
    }
}

impl Config {
    /// Reads the YAML config at `path`, or returns the built-in defaults when no path is given.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            debug!("No config file, using built-in catalog");
            return Ok(Self::default());
        };
        let contents = read_to_string(path)
            .await
            .context(format!("Reading config file {}", path.display()))?;
        Self::from_yaml(&contents).context(format!("Parsing config file {}", path.display()))
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: Self = serde_yml::from_str(contents)?;
        config.settings.chart.validate()?;
        Ok(config)
    }

    /// Keeps only the suites whose id matches `pattern`.
    pub fn retain_suites(&mut self, pattern: &str) -> Result<()> {
        let pattern = Regex::new(pattern).context(format!("Invalid suite filter {pattern}"))?;
        self.suites.retain(|suite| pattern.is_match(&suite.id));
        debug!(
            "Suites after filter: {:?}",
            self.suites.iter().map(|s| &s.id).collect::<Vec<_>>()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = Config::from_yaml(
            r#"
settings:
  runtimes_dir: results/k40
  chart:
    y_max: 10
    format: png
"#,
        )
        .unwrap();
        assert_eq!(config.settings.runtimes_dir, PathBuf::from("results/k40"));
        assert_eq!(config.settings.aux_runtimes_dir, PathBuf::from("aux_runtimes"));
        assert_eq!(config.settings.chart.y_max, 10.0);
        assert_eq!(config.settings.chart.format, ImageFormat::Png);
        assert_eq!(config.settings.chart.primary_label, "NVIDIA K40");
        assert_eq!(config.settings.table.placeholder, "---");
        assert_eq!(config.suites.len(), 4);
    }

    #[test]
    fn yaml_suites_replace_catalog() {
        let config = Config::from_yaml(
            r#"
suites:
  - id: custom
    aux: false
    reference: cuda
    programs:
      - { name: Foo, stem: foo }
      - { name: Bar, stem: bar }
  - id: other
    programs: []
"#,
        )
        .unwrap();
        assert_eq!(config.suites.len(), 2);
        assert!(!config.suites[0].aux);
        assert_eq!(config.suites[0].reference(), "cuda");
        assert_eq!(config.suites[0].programs[1].stem, "bar");
        assert!(config.suites[1].aux);
        assert_eq!(config.suites[1].reference(), "other");
    }

    #[test]
    fn rejects_unusable_chart_settings() {
        for chart in [
            "y_max: -1",
            "y_max: 0",
            "y_max: .nan",
            "bar_width: 0",
            "width_per_program: 0",
        ] {
            let yaml = format!("settings:\n  chart:\n    {chart}\n");
            assert!(Config::from_yaml(&yaml).is_err(), "{chart} accepted");
        }
        assert!(ChartSettings::default().validate().is_ok());
    }

    #[tokio::test]
    async fn load_rejects_negative_y_max() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.yaml");
        std::fs::write(&path, "settings:\n  chart:\n    y_max: -1\n").unwrap();
        let err = Config::load(Some(&path)).await.unwrap_err();
        assert!(format!("{err:#}").contains("y_max"));
    }

    #[test]
    fn retain_suites_by_pattern() {
        let mut config = Config::default();
        config.retain_suites("^(rodinia|parboil)$").unwrap();
        let ids = config.suites.iter().map(|s| s.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["rodinia", "parboil"]);

        assert!(config.retain_suites("(").is_err());
    }

    #[tokio::test]
    async fn load_without_path_is_default() {
        let config = Config::load(None).await.unwrap();
        assert_eq!(config.settings.measured, "futhark");
        assert_eq!(config.suites[1].id, "accelerate");
    }

    #[tokio::test]
    async fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("nope.yaml"))).await.is_err());
    }
}
