use std::path::{Path, PathBuf};

use avgtime_table::AvgtimeTable;
use clap::{Parser, Subcommand, ValueEnum};
use common::{
    config::{Config, ImageFormat},
    report::Report,
};
use eyre::Result;
use speedup_chart::SpeedupChart;
use tracing::{debug, error};
use tracing_subscriber::{
    EnvFilter,
    fmt::{layer, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

mod list;

#[derive(Parser)]
#[command(version, about = "Render benchmark speedup charts and runtime tables")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// YAML file overriding the built-in suites and settings
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Only process suites whose id matches this regex
    #[arg(short, long)]
    suite: Option<String>,
    #[arg(short, long)]
    log: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the suites and which result files are present
    Ls,
    /// Plot speedup charts, one image per suite
    Plot {
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
        #[arg(short, long)]
        format: Option<Format>,
        /// Also write the plotted values as json
        #[arg(long, default_value_t = false)]
        dump_data: bool,
    },
    /// Write LaTeX fragments with average runtimes
    Table {
        /// Directory the fragments are written to
        outdir: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Svg,
    Png,
}

impl From<Format> for ImageFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Svg => ImageFormat::Svg,
            Format::Png => ImageFormat::Png,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let modules: &[&str] = &["common", "speedup_chart", "avgtime_table"];
    let log_level = std::env::var("RUST_LOG").unwrap_or("warn".to_owned());
    let args = Cli::parse();
    let file_appender = tracing_appender::rolling::never(".", "bench-report.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let mut env_filter = EnvFilter::new(format!("bench_report={log_level}"));

    if !args.log.is_empty() {
        for log in &args.log {
            env_filter = env_filter.add_directive(log.parse()?);
        }
    }

    for module in modules {
        if !args.log.iter().any(|x| x.starts_with(module)) {
            env_filter = env_filter.add_directive(format!("{module}={log_level}").parse()?);
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            layer()
                .with_timer(ChronoLocal::new("%v %k:%M:%S %z".to_owned()))
                .with_writer(std::io::stderr)
                .compact(),
        )
        .with(layer().with_writer(non_blocking).with_ansi(false))
        .init();

    let mut config = Config::load(args.config.as_deref()).await?;
    if let Some(pattern) = &args.suite {
        config.retain_suites(pattern)?;
    }

    match args.command {
        Commands::Ls => list::list_results(&config).await?,
        Commands::Plot {
            out_dir,
            format,
            dump_data,
        } => {
            if let Some(format) = format {
                config.settings.chart.format = format.into();
            }
            config.settings.chart.dump_data |= dump_data;
            run_report(&SpeedupChart, &config, &out_dir).await?
        }
        Commands::Table { outdir } => run_report(&AvgtimeTable, &config, &outdir).await?,
    };

    Ok(())
}

async fn run_report(report: &dyn Report, config: &Config, out_dir: &Path) -> Result<()> {
    debug!("Running {} into {}", report.name(), out_dir.display());
    let summary = match report.render(config, out_dir).await {
        Ok(summary) => summary,
        Err(err) => {
            error!("{err:#?}");
            return Err(err);
        }
    };

    for suite in &summary.suites {
        println!(
            "{}: {} rendered, {} skipped",
            suite.suite,
            suite.rendered.len(),
            suite.skipped.len()
        );
    }
    debug!(
        "{} done, {} programs rendered, {} skipped",
        report.name(),
        summary.rendered_count(),
        summary.skipped_count()
    );
    Ok(())
}
