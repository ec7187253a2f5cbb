use std::path::{Path, PathBuf};

use common::{
    catalog::{Program, Suite},
    config::{Config, Settings},
    report::{Report, ReportSummary, SuiteSummary, ensure_dirs},
    results::{ResultFileError, avgtime_path, read_measurement},
};
use eyre::{Context, Result};
use tokio::fs::write;
use tracing::{debug, error, warn};

/// LaTeX fragments holding the average runtimes of every program, four per program.
#[derive(Debug, Default, Clone)]
pub struct AvgtimeTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Reference,
    Measured,
    AuxReference,
    AuxMeasured,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Reference,
        Role::Measured,
        Role::AuxReference,
        Role::AuxMeasured,
    ];

    /// Suffix of the fragment file, `measured` being the measured implementation tag
    pub fn suffix(&self, measured: &str) -> String {
        match self {
            Role::Reference => "ref".to_owned(),
            Role::Measured => measured.to_owned(),
            Role::AuxReference => "auxref".to_owned(),
            Role::AuxMeasured => format!("aux{measured}"),
        }
    }
}

/// Formatted cells for one program, in [`Role::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub stem: String,
    pub reference: String,
    pub measured: String,
    pub aux_reference: String,
    pub aux_measured: String,
}

impl TableRow {
    pub fn cell(&self, role: Role) -> &str {
        match role {
            Role::Reference => &self.reference,
            Role::Measured => &self.measured,
            Role::AuxReference => &self.aux_reference,
            Role::AuxMeasured => &self.aux_measured,
        }
    }
}

async fn read_formatted(path: &Path, precision: usize) -> Result<String, ResultFileError> {
    let value = read_measurement(path).await?;
    Ok(format!("{value:.precision$}"))
}

/// Builds the row for `program`. Fails only when one of the primary
/// reference or measured files cannot be read, missing auxiliary values
/// become the placeholder.
pub async fn table_row(
    suite: &Suite,
    program: &Program,
    settings: &Settings,
) -> Result<TableRow, ResultFileError> {
    let precision = settings.table.precision;
    let reference_tag = suite.reference();
    let measured_tag = settings.measured.as_str();

    let reference = read_formatted(
        &avgtime_path(&settings.runtimes_dir, &program.stem, reference_tag),
        precision,
    )
    .await?;
    let measured = read_formatted(
        &avgtime_path(&settings.runtimes_dir, &program.stem, measured_tag),
        precision,
    )
    .await?;

    let aux = |tag: &str| avgtime_path(&settings.aux_runtimes_dir, &program.stem, tag);
    let placeholder = |err: ResultFileError| {
        debug!("Using placeholder for {}: {err}", program.name);
        settings.table.placeholder.clone()
    };
    let aux_measured = read_formatted(&aux(measured_tag), precision)
        .await
        .unwrap_or_else(placeholder);
    let aux_reference = read_formatted(&aux(reference_tag), precision)
        .await
        .unwrap_or_else(placeholder);

    Ok(TableRow {
        stem: program.stem.clone(),
        reference,
        measured,
        aux_reference,
        aux_measured,
    })
}

pub fn fragment_path(out_dir: &Path, stem: &str, role: Role, measured: &str) -> PathBuf {
    out_dir.join(format!("{stem}-{}.tex", role.suffix(measured)))
}

/// Writes the four fragments of `row`, each holding just the formatted number.
pub async fn write_fragments(out_dir: &Path, row: &TableRow, measured: &str) -> Result<()> {
    for role in Role::ALL {
        let path = fragment_path(out_dir, &row.stem, role, measured);
        write(&path, row.cell(role))
            .await
            .context(format!("Write {}", path.display()))?;
    }
    Ok(())
}

#[async_trait::async_trait]
impl Report for AvgtimeTable {
    fn name(&self) -> &'static str {
        "avgtime-table"
    }

    async fn render(&self, config: &Config, out_dir: &Path) -> Result<ReportSummary> {
        ensure_dirs(&[out_dir.to_path_buf()]).await?;

        let mut summary = ReportSummary::default();
        for suite in &config.suites {
            let mut suite_summary = SuiteSummary::new(&suite.id);
            for program in &suite.programs {
                match table_row(suite, program, &config.settings).await {
                    Ok(row) => match write_fragments(out_dir, &row, &config.settings.measured)
                        .await
                    {
                        Ok(()) => suite_summary.rendered.push(program.name.clone()),
                        Err(err) => {
                            error!("{err:#}");
                            warn!("Skipping {} as its fragments could not be written.", program.name);
                            suite_summary.skipped.push(program.name.clone());
                        }
                    },
                    Err(err) => {
                        error!("{err}");
                        warn!("Skipping {} as the file could not be opened.", program.name);
                        suite_summary.skipped.push(program.name.clone());
                    }
                }
            }
            summary.suites.push(suite_summary);
        }
        Ok(summary)
    }
}
