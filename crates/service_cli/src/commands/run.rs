//! Run command implementation
//!
//! Simulates the configured process with the parallel runner and writes the
//! comparison report as a table, JSON or CSV.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use process_kernel::Realization;
use process_runner::{ComparisonRow, ParallelRunner, PhaseTimings, SimulationRun};
use serde::Serialize;
use tracing::info;

use crate::config::{OutputFormat, RunConfig};
use crate::Result;

/// Run the simulation command
pub fn run(config: &RunConfig, output: Option<&Path>) -> Result<()> {
    let model = config.model.build()?;
    let simulation = config.simulation_config()?;

    info!(
        len = model.len(),
        step = model.grid().step(),
        kernel = model.kernel().name(),
        "Process model loaded"
    );

    let result = ParallelRunner::new(simulation).run(&model, model.len())?;

    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            render(&result, config.format, &mut writer)?;
            writer.flush()?;
            info!(path = %path.display(), "Report written");
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            render(&result, config.format, &mut writer)?;
            writer.flush()?;
        }
    }

    Ok(())
}

/// Write a run in the requested format
pub fn render<W: Write>(result: &SimulationRun, format: OutputFormat, out: &mut W) -> Result<()> {
    match format {
        OutputFormat::Table => write_table(result, out),
        OutputFormat::Json => write_json(result, out),
        OutputFormat::Csv => write_csv(result, out),
    }
}

// ============================================================================
// Table
// ============================================================================

const CELL: usize = 14;

fn write_table<W: Write>(result: &SimulationRun, out: &mut W) -> Result<()> {
    let status = if result.timed_out {
        " (timed out)"
    } else if result.cancelled {
        " (cancelled)"
    } else {
        ""
    };
    writeln!(
        out,
        "Realizations: {}/{}{}  seed: {}",
        result.completed(),
        result.requested,
        status,
        result.base_seed
    )?;
    if let Some(clamped) = result.clamped_variances.filter(|&c| c > 0) {
        writeln!(out, "Clamped conditional variances: {}", clamped)?;
    }
    write_timings(&result.timings, out)?;

    let times = &result.report.times;
    writeln!(out, "\nMean m(t)")?;
    write_comparison(times, &result.report.mean, out)?;

    for (i, row) in result.report.correlation_rows.iter().enumerate() {
        writeln!(out, "\nCorrelation K(t{}, t')", i)?;
        write_comparison(times, row, out)?;
    }

    let shown = result.displayed();
    if !shown.is_empty() {
        writeln!(out, "\nRealizations (first {})", shown.len())?;
        write_realizations(times, shown, out)?;
    }
    Ok(())
}

fn write_timings<W: Write>(timings: &PhaseTimings, out: &mut W) -> Result<()> {
    writeln!(
        out,
        "Timings: generate {:?}, aggregate {:?}, report {:?}",
        timings.generate, timings.aggregate, timings.report
    )?;
    Ok(())
}

fn rule<W: Write>(out: &mut W, columns: usize, (left, mid, right): (char, char, char)) -> Result<()> {
    let cell = "─".repeat(CELL);
    let inner: Vec<&str> = (0..columns).map(|_| cell.as_str()).collect();
    let separator = mid.to_string();
    writeln!(out, "{}{}{}", left, inner.join(separator.as_str()), right)?;
    Ok(())
}

fn cells<W: Write>(out: &mut W, values: &[String]) -> Result<()> {
    let row: Vec<String> = values.iter().map(|v| format!(" {:<w$}", v, w = CELL - 1)).collect();
    writeln!(out, "│{}│", row.join("│"))?;
    Ok(())
}

fn write_comparison<W: Write>(times: &[f64], rows: &[ComparisonRow], out: &mut W) -> Result<()> {
    rule(out, 4, ('┌', '┬', '┐'))?;
    cells(
        out,
        &["t", "theoretical", "empirical", "delta"].map(String::from),
    )?;
    rule(out, 4, ('├', '┼', '┤'))?;
    for (t, row) in times.iter().zip(rows) {
        cells(
            out,
            &[
                format!("{:.4}", t),
                format!("{:.6}", row.theoretical),
                format!("{:.6}", row.empirical),
                format!("{:+.6}", row.delta),
            ],
        )?;
    }
    rule(out, 4, ('└', '┴', '┘'))?;
    Ok(())
}

fn write_realizations<W: Write>(times: &[f64], shown: &[Realization], out: &mut W) -> Result<()> {
    let columns = shown.len() + 1;
    let mut header = vec!["t".to_string()];
    header.extend((1..=shown.len()).map(|k| format!("x{}(t)", k)));

    rule(out, columns, ('┌', '┬', '┐'))?;
    cells(out, &header)?;
    rule(out, columns, ('├', '┼', '┤'))?;
    for (i, t) in times.iter().enumerate() {
        let mut row = vec![format!("{:.4}", t)];
        row.extend(shown.iter().map(|x| format!("{:.6}", x[i])));
        cells(out, &row)?;
    }
    rule(out, columns, ('└', '┴', '┘'))?;
    Ok(())
}

// ============================================================================
// JSON
// ============================================================================

#[derive(Serialize)]
struct JsonReport<'a> {
    requested: usize,
    completed: usize,
    cancelled: bool,
    timed_out: bool,
    base_seed: u64,
    clamped_variances: Option<usize>,
    timings: &'a PhaseTimings,
    report: &'a process_runner::ComparisonReport,
    realizations: &'a [Realization],
}

fn write_json<W: Write>(result: &SimulationRun, out: &mut W) -> Result<()> {
    let doc = JsonReport {
        requested: result.requested,
        completed: result.completed(),
        cancelled: result.cancelled,
        timed_out: result.timed_out,
        base_seed: result.base_seed,
        clamped_variances: result.clamped_variances,
        timings: &result.timings,
        report: &result.report,
        realizations: result.displayed(),
    };
    serde_json::to_writer_pretty(&mut *out, &doc)?;
    writeln!(out)?;
    Ok(())
}

// ============================================================================
// CSV
// ============================================================================

#[derive(Serialize)]
struct CsvRecord {
    statistic: &'static str,
    row: Option<usize>,
    index: usize,
    time: f64,
    theoretical: f64,
    empirical: f64,
    delta: f64,
}

impl CsvRecord {
    fn new(statistic: &'static str, row: Option<usize>, index: usize, time: f64, cmp: &ComparisonRow) -> Self {
        Self {
            statistic,
            row,
            index,
            time,
            theoretical: cmp.theoretical,
            empirical: cmp.empirical,
            delta: cmp.delta,
        }
    }
}

/// One record per comparison: the mean rows first, then each correlation row.
fn write_csv<W: Write>(result: &SimulationRun, out: &mut W) -> Result<()> {
    let times = &result.report.times;
    let mut writer = csv::Writer::from_writer(out);

    for (index, (cmp, &time)) in result.report.mean.iter().zip(times).enumerate() {
        writer.serialize(CsvRecord::new("mean", None, index, time, cmp))?;
    }
    for (row, comparisons) in result.report.correlation_rows.iter().enumerate() {
        for (index, (cmp, &time)) in comparisons.iter().zip(times).enumerate() {
            writer.serialize(CsvRecord::new("correlation", Some(row), index, time, cmp))?;
        }
    }

    writer.flush()?;
    Ok(())
}
