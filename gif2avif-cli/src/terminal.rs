// ============================================================================
// gif2avif-cli/src/terminal.rs
// ============================================================================
//
// TERMINAL OUTPUT: UI Components and Styling
//
// Sections, status lines and the per-job report printed by the CLI. Log
// records go to stderr through the logger; this module owns stdout.
//
// KEY COMPONENTS:
// - styling: symbols and layout constants
// - print_section, print_status, print_success, print_warning, print_error
// - print_batch_report / print_batch_json for conversion results

// ---- Internal crate imports ----
use crate::error::CliResult;

// ---- External crate imports ----
use console::style;
use gif2avif_core::{
    BatchSummary, ConversionResult, CoreError, FailedJob, calculate_size_reduction, format_bytes,
    format_duration,
};

// ---- Standard library imports ----
use std::time::Duration;

/// Styling constants for terminal output
pub mod styling {
    pub const SUCCESS_SYMBOL: &str = "✓";
    pub const WARNING_SYMBOL: &str = "!";
    pub const ERROR_SYMBOL: &str = "✗";

    pub const SECTION_PREFIX: &str = "===== ";
    pub const SECTION_SUFFIX: &str = " =====";

    pub const STATUS_INDENT: &str = "  ";
    pub const LABEL_WIDTH: usize = 16;
}

// ============================================================================
// UI COMPONENTS
// ============================================================================

pub fn print_section(title: &str) {
    println!();
    println!(
        "{}",
        style(format!(
            "{}{}{}",
            styling::SECTION_PREFIX,
            title.to_uppercase(),
            styling::SECTION_SUFFIX
        ))
        .cyan()
        .bold()
    );
}

/// Formats a label/value line without styling.
pub fn status_line(label: &str, value: &str) -> String {
    let label = format!("{label}:");
    format!(
        "{}{:<width$} {}",
        styling::STATUS_INDENT,
        label,
        value,
        width = styling::LABEL_WIDTH
    )
}

pub fn print_status(label: &str, value: &str) {
    println!("{}", status_line(label, value));
}

pub fn print_success(message: &str) {
    println!("{} {}", style(styling::SUCCESS_SYMBOL).green().bold(), message);
}

pub fn print_warning(message: &str) {
    println!("{} {}", style(styling::WARNING_SYMBOL).yellow().bold(), message);
}

/// Errors go to stderr so `--json` output stays parseable.
pub fn print_error(message: &str) {
    eprintln!(
        "{} {}",
        style(styling::ERROR_SYMBOL).red().bold(),
        style(message).red()
    );
}

// ============================================================================
// CONVERSION REPORTS
// ============================================================================

/// Size change line, e.g. `1.20 MiB -> 300.00 KiB (75% smaller)`.
pub fn size_change(input_size: u64, output_size: u64) -> String {
    let base = format!("{} -> {}", format_bytes(input_size), format_bytes(output_size));
    if output_size <= input_size {
        format!(
            "{base} ({}% smaller)",
            calculate_size_reduction(input_size, output_size)
        )
    } else {
        format!("{base} (larger than source)")
    }
}

fn print_job_result(result: &ConversionResult) {
    print_success(&result.output.display().to_string());
    print_status("Source", &result.source.display().to_string());
    let frames = if result.duplicated {
        format!("{} (single frame duplicated)", result.frame_count)
    } else {
        result.frame_count.to_string()
    };
    print_status("Frames", &frames);
    print_status(
        "Frame rate",
        &format!(
            "{:.2} fps ({}, {} ms per frame)",
            result.frame_rate.as_f64(),
            result.frame_rate,
            result.frame_duration.units()
        ),
    );
    print_status("Size", &size_change(result.input_size, result.output_size));
    print_status("Time", &format_duration(result.elapsed));
}

fn print_failed_job(job: &FailedJob) {
    print_error(&format!("{}: {}", job.source.display(), job.error));
}

/// Prints every job outcome followed by batch totals.
pub fn print_batch_report(summary: &BatchSummary, total_elapsed: Duration) {
    print_section("Results");
    for result in &summary.succeeded {
        print_job_result(result);
    }
    for job in &summary.failed {
        print_failed_job(job);
    }

    print_section("Summary");
    print_status(
        "Converted",
        &format!("{} of {}", summary.succeeded.len(), summary.total()),
    );
    if summary.has_failures() {
        print_status("Failed", &summary.failed.len().to_string());
    }
    if !summary.succeeded.is_empty() {
        print_status(
            "Total size",
            &size_change(summary.total_input_size(), summary.total_output_size()),
        );
    }
    print_status("Total time", &format_duration(total_elapsed));
}

/// Prints the summary as pretty JSON on stdout.
pub fn print_batch_json(summary: &BatchSummary) -> CliResult<()> {
    let json = serde_json::to_string_pretty(summary)
        .map_err(|e| CoreError::OperationFailed(format!("Failed to serialize summary: {e}")))?;
    println!("{json}");
    Ok(())
}
