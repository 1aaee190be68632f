//! Batch processing command for multiple recognized-text files.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use rcpt_core::WorkflowResult;

use super::process::{format_csv, format_text, OutputFormat};
use super::{build_options, build_orchestrator, load_config};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Skip category classification
    #[arg(long)]
    no_classify: bool,

    /// Threshold preset (default, strict, lenient)
    #[arg(short, long)]
    preset: Option<String>,

    /// Remote classifier endpoint
    #[arg(long)]
    remote_url: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<String> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "txt" | "text" | "ocr")
        })
        .map(|p| p.display().to_string())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let orchestrator = build_orchestrator(&config, args.remote_url.as_deref());
    let options = build_options(&config, args.preset.as_deref(), args.no_classify)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());
    for path in &files {
        let result = orchestrator.process(path, &options).await;
        if let Some(error) = &result.error_message {
            warn!("failed to process {}: {}", path, error);
        }
        results.push(result);
        pb.inc(1);
    }
    pb.finish_with_message("Complete");

    // Write per-file outputs
    if let Some(output_dir) = &args.output_dir {
        for result in results.iter().filter(|r| r.success) {
            let output_name = PathBuf::from(&result.image_path)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("receipt")
                .to_string();

            let extension = match args.format {
                OutputFormat::Json => "json",
                OutputFormat::Csv => "csv",
                OutputFormat::Text => "txt",
            };

            let output_path = output_dir.join(format!("{}.{}", output_name, extension));
            let content = match args.format {
                OutputFormat::Json => serde_json::to_string_pretty(result)?,
                OutputFormat::Csv => format_csv(result)?,
                OutputFormat::Text => format_text(result),
            };

            fs::write(&output_path, content)?;
            debug!("wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let successful = results.iter().filter(|r| r.success).count();
    let failed = results.len() - successful;
    let review = results.iter().filter(|r| r.success && r.needs_review).count();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful ({} need review), {} failed",
        style(successful).green(),
        style(review).yellow(),
        style(failed).red()
    );

    if failed > 0 {
        println!();
        println!("{}", style("Failed files:").red());
        for result in results.iter().filter(|r| !r.success) {
            println!(
                "  - {}: {}",
                result.image_path,
                result.error_message.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn write_summary(path: &PathBuf, results: &[WorkflowResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "file",
        "status",
        "merchant",
        "total",
        "date",
        "category",
        "method",
        "confidence",
        "needs_review",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let receipt = result.receipt.as_ref();

        if result.success {
            wtr.write_record([
                result.image_path.as_str(),
                "success",
                &receipt
                    .and_then(|r| r.merchant_name.clone())
                    .unwrap_or_default(),
                &receipt
                    .and_then(|r| r.total_amount.map(|a| a.to_string()))
                    .unwrap_or_default(),
                &receipt
                    .and_then(|r| r.date.map(|d| d.to_string()))
                    .unwrap_or_default(),
                &result
                    .classification
                    .as_ref()
                    .map(|c| c.category.to_string())
                    .unwrap_or_default(),
                &result
                    .classification
                    .as_ref()
                    .map(|c| c.method.as_str().to_string())
                    .unwrap_or_default(),
                &format!("{:.2}", result.overall_confidence),
                &result.needs_review.to_string(),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                result.image_path.as_str(),
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error_message.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
