//! Process command - run the pipeline over a single recognized-text file.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use rcpt_core::{WorkflowResult, WorkflowStage};

use super::{build_options, build_orchestrator, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file with recognized receipt text
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Skip category classification
    #[arg(long)]
    no_classify: bool,

    /// Threshold preset (default, strict, lenient)
    #[arg(short, long)]
    preset: Option<String>,

    /// Remote classifier endpoint
    #[arg(long)]
    remote_url: Option<String>,

    /// Show confidence breakdown
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let orchestrator = build_orchestrator(&config, args.remote_url.as_deref());
    let options = build_options(&config, args.preset.as_deref(), args.no_classify)?;

    let progress = |stage: WorkflowStage| {
        info!("stage: {}", stage);
    };

    let input = args.input.display().to_string();
    let result = orchestrator
        .process_with_progress(&input, &options, Some(&progress))
        .await;

    if !result.success {
        anyhow::bail!(
            "Processing failed: {}",
            result.error_message.as_deref().unwrap_or("unknown error")
        );
    }

    let output = format_result(&result, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        print_confidence(&result);
    }

    Ok(())
}

fn print_confidence(result: &WorkflowResult) {
    println!();
    println!(
        "{} Overall confidence: {:.1}%",
        style("ℹ").blue(),
        result.overall_confidence * 100.0
    );
    if let Some(receipt) = &result.receipt {
        let mut fields: Vec<_> = receipt.metadata.field_confidence.iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));
        for (field, confidence) in fields {
            println!("   {:<16} {:.1}%", field, confidence * 100.0);
        }
    }
    if result.needs_review {
        println!("{} Result needs review", style("!").yellow());
    }
    println!(
        "{} Processing time: {}ms",
        style("ℹ").blue(),
        result.processing_time_ms
    );
}

pub fn format_result(result: &WorkflowResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

pub fn format_csv(result: &WorkflowResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "image_path",
        "merchant",
        "total",
        "subtotal",
        "tax",
        "date",
        "currency",
        "category",
        "confidence",
        "needs_review",
    ])?;

    let receipt = result.receipt.as_ref();
    wtr.write_record([
        result.image_path.as_str(),
        &receipt
            .and_then(|r| r.merchant_name.clone())
            .unwrap_or_default(),
        &receipt
            .and_then(|r| r.total_amount.map(|a| a.to_string()))
            .unwrap_or_default(),
        &receipt
            .and_then(|r| r.subtotal.map(|a| a.to_string()))
            .unwrap_or_default(),
        &receipt
            .and_then(|r| r.tax.map(|a| a.to_string()))
            .unwrap_or_default(),
        &receipt
            .and_then(|r| r.date.map(|d| d.to_string()))
            .unwrap_or_default(),
        &receipt.and_then(|r| r.currency.clone()).unwrap_or_default(),
        &result
            .classification
            .as_ref()
            .map(|c| c.category.to_string())
            .unwrap_or_default(),
        &format!("{:.2}", result.overall_confidence),
        &result.needs_review.to_string(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

pub fn format_text(result: &WorkflowResult) -> String {
    let mut output = String::new();

    if let Some(receipt) = &result.receipt {
        if let Some(merchant) = &receipt.merchant_name {
            output.push_str(&format!("Merchant: {}\n", merchant));
        }
        if let Some(date) = receipt.date {
            output.push_str(&format!("Date: {}\n", date));
        }
        if let Some(time) = receipt.time {
            output.push_str(&format!("Time: {}\n", time));
        }

        if !receipt.items.is_empty() {
            output.push_str("\nItems:\n");
            for item in &receipt.items {
                let price = item
                    .line_total()
                    .map(|p| p.to_string())
                    .unwrap_or_default();
                if item.quantity > 1 {
                    output.push_str(&format!("  {} x{}  {}\n", item.name, item.quantity, price));
                } else {
                    output.push_str(&format!("  {}  {}\n", item.name, price));
                }
            }
        }

        output.push_str("\nSummary:\n");
        let currency = receipt.currency.clone().unwrap_or_default();
        if let Some(subtotal) = receipt.subtotal {
            output.push_str(&format!("  Subtotal: {} {}\n", subtotal, currency));
        }
        if let Some(tax) = receipt.tax {
            output.push_str(&format!("  Tax:      {} {}\n", tax, currency));
        }
        if let Some(total) = receipt.total_amount {
            output.push_str(&format!("  Total:    {} {}\n", total, currency));
        }
        if let Some(payment) = &receipt.payment_method {
            output.push_str(&format!("  Paid by:  {}\n", payment.display()));
        }
    }

    if let Some(classification) = &result.classification {
        output.push_str(&format!(
            "\nCategory: {} ({:.0}% via {})\n",
            classification.category,
            classification.confidence * 100.0,
            match classification.method {
                rcpt_core::ClassificationMethod::RuleBased => "rules",
                rcpt_core::ClassificationMethod::RemoteModel => "remote model",
                rcpt_core::ClassificationMethod::Hybrid => "hybrid consensus",
            }
        ));
    }

    output
}
