//! Extract command - receipt fields from OCR text.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, ValueEnum};
use console::style;
use glob::glob;
use serde::Serialize;
use tracing::{debug, warn};

use rcpt_core::receipt::rules::{format_amount, LocaleFormat};
use rcpt_core::{CandidateExtractor, FieldCandidates, OcrResponse, ReceiptExtractor};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// OCR text files, `rcpt recognize` responses, or glob patterns (stdin if omitted)
    inputs: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Locale for amounts without a currency symbol (e.g. de_DE)
    #[arg(short, long)]
    locale: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per input
    Csv,
    /// Plain text summary
    Text,
}

/// Candidates extracted from one input.
#[derive(Serialize)]
struct Extraction {
    source: String,
    #[serde(flatten)]
    candidates: FieldCandidates,
}

pub fn run(args: ExtractArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    let extractor = match args.locale.as_ref().or(config.extraction.default_locale.as_ref()) {
        Some(identifier) => ReceiptExtractor::new().with_locale(LocaleFormat::from_identifier(identifier)),
        None => ReceiptExtractor::new(),
    };
    debug!("Fallback locale {}", extractor.fallback_locale().identifier);

    let extractions = if args.inputs.is_empty() {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        vec![Extraction {
            source: "-".to_string(),
            candidates: extractor.extract_from_text(&ocr_text(&text)),
        }]
    } else {
        expand_inputs(&args.inputs)?
            .into_iter()
            .map(|path| {
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                Ok(Extraction {
                    source: path.display().to_string(),
                    candidates: extractor.extract_from_text(&ocr_text(&content)),
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?
    };

    let output = match args.format {
        OutputFormat::Json => format_json(&extractions)?,
        OutputFormat::Csv => format_csv(&extractions)?,
        OutputFormat::Text => format_text(&extractions),
    };
    print!("{}", output);

    Ok(())
}

/// Expand glob patterns; plain paths pass through.
fn expand_inputs(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        let path = PathBuf::from(input);
        if path.is_file() {
            files.push(path);
            continue;
        }

        let matches: Vec<PathBuf> = glob(input)?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            anyhow::bail!("No matching files found for: {}", input);
        }
        files.extend(matches);
    }
    Ok(files)
}

/// Text of a recognize response, or the input itself.
fn ocr_text(content: &str) -> String {
    match serde_json::from_str::<OcrResponse>(content) {
        Ok(response) => {
            if !response.warnings.is_empty() {
                warn!("Response carries warnings: {:?}", response.warnings);
            }
            response.text
        }
        Err(_) => content.to_string(),
    }
}

fn format_json(extractions: &[Extraction]) -> anyhow::Result<String> {
    let json = match extractions {
        [single] => serde_json::to_string_pretty(single)?,
        many => serde_json::to_string_pretty(many)?,
    };
    Ok(format!("{}\n", json))
}

fn format_csv(extractions: &[Extraction]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "source",
        "merchant_name",
        "purchase_date",
        "total_amount",
        "tax_amount",
        "tip_amount",
        "currency_code",
    ])?;

    for extraction in extractions {
        let c = &extraction.candidates;
        wtr.write_record([
            extraction.source.clone(),
            c.merchant_name.clone().unwrap_or_default(),
            c.purchase_date.map(|d| d.to_string()).unwrap_or_default(),
            c.total_amount.map(|d| d.to_string()).unwrap_or_default(),
            c.tax_amount.map(|d| d.to_string()).unwrap_or_default(),
            c.tip_amount.map(|d| d.to_string()).unwrap_or_default(),
            c.currency_code.clone().unwrap_or_default(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(extractions: &[Extraction]) -> String {
    let mut output = String::new();

    for extraction in extractions {
        let c = &extraction.candidates;
        let locale = c
            .currency_code
            .as_deref()
            .and_then(currency_locale)
            .unwrap_or_default();

        output.push_str(&format!("{}\n", style(&extraction.source).bold()));
        output.push_str(&format!("  Merchant: {}\n", c.merchant_name.as_deref().unwrap_or("-")));
        output.push_str(&format!(
            "  Date:     {}\n",
            c.purchase_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
        ));
        for (label, amount) in [("Total", c.total_amount), ("Tax", c.tax_amount), ("Tip", c.tip_amount)] {
            output.push_str(&format!(
                "  {:<9} {}\n",
                format!("{}:", label),
                amount.map(|a| format_amount(a, &locale)).unwrap_or_else(|| "-".into())
            ));
        }
        if c.is_empty() {
            output.push_str(&format!("  {}\n", style("no fields detected").yellow()));
        }
        output.push('\n');
    }

    output
}

fn currency_locale(code: &str) -> Option<LocaleFormat> {
    rcpt_core::receipt::rules::KNOWN_LOCALES
        .iter()
        .find(|l| l.currency_code == code)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ocr_text_unwraps_response() {
        let body = r#"{"text": "Deli\nTotal $3.00", "warnings": []}"#;
        assert_eq!(ocr_text(body), "Deli\nTotal $3.00");
        assert_eq!(ocr_text("Deli\nTotal $3.00"), "Deli\nTotal $3.00");
    }

    #[test]
    fn test_csv_has_one_row_per_input() {
        let extractions = vec![
            Extraction {
                source: "a.txt".into(),
                candidates: FieldCandidates {
                    merchant_name: Some("Deli".into()),
                    ..Default::default()
                },
            },
            Extraction {
                source: "b.txt".into(),
                candidates: FieldCandidates::default(),
            },
        ];
        let csv = format_csv(&extractions).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "a.txt,Deli,,,,,");
    }
}
