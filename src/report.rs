//! Herd report rendering: a markdown summary and JSONL monthly records.

use ganadero_core::herd::HerdReport;
use ganadero_core::nutrition::{assess_stocking, StockingLevel};
use std::fmt;
use std::io::Write;

/// Markdown summary of a herd run.
pub fn render_markdown(
    report: &HerdReport,
    title: &str,
    hectares: Option<f64>,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_markdown(&mut out, report, title, hectares)?;
    Ok(out)
}

/// Writes the markdown summary into any [`fmt::Write`] sink.
pub fn write_markdown<W: fmt::Write>(
    out: &mut W,
    report: &HerdReport,
    title: &str,
    hectares: Option<f64>,
) -> fmt::Result {
    let title = if title.is_empty() { "Herd" } else { title };
    writeln!(out, "# {title} Report\n")?;
    writeln!(out, "## Summary")?;
    writeln!(out, "- **As of**: {}", report.as_of)?;
    writeln!(out, "- **Animals evaluated**: {}", report.evaluations.len())?;
    writeln!(out, "- **Animals skipped**: {}", report.skipped.len())?;
    writeln!(out, "- **New monthly records**: {}", report.total_records())?;
    writeln!(out, "- **Livestock units**: {:.2} UGM", report.livestock_units)?;
    if let Some(hectares) = hectares {
        let stocking = assess_stocking(report.livestock_units, hectares);
        let level = match stocking.level {
            StockingLevel::Sustainable => "sustainable",
            StockingLevel::Elevated => "elevated",
            StockingLevel::Critical => "critical",
        };
        writeln!(
            out,
            "- **Stocking**: {:.2} UGM/ha over {hectares} ha ({level})",
            stocking.density
        )?;
    }
    let fingerprint = &report.config_fingerprint;
    writeln!(out, "- **Parameters**: `{}`\n", &fingerprint[..12.min(fingerprint.len())])?;

    writeln!(out, "## Animals\n")?;
    writeln!(
        out,
        "| Animal | Breed | Stage | Weight (kg) | RC % | SEUROP | Marbling | BMS | Alerts |"
    )?;
    writeln!(out, "|---|---|---|---:|---:|---|---:|---:|---:|")?;
    for eval in &report.evaluations {
        let (rc, class, marbling, bms) = match eval.records.last() {
            Some(r) => (
                format!("{:.1}", r.carcass.rc_pct),
                r.carcass.conformation.to_string(),
                format!("{:.2}", r.quality.marbling),
                format!("{:.1}", r.quality.bms),
            ),
            None => ("-".into(), "-".into(), "-".into(), "-".into()),
        };
        writeln!(
            out,
            "| {} | {} | {} | {:.1} | {rc} | {class} | {marbling} | {bms} | {} |",
            eval.animal_id,
            eval.breed_id,
            eval.stage,
            eval.final_weight,
            eval.alerts.len()
        )?;
    }

    if !report.alert_counts().is_empty() {
        writeln!(out, "\n## Ration Alerts\n")?;
        for eval in &report.evaluations {
            for alert in &eval.alerts {
                writeln!(
                    out,
                    "- **{}** {:?} `{}`: {}",
                    eval.animal_id, alert.level, alert.code, alert.message
                )?;
            }
        }
    }

    if !report.skipped.is_empty() {
        writeln!(out, "\n## Skipped\n")?;
        for skipped in &report.skipped {
            writeln!(out, "- **{}**: {}", skipped.animal_id, skipped.reason)?;
        }
    }
    Ok(())
}

/// Writes one JSON object per monthly record. Returns the number written.
pub fn write_records_jsonl<W: Write>(report: &HerdReport, mut writer: W) -> anyhow::Result<usize> {
    let mut count = 0;
    for record in report.records() {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}
