use crate::analysis::AnalysisReport;
use crate::sync::{BatchOutcome, BatchReport, SyncReport};

/// One-paragraph summary of a single completed sync.
pub fn format_sync_report(report: &SyncReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Synced {} - {}\n", report.series_id, report.title));
    out.push_str(&format!(
        "Table: {} (value column {})\n",
        report.table.name, report.table.value_column
    ));
    out.push_str(&format!("Rows: {}{}\n", report.rows_inserted, fmt_span(report)));
    out
}

/// Per-entry status table followed by totals.
pub fn format_batch_report(report: &BatchReport) -> String {
    let mut out = String::new();
    out.push_str("=== fred-db - Batch Sync ===\n");

    out.push_str(format!("{:<16} {:<18} {:<6} {:>8} {}\n", "name", "series", "status", "rows", "table").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<16} {:-<18} {:-<6} {:-<8} {:-<5}\n", "", "", "", "", "").trim_end());
    out.push('\n');

    for (name, outcome) in &report.outcomes {
        let line = match outcome {
            BatchOutcome::Synced(s) => format!(
                "{:<16} {:<18} {:<6} {:>8} {}",
                truncate(name, 16),
                truncate(s.series_id.as_str(), 18),
                "ok",
                s.rows_inserted,
                s.table.name
            ),
            BatchOutcome::Failed(f) => format!(
                "{:<16} {:<18} {:<6} {:>8} {}",
                truncate(name, 16),
                truncate(f.series_id.as_str(), 18),
                "FAILED",
                "-",
                f.reached.display_name()
            ),
        };
        out.push_str(line.trim_end());
        out.push('\n');
    }

    let failures: Vec<_> = report
        .outcomes
        .iter()
        .filter_map(|(name, o)| match o {
            BatchOutcome::Failed(f) => Some((name, f)),
            BatchOutcome::Synced(_) => None,
        })
        .collect();
    if !failures.is_empty() {
        out.push_str("\nFailures:\n");
        for (name, f) in failures {
            out.push_str(&format!("- {name}: {}\n", f.error));
        }
    }

    out.push_str(&format!(
        "\n{} synced, {} failed\n",
        report.succeeded(),
        report.failed()
    ));
    out
}

/// Analysis summary: cleaning counts, ADF, kurtosis and season counts.
pub fn format_analysis_report(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let meta = &report.metadata;

    out.push_str("=== fred-db - Series Analysis ===\n");
    out.push_str(&format!("Series: {} - {}\n", meta.id, meta.title));
    if let Some(freq) = &meta.frequency {
        out.push_str(&format!("Frequency: {freq}\n"));
    }
    if let Some(units) = &meta.units {
        out.push_str(&format!("Units: {units}\n"));
    }
    out.push_str(&format!(
        "Observations: read={} | dropped non-finite={} | dropped irregular={} | differenced={}\n",
        report.observations_read,
        report.dropped_non_finite,
        report.dropped_irregular,
        report.differenced.len()
    ));

    let adf = &report.adf;
    out.push_str("\nAugmented Dickey-Fuller (constant, AIC lag):\n");
    out.push_str(&format!("- statistic: {:.4}\n", adf.statistic));
    out.push_str(&format!("- p-value  : {:.4}\n", adf.p_value));
    out.push_str(&format!("- lags     : {} (nobs={})\n", adf.used_lag, adf.nobs));
    out.push_str(&format!(
        "- critical : 1%={:.3} 5%={:.3} 10%={:.3}\n",
        adf.critical_values.one_pct, adf.critical_values.five_pct, adf.critical_values.ten_pct
    ));
    out.push_str(&format!(
        "- verdict  : {}\n",
        if adf.reject_null {
            "stationary (unit root rejected at 5%)"
        } else {
            "unit root not rejected at 5%"
        }
    ));

    let k = &report.kurtosis;
    out.push_str("\nKurtosis:\n");
    out.push_str(&format!("- excess    : {:.4}\n", k.excess_kurtosis));
    match report.kurtosis_observation() {
        Some(obs) => out.push_str(&format!(
            "- max share : {:.2}% at {} ({}, value {:.4})\n",
            k.max_share_pct,
            obs.date,
            obs.season.display_name(),
            obs.value
        )),
        None => out.push_str(&format!("- max share : {:.2}%\n", k.max_share_pct)),
    }

    out.push_str("\nSeasons:\n");
    for (season, count) in &report.season_counts {
        out.push_str(&format!("- {:<7} {count}\n", season.display_name()));
    }

    out
}

fn fmt_span(report: &SyncReport) -> String {
    match (report.first_date, report.last_date) {
        (Some(first), Some(last)) => format!(" | {first} .. {last}"),
        _ => String::new(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
