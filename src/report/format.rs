//! Formatted terminal output.
//!
//! Formatting lives here so the statistics code stays free of presentation
//! concerns and output changes are localized.

use crate::aggregate::{AggregatedDailyMetric, DailyTable};
use crate::app::pipeline::{DailyAnalysis, IngestSummary};
use crate::io::inspect::DatasetProfile;
use crate::stats::{AnovaEntry, CorrelationMatrix, CountryStatistics};

/// Rows shown from each end of the merged daily table.
const PREVIEW_ROWS: usize = 5;

/// Header plus per-country load/clean accounting.
pub fn format_ingest_summary(ingest: &[IngestSummary]) -> String {
    let mut out = String::new();
    out.push_str("=== trends - YouTube trending statistics ===\n");
    out.push_str(&format!("Datasets: {}\n\n", ingest.len()));

    push_line(
        &mut out,
        format!(
            "{:<8} {:>10} {:>10} {:>10} {:>10} {:>12}",
            "country", "read", "skipped", "dropped", "kept", "zero_views"
        ),
    );
    push_line(&mut out, format!("{:-<8} {:-<10} {:-<10} {:-<10} {:-<10} {:-<12}", "", "", "", "", "", ""));
    for s in ingest {
        push_line(
            &mut out,
            format!(
                "{:<8} {:>10} {:>10} {:>10} {:>10} {:>12}",
                s.country.as_str(),
                s.rows_read,
                s.parse_errors,
                s.dropped,
                s.kept,
                s.undefined_rates
            ),
        );
    }
    out
}

/// Descriptive statistics, one table per country.
pub fn format_descriptive(stats: &[CountryStatistics]) -> String {
    let mut out = String::new();
    for country in stats {
        out.push_str(&format!(
            "Descriptive statistics: {} ({}) | rows={}\n",
            country.country.display_name(),
            country.country,
            country.rows
        ));
        push_line(
            &mut out,
            format!(
                "{:<26} {:>8} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14}",
                "metric", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
            ),
        );
        for m in &country.metrics {
            let line = match &m.summary {
                Some(s) => format!(
                    "{:<26} {:>8} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14}",
                    m.metric.column_name(),
                    s.count,
                    fmt_num(s.mean),
                    s.std.map(fmt_num).unwrap_or_else(|| "NaN".to_string()),
                    fmt_num(s.min),
                    fmt_num(s.q25),
                    fmt_num(s.median),
                    fmt_num(s.q75),
                    fmt_num(s.max),
                ),
                None => format!("{:<26} {:>8}", m.metric.column_name(), 0),
            };
            push_line(&mut out, line);
            if m.undefined > 0 {
                push_line(&mut out, format!("  ({} undefined values excluded)", m.undefined));
            }
        }
        out.push('\n');
    }
    out
}

/// Merged table preview, correlations, ANOVA and trend fits of one analysis.
pub fn format_daily_analysis(analysis: &DailyAnalysis) -> String {
    let mut out = String::new();
    let table = &analysis.table;

    out.push_str(&format!(
        "=== {} ({:?}) ===\n",
        analysis.title, table.reducer
    ));
    out.push_str(&format!(
        "Rows: {} | countries={} | dates={}\n\n",
        table.len(),
        table.countries.len(),
        table.dates.len()
    ));
    out.push_str(&format_table_preview(table));

    out.push_str("\nCorrelation:\n");
    for m in &analysis.statistics.correlations {
        out.push_str(&format_correlation(m));
    }

    out.push_str("\nANOVA:\n");
    out.push_str(&format_anova(&analysis.statistics.anova));

    out.push_str("\nTrend fits (coefficients, highest power first):\n");
    for t in &analysis.trends.fits {
        push_line(
            &mut out,
            format!(
                "{:<4} {:<26} deg={:<3} n={:<5} RMSE={} coef={}",
                t.country.as_str(),
                t.metric.column_name(),
                t.fit.degree,
                t.fit.n,
                fmt_num(t.fit.rmse),
                fmt_vec(&t.fit.coefficients)
            ),
        );
    }
    for s in &analysis.trends.skipped {
        push_line(
            &mut out,
            format!(
                "  (skipped {} {} deg={}) {}",
                s.country, s.metric, s.degree, s.reason
            ),
        );
    }

    out
}

/// Column report for `trends inspect`.
pub fn format_profiles(profiles: &[DatasetProfile]) -> String {
    let mut out = String::new();
    for p in profiles {
        out.push_str(&format!(
            "{} ({}): rows={} malformed={}\n",
            p.country.display_name(),
            p.country,
            p.rows,
            p.malformed_rows
        ));
        push_line(&mut out, format!("{:<28} {:<9} {:<6} {:>8}", "column", "required", "empty", "count"));
        for c in &p.columns {
            push_line(
                &mut out,
                format!(
                    "{:<28} {:<9} {:<6} {:>8}",
                    truncate(&c.name, 28),
                    if c.required { "yes" } else { "" },
                    c.has_empty(),
                    c.empty
                ),
            );
        }
        out.push('\n');
    }
    out
}

fn format_table_preview(table: &DailyTable) -> String {
    let mut out = String::new();

    let mut header = format!("{:<8} {:<10} {:>11} {:>17}", "country", "date", "country_cat", "trending_date_cat");
    for m in &table.metrics {
        header.push_str(&format!(" {:>24}", m.column_name()));
    }
    push_line(&mut out, header);

    let n = table.rows.len();
    if n <= PREVIEW_ROWS * 2 {
        for row in &table.rows {
            push_line(&mut out, format_row(row));
        }
    } else {
        for row in &table.rows[..PREVIEW_ROWS] {
            push_line(&mut out, format_row(row));
        }
        push_line(&mut out, format!("... ({} rows omitted)", n - PREVIEW_ROWS * 2));
        for row in &table.rows[n - PREVIEW_ROWS..] {
            push_line(&mut out, format_row(row));
        }
    }
    out
}

fn format_row(row: &AggregatedDailyMetric) -> String {
    let mut line = format!(
        "{:<8} {:<10} {:>11} {:>17}",
        row.country.as_str(),
        row.date,
        row.country_code,
        row.date_code
    );
    for v in &row.values {
        line.push_str(&format!(" {:>24}", v.map(fmt_num).unwrap_or_else(|| "NaN".to_string())));
    }
    line
}

fn format_correlation(m: &CorrelationMatrix) -> String {
    let mut out = String::new();
    let width = m.labels.iter().map(|l| l.len()).max().unwrap_or(0).max(8);
    push_line(
        &mut out,
        format!("{:<width$} {:>width$} {:>width$}   (n={})", "", m.labels[0], m.labels[1], m.n),
    );
    for (label, row) in m.labels.iter().zip(m.values.iter()) {
        push_line(
            &mut out,
            format!("{:<width$} {:>width$} {:>width$}", label, fmt_num(row[0]), fmt_num(row[1])),
        );
    }
    out
}

fn format_anova(entries: &[AnovaEntry]) -> String {
    let mut out = String::new();
    for e in entries {
        let line = match &e.result {
            Some(r) => format!(
                "{:<60} groups={:<4} F={} p={} df=({}, {})",
                e.label,
                e.groups,
                fmt_num(r.f_statistic),
                fmt_num(r.p_value),
                r.df_between,
                r.df_within
            ),
            None => format!("{:<60} groups={:<4} (skipped: not enough data)", e.label, e.groups),
        };
        push_line(&mut out, line);
    }
    out
}

/// Large values with one decimal, small ones with six; non-finite spelled out.
pub fn fmt_num(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "inf".to_string() } else { "-inf".to_string() }
    } else if v.abs() >= 1000.0 {
        format!("{v:.1}")
    } else {
        format!("{v:.6}")
    }
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6e}")).collect();
    format!("[{}]", parts.join(", "))
}

fn push_line(out: &mut String, line: String) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CountryCode;
    use crate::io::inspect::ColumnProfile;
    use crate::stats::AnovaResult;

    #[test]
    fn fmt_num_switches_precision_and_spells_non_finite() {
        assert_eq!(fmt_num(1234.56), "1234.6");
        assert_eq!(fmt_num(0.15), "0.150000");
        assert_eq!(fmt_num(f64::NAN), "NaN");
        assert_eq!(fmt_num(f64::INFINITY), "inf");
        assert_eq!(fmt_num(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn correlation_block_lists_both_labels() {
        let m = CorrelationMatrix {
            labels: ["country_cat".to_string(), "views".to_string()],
            values: [[1.0, -0.5], [-0.5, 1.0]],
            n: 6,
        };
        let text = format_correlation(&m);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("(n=6)"));
        assert!(lines[1].starts_with("country_cat"));
        assert!(lines[1].contains("-0.500000"));
        assert!(lines[2].starts_with("views"));
    }

    #[test]
    fn anova_lines_show_f_and_p_or_skip() {
        let entries = vec![
            AnovaEntry {
                label: "views by country".to_string(),
                groups: 2,
                result: Some(AnovaResult {
                    f_statistic: 12.5,
                    p_value: 0.024,
                    df_between: 1,
                    df_within: 4,
                }),
            },
            AnovaEntry {
                label: "views by trending_date".to_string(),
                groups: 3,
                result: None,
            },
        ];
        let text = format_anova(&entries);
        assert!(text.contains("F=12.500000 p=0.024000 df=(1, 4)"));
        assert!(text.contains("(skipped: not enough data)"));
    }

    #[test]
    fn profiles_mark_required_and_empty_columns() {
        let profiles = vec![DatasetProfile {
            country: CountryCode::Fr,
            rows: 3,
            malformed_rows: 0,
            columns: vec![
                ColumnProfile { name: "video_id".to_string(), required: true, empty: 0 },
                ColumnProfile { name: "description".to_string(), required: false, empty: 2 },
            ],
        }];
        let text = format_profiles(&profiles);
        assert!(text.starts_with("France (FR): rows=3 malformed=0\n"));
        let desc = text.lines().find(|l| l.starts_with("description")).unwrap();
        assert!(desc.contains("true"));
        assert!(desc.ends_with('2'));
    }

    #[test]
    fn ingest_summary_has_one_row_per_country() {
        let ingest = vec![IngestSummary {
            country: CountryCode::Us,
            rows_read: 10,
            parse_errors: 1,
            dropped: 2,
            kept: 7,
            undefined_rates: 0,
        }];
        let text = format_ingest_summary(&ingest);
        let row = text.lines().last().unwrap();
        assert!(row.starts_with("US"));
        assert!(row.split_whitespace().eq(["US", "10", "1", "2", "7", "0"]));
    }
}
