use std::fmt::Write;

use anyhow::bail;
use chrono::NaiveDate;

use crate::aggregate::aggregate;
use crate::branch;
use crate::models::{
    AggregateResult, BranchReport, BranchRule, ClassReport, Component, ComponentRanking, Dataset,
    RankingEntry, Row,
};
use crate::rank;

fn rank_all(rows: &[Row], limit: usize) -> Vec<ComponentRanking> {
    Component::ALL
        .iter()
        .map(|&component| ComponentRanking {
            component,
            entries: if limit == rank::PODIUM_SIZE {
                rank::top3(rows, component)
            } else {
                rank::top_n(rows, component, limit)
            },
        })
        .collect()
}

/// Ranks one component over the whole class or over a single named branch.
///
/// Returns the place name used in headings alongside the entries.
pub fn rank_scope(
    dataset: &Dataset,
    rules: &[BranchRule],
    component: Component,
    branch_name: Option<&str>,
    limit: usize,
) -> anyhow::Result<(String, Vec<RankingEntry>)> {
    let Some(name) = branch_name else {
        return Ok((
            "the class".to_string(),
            rank::top_n(&dataset.rows, component, limit),
        ));
    };

    if !rules.iter().any(|rule| rule.label == name) {
        let known: Vec<&str> = rules.iter().map(|rule| rule.label.as_str()).collect();
        bail!("unknown branch {name}; expected one of {}", known.join(", "));
    }

    let branches = branch::partition(&dataset.rows, rules);
    let rows = branches.get(name).map(Vec::as_slice).unwrap_or_default();
    Ok((name.to_string(), rank::top_n(rows, component, limit)))
}

pub fn build_class_report(dataset: &Dataset, rules: &[BranchRule], limit: usize) -> ClassReport {
    let branches = branch::partition(&dataset.rows, rules)
        .into_iter()
        .map(|(name, rows)| BranchReport {
            name,
            summary: aggregate(&rows),
            rankings: rank_all(&rows, limit),
        })
        .collect();

    ClassReport {
        summary: aggregate(&dataset.rows),
        rankings: rank_all(&dataset.rows, limit),
        branches,
    }
}

fn averages_line(summary: &AggregateResult) -> String {
    Component::ALL
        .iter()
        .map(|&component| {
            format!(
                "{}: {:.2}",
                component.label(),
                summary.averages.get(component)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_entries(output: &mut String, entries: &[RankingEntry], place: &str) {
    for (index, entry) in entries.iter().enumerate() {
        let _ = writeln!(
            output,
            "No. {} in {}: Id: {}, Marks: {:.2}",
            index + 1,
            place,
            entry.student_id,
            entry.score
        );
    }
}

pub fn render_text(report: &ClassReport, branch_rankings: bool) -> String {
    let mut output = String::new();
    let summary = &report.summary;

    let _ = writeln!(output, "Overall Records: {}", summary.count);
    if summary.count > 0 {
        let _ = writeln!(output, "Overall Averages:");
        for component in Component::ALL {
            let _ = writeln!(
                output,
                "{}: {:.2}",
                component.label(),
                summary.averages.get(component)
            );
        }
    }

    if summary.mismatches.is_empty() {
        let _ = writeln!(output, "\nNo overall errors found.");
    } else {
        let _ = writeln!(output, "\nOverall Errors:");
        for mismatch in &summary.mismatches {
            let _ = writeln!(output, " - {}", mismatch);
        }
    }

    for ranking in &report.rankings {
        let _ = writeln!(
            output,
            "\nTop {} students in the class for {}:",
            ranking.entries.len(),
            ranking.component.label()
        );
        write_entries(&mut output, &ranking.entries, "the class");
    }

    for branch in &report.branches {
        let _ = writeln!(output, "\nBranch: {}", branch.name);
        let _ = writeln!(output, "Records: {}", branch.summary.count);
        if branch.summary.count > 0 {
            let _ = writeln!(output, "{}", averages_line(&branch.summary));
        } else {
            let _ = writeln!(output, "No records for this branch.");
        }

        if branch.summary.mismatches.is_empty() {
            let _ = writeln!(output, "No errors found for this branch.");
        } else {
            let _ = writeln!(output, "Errors:");
            for mismatch in &branch.summary.mismatches {
                let _ = writeln!(output, " - {}", mismatch);
            }
        }

        if branch_rankings {
            for ranking in &branch.rankings {
                let _ = writeln!(
                    output,
                    "Top {} in {} for {}:",
                    ranking.entries.len(),
                    branch.name,
                    ranking.component.label()
                );
                write_entries(&mut output, &ranking.entries, &branch.name);
            }
        }
    }

    output
}

pub fn render_markdown(report: &ClassReport, source: &str, generated_on: NaiveDate) -> String {
    let mut output = String::new();
    let summary = &report.summary;

    let _ = writeln!(output, "# Class Performance Report");
    let _ = writeln!(output, "Generated on {} from {}", generated_on, source);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overview");
    let _ = writeln!(output, "- Records: {}", summary.count);
    if summary.count > 0 {
        for component in Component::ALL {
            let _ = writeln!(
                output,
                "- {} average: {:.2}",
                component.label(),
                summary.averages.get(component)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Total Mismatches");
    if summary.mismatches.is_empty() {
        let _ = writeln!(output, "No mismatches between component sums and totals.");
    } else {
        for mismatch in &summary.mismatches {
            let _ = writeln!(output, "- {}", mismatch);
        }
    }

    if !summary.skipped.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Skipped Rows");
        for skipped in &summary.skipped {
            let _ = writeln!(output, "- {}", skipped);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Class Toppers");
    for ranking in &report.rankings {
        let _ = writeln!(output);
        let _ = writeln!(output, "### {}", ranking.component.label());
        if ranking.entries.is_empty() {
            let _ = writeln!(output, "No scores recorded.");
        }
        for (index, entry) in ranking.entries.iter().enumerate() {
            let _ = writeln!(
                output,
                "{}. {} ({:.2})",
                index + 1,
                entry.student_id,
                entry.score
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Branches");
    if report.branches.is_empty() {
        let _ = writeln!(output, "No rows matched any branch.");
    }
    for branch in &report.branches {
        let _ = writeln!(output);
        let _ = writeln!(output, "### {}", branch.name);
        let _ = writeln!(output, "- Records: {}", branch.summary.count);
        if branch.summary.count > 0 {
            let _ = writeln!(output, "- Averages: {}", averages_line(&branch.summary));
        }
        for mismatch in &branch.summary.mismatches {
            let _ = writeln!(output, "- Mismatch: {}", mismatch);
        }
        for ranking in &branch.rankings {
            if let Some(best) = ranking.entries.first() {
                let _ = writeln!(
                    output,
                    "- Best {}: {} ({:.2})",
                    ranking.component.label(),
                    best.student_id,
                    best.score
                );
            }
        }
    }

    output
}
