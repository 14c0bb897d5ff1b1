// Colored terminal output for run summaries and vocabulary listings.
//
// This module handles all terminal-specific formatting: colors, tables,
// alignment. The main.rs display paths delegate here.

use std::collections::BTreeMap;

use colored::Colorize;

use crate::output::truncate_chars;
use crate::pipeline::RunSummary;

/// Display the end-of-run summary.
pub fn display_run_summary(summary: &RunSummary) {
    println!("\n{}", "=== Run complete ===".bold());
    println!("  Responses in:     {}", summary.responses);
    println!("  Unique topics:    {}", summary.unique_topics);
    println!("  Clusters labeled: {}", summary.clusters_labeled);
    println!("  Rows out:         {}", summary.records);
    println!(
        "  Output:           {}",
        summary.output.display().to_string().green()
    );
    if summary.records == 0 {
        println!(
            "\n{}",
            "No topics found in any response — the output has headers only.".dimmed()
        );
    }
}

/// Display the topic vocabulary with occurrence counts, most frequent first.
pub fn display_vocabulary(responses: usize, frequencies: &BTreeMap<String, usize>) {
    if frequencies.is_empty() {
        println!("No topics found across {responses} responses.");
        return;
    }

    println!(
        "\n{}",
        format!(
            "=== Topic vocabulary ({} unique, {} responses) ===",
            frequencies.len(),
            responses
        )
        .bold()
    );
    println!();
    println!("  {:>5}  {}", "Count".dimmed(), "Topic".dimmed());
    println!("  {}", "-".repeat(60).dimmed());

    let mut entries: Vec<(&String, &usize)> = frequencies.iter().collect();
    // Most frequent first; lexicographic within a count (BTreeMap order).
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    for (topic, count) in entries {
        println!("  {:>5}  {}", count, truncate_chars(topic, 52));
    }
    println!();
}
