use crate::discrete::types::{EdgeAggregate, LocationPosterior};

/// Human-readable ranked summary: root origin posterior, top transition
/// paths and interpretation notes.
pub fn render_summary(
    root_distribution: &[LocationPosterior],
    top_paths: &[EdgeAggregate],
) -> String {
    let mut lines: Vec<String> = vec![
        "# Discrete Trait Summary".to_string(),
        String::new(),
        "## Root Origin Posterior".to_string(),
        "| Rank | Location | Posterior |".to_string(),
        "| ---- | -------- | --------- |".to_string(),
    ];

    for (index, entry) in root_distribution.iter().enumerate() {
        lines.push(format!(
            "| {} | {} | {:.4} |",
            index + 1,
            entry.location,
            entry.probability
        ));
    }

    lines.push(String::new());
    lines.push("## Top Transition Paths".to_string());
    lines.push("| Rank | Path | Weight | Time Median | Time 95% HPD | Support |".to_string());
    lines.push("| ---- | ---- | ------ | ----------- | ------------ | ------- |".to_string());

    for (index, edge) in top_paths.iter().enumerate() {
        let interval = match (edge.time_hpd_low, edge.time_hpd_high) {
            (Some(low), Some(high)) => format!("{:.2}–{:.2}", low, high),
            _ => "–".to_string(),
        };
        let mut support_parts = Vec::new();
        if let Some(bayes_factor) = edge.bayes_factor {
            support_parts.push(format!("BF={:.2}", bayes_factor));
        }
        if let Some(posterior) = edge.posterior_support {
            support_parts.push(format!("p={:.3}", posterior));
        }
        if let Some(jumps) = edge.jumps_mean {
            support_parts.push(format!("jumps={:.2}", jumps));
        }
        let support_text = if support_parts.is_empty() {
            "–".to_string()
        } else {
            support_parts.join(", ")
        };
        let median_text = edge
            .time_median
            .map(|median| format!("{:.2}", median))
            .unwrap_or_else(|| "–".to_string());
        lines.push(format!(
            "| {} | {} → {} | {:.4} | {} | {} | {} |",
            index + 1,
            edge.src,
            edge.dst,
            edge.weight,
            median_text,
            interval,
            support_text
        ));
    }

    lines.push(String::new());
    lines.push("## Notes".to_string());
    lines.push(
        "- Posterior weights are derived from the MCC tree distributions; interpret as expected transition counts."
            .to_string(),
    );
    lines.push(
        "- Timing estimates are approximated from the child's time-before-present annotations."
            .to_string(),
    );
    lines.push(
        "- Support values (Bayes Factor, posterior inclusion, Markov jumps) are included when files were provided."
            .to_string(),
    );

    lines.join("\n")
}
