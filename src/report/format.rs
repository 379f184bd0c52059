//! Formatted terminal output.
//!
//! We keep formatting code in one place so the numerical code stays clean and
//! output changes are localized.

use crate::data::ResponseTable;
use crate::domain::{BowtieConfig, BowtieMode, BowtieResult};

/// Format the run header (input table + analysis settings).
pub fn format_run_summary(table: &ResponseTable, config: &BowtieConfig) -> String {
    let grid = table.energy_grid();
    let mut out = String::new();

    out.push_str("=== bowtie - geometric factor analysis ===\n");
    out.push_str(&format!("Responses: {}\n", config.responses.display()));
    out.push_str(&format!(
        "Table: {} channel(s) | {} energies in [{:.4e}, {:.4e}]\n",
        table.channel_count(),
        grid.len(),
        grid.first(),
        grid.last(),
    ));
    if let Some(points) = config.resample {
        out.push_str(&format!("Resampled: {points} log-spaced energies\n"));
    }
    out.push_str(&format!(
        "Energy window: [{}, {}]\n",
        config.energy_min, config.energy_max
    ));
    out.push_str(&format!(
        "Spectral indices: {} steps in [{}, {}] | mode={}\n",
        config.gamma_steps,
        config.gamma_min,
        config.gamma_max,
        config.mode.display_name(),
    ));

    out
}

/// Format bowtie results as an aligned table, one row per channel.
pub fn format_results_table(results: &[BowtieResult], mode: BowtieMode) -> String {
    let mut out = String::new();
    out.push_str(&format!("Bowtie points ({}):\n", mode.display_name()));
    out.push_str(
        format!(
            "{:<16} {:>14} {:>12} {:>12} {:>14}",
            "channel", "G", "+err", "-err", "E_eff"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(&format!("{:-<16} {:-<14} {:-<12} {:-<12} {:-<14}\n", "", "", "", "", ""));

    for r in results {
        out.push_str(&format!(
            "{:<16} {:>14.6e} {:>12.3e} {:>12.3e} {:>14.6e}\n",
            truncate(&r.channel, 16),
            r.geometric_factor,
            r.geometric_factor_errors.gf_upper,
            r.geometric_factor_errors.gf_lower,
            r.effective_energy,
        ));
    }

    out
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
    use crate::domain::GfErrors;

    fn result(channel: &str) -> BowtieResult {
        BowtieResult {
            channel: channel.to_string(),
            geometric_factor: 2.5,
            geometric_factor_errors: GfErrors {
                gf_upper: 0.01,
                gf_lower: 0.02,
            },
            effective_energy: 10.0,
            plot: None,
        }
    }

    #[test]
    fn results_table_lists_channels_in_order() {
        let txt = format_results_table(&[result("boxcar1"), result("boxcar2")], BowtieMode::Differential);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Bowtie points (differential):");
        assert!(lines[3].starts_with("boxcar1 "));
        assert!(lines[4].starts_with("boxcar2 "));
        assert!(lines[3].contains("2.500000e0"));
    }

    #[test]
    fn long_channel_names_are_truncated() {
        assert_eq!(truncate("a_very_long_channel_name", 8), "a_very_.");
        assert_eq!(truncate("short", 8), "short");
    }
}
