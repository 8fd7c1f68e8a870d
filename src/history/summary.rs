//! Aggregate view over the run history

use serde::Serialize;
use std::collections::BTreeMap;

use super::RunRecord;
use crate::constants::{history::SUMMARY_COST_DECIMALS, round_to};

const RULE_WIDTH: usize = 60;

/// Count and cost for one language or model
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupStats {
    pub count: u32,
    pub cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistorySummary {
    pub total_runs: u32,
    pub successful_runs: u32,
    pub failed_runs: u32,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub total_cost_usd: f64,
    pub by_language: BTreeMap<String, GroupStats>,
    pub by_model: BTreeMap<String, GroupStats>,
    pub first_run: Option<String>,
    pub last_run: Option<String>,
}

impl HistorySummary {
    pub fn from_records(records: &[RunRecord]) -> Self {
        let mut summary = Self::default();
        let mut cost = 0.0;

        for record in records {
            summary.total_runs += 1;
            if record.success {
                summary.successful_runs += 1;
            } else {
                summary.failed_runs += 1;
            }
            summary.total_input_tokens += u64::from(record.input_tokens);
            summary.total_output_tokens += u64::from(record.output_tokens);
            cost += record.cost_usd;

            let lang = summary
                .by_language
                .entry(record.language.clone())
                .or_default();
            lang.count += 1;
            lang.cost += record.cost_usd;

            let model = summary.by_model.entry(record.model.clone()).or_default();
            model.count += 1;
            model.cost += record.cost_usd;
        }

        summary.total_cost_usd = round_to(cost, SUMMARY_COST_DECIMALS);
        summary.first_run = records.first().map(|r| r.timestamp.clone());
        summary.last_run = records.last().map(|r| r.timestamp.clone());
        summary
    }

    pub fn is_empty(&self) -> bool {
        self.total_runs == 0
    }

    /// Console report
    pub fn display(&self) -> String {
        let heavy = "=".repeat(RULE_WIDTH);
        let light = "-".repeat(RULE_WIDTH);
        let mut lines = vec![heavy.clone(), "   RUN HISTORY SUMMARY".to_string(), heavy.clone()];

        if self.is_empty() {
            lines.push(String::new());
            lines.push("   No runs recorded yet.".to_string());
            lines.push(heavy);
            return lines.join("\n");
        }

        lines.push(String::new());
        lines.push(format!("   Total runs:      {}", self.total_runs));
        lines.push(format!("   Successful:      {}", self.successful_runs));
        lines.push(format!("   Failed:          {}", self.failed_runs));
        lines.push(light.clone());
        lines.push(format!(
            "   Total tokens:    {} in / {} out",
            group_thousands(self.total_input_tokens),
            group_thousands(self.total_output_tokens)
        ));
        lines.push(format!("   Total cost:      ${:.4}", self.total_cost_usd));
        lines.push(light.clone());

        lines.push(String::new());
        lines.push("   By Language:".to_string());
        for (lang, stats) in &self.by_language {
            lines.push(format!(
                "      {:<15}: {:<4} files (${:.4})",
                lang, stats.count, stats.cost
            ));
        }

        lines.push(String::new());
        lines.push("   By Model:".to_string());
        for (model, stats) in &self.by_model {
            lines.push(format!(
                "      {:<15}: {:<4} runs (${:.4})",
                model, stats.count, stats.cost
            ));
        }

        if let (Some(first), Some(last)) = (&self.first_run, &self.last_run) {
            lines.push(light);
            lines.push(format!("   First run:       {}", first));
            lines.push(format!("   Last run:        {}", last));
        }
        lines.push(heavy);
        lines.join("\n")
    }
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
