//! Batch report orchestration
//!
//! Drives one full run end-to-end: group the input images by blade, generate
//! one report per non-empty group through the injected model provider, render
//! each report to an HTML section, and write the combined document once at
//! the end. Strictly sequential — one group is fully processed before the
//! next begins, and the first failure aborts the run with nothing flushed
//! to disk.

use anyhow::{Context, Result};
use std::time::Instant;
use tracing::{debug, info};

use crate::config::ReportConfig;
use crate::grouping::group_by_blade;
use crate::llm::ModelProvider;
use crate::prompt::build_conversation;
use crate::render::{markdown_to_html, render_document, render_section};

/// Counters from one completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Blade groups discovered by the grouper
    pub groups_discovered: usize,
    /// Reports generated and rendered
    pub reports_generated: usize,
    /// Groups skipped because both modality lists were empty
    pub groups_skipped: usize,
}

/// Run the full batch: group, generate, render, write.
///
/// The provider is shared read-only across all generations; there is no
/// partial-failure isolation and no retry — an error in any group's
/// generation or in the final write aborts the run.
pub async fn run_batch(
    provider: &dyn ModelProvider,
    config: &ReportConfig,
) -> Result<RunSummary> {
    let groups = group_by_blade(&config.inputs.rgb_dir, &config.inputs.thermal_dir);

    info!(
        groups = groups.len(),
        rgb_dir = %config.inputs.rgb_dir.display(),
        thermal_dir = %config.inputs.thermal_dir.display(),
        "Grouped inspection images by blade identifier"
    );

    let mut sections = Vec::with_capacity(groups.len());
    let mut skipped = 0usize;

    for group in &groups {
        // A group with no images in either modality never becomes a report.
        if group.is_empty() {
            skipped += 1;
            continue;
        }

        let start = Instant::now();
        let conversation = build_conversation(group);

        let report = provider
            .generate(&conversation)
            .await
            .with_context(|| format!("Report generation failed for {}", group.blade_id))?;

        let section = render_section(&group.blade_id, &markdown_to_html(&report));

        info!(
            blade = %group.blade_id,
            rgb_images = group.rgb.len(),
            thermal_images = group.thermal.len(),
            latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Report section complete"
        );
        debug!(section = %section, "Rendered HTML section");

        sections.push(section);
    }

    let document = render_document(&sections);
    std::fs::write(&config.output.html_path, &document).with_context(|| {
        format!(
            "Failed to write report document to {}",
            config.output.html_path.display()
        )
    })?;

    let summary = RunSummary {
        groups_discovered: groups.len(),
        reports_generated: sections.len(),
        groups_skipped: skipped,
    };

    info!(
        output = %config.output.html_path.display(),
        reports = summary.reports_generated,
        skipped = summary.groups_skipped,
        "Report document written"
    );

    Ok(summary)
}
