//! Density report export: summarize a snapshot's density view as text.
//!
//! Produces a plain-text report the investigator can save alongside their
//! notes: global metrics first, then every territory grouped by
//! classification.
//!
//! ```text
//! GraphSnapshot + TerritoryMap → write_density_report() → text
//!   → saved next to the notes, or pasted into a case file
//! ```

use std::io::Write;

use chrono::{DateTime, Utc};

use crate::model::{Classification, GraphSnapshot, Territory, TerritoryMap};
use crate::structure::GraphMetrics;
use crate::Result;

/// Write the density report for `snapshot`.
///
/// `generated_at` is stamped into the header; callers pass `Utc::now()`
/// outside of tests.
pub fn write_density_report(
    writer: &mut dyn Write,
    snapshot: &GraphSnapshot,
    metrics: &GraphMetrics,
    territories: &TerritoryMap,
    generated_at: DateTime<Utc>,
) -> Result<()> {
    // Header
    writeln!(writer, "// graph-density report")?;
    writeln!(writer, "// Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(writer, "// Nodes: {}", snapshot.node_count())?;
    writeln!(writer, "// Edges: {}", snapshot.edge_count())?;
    writeln!(writer)?;

    writeln!(writer, "Global metrics")?;
    writeln!(writer, "  density: {}", format_percent(metrics.global_density))?;
    writeln!(writer, "  average degree: {:.2}", metrics.average_degree)?;
    writeln!(writer, "  clustering coefficient: {:.2}", metrics.clustering_coefficient)?;
    writeln!(
        writer,
        "  hubs: {} | peripherals: {} | orphans: {}",
        metrics.hubs, metrics.peripherals, metrics.orphans
    )?;

    for classification in Classification::ALL {
        let group = territories.group(classification);
        writeln!(writer)?;
        writeln!(writer, "{} ({})", section_title(classification), group.len())?;
        for (i, territory) in group.iter().enumerate() {
            writeln!(writer, "{}", format_territory(i, territory))?;
        }
    }

    Ok(())
}

fn section_title(classification: Classification) -> &'static str {
    match classification {
        Classification::Explored => "Explored territories",
        Classification::Frontier => "Frontier zones",
        Classification::Unexplored => "Unexplored territories",
    }
}

/// Whole-number percentage, `0.456 → "46%"`.
fn format_percent(ratio: f64) -> String {
    format!("{}%", (ratio * 100.0).round() as i64)
}

/// Two-line entry: heading, then density and size.
fn format_territory(index: usize, territory: &Territory) -> String {
    let heading = match territory.anchor() {
        Some(id) => id.to_string(),
        None => format!("Zone {}", index + 1),
    };
    let heading = if territory.description.is_empty() {
        heading
    } else {
        format!("{heading}: {}", territory.description)
    };

    // Unexplored zones have no meaningful density yet.
    let detail = match territory.classification {
        Classification::Unexplored => format!("size {} nodes", territory.size),
        _ => format!(
            "density {} | size {} nodes",
            format_percent(territory.density),
            territory.size
        ),
    };
    format!("- {heading}\n  {detail}")
}
