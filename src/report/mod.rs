//! Reporting utilities: scan rankings and formatted terminal output.

pub mod format;

pub use format::*;

use crate::app::pipeline::ScanEntry;

/// Winner/laggard rankings (top-N each side).
#[derive(Debug, Clone)]
pub struct ScanRankings {
    pub winners: Vec<ScanEntry>,
    pub laggards: Vec<ScanEntry>,
}

/// Rank scan entries by during-promo unit lift.
pub fn rank_winners_laggards(entries: &[ScanEntry], top_n: usize) -> ScanRankings {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| {
        b.result
            .metrics
            .during_lift_pct
            .partial_cmp(&a.result.metrics.during_lift_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let winners = sorted.iter().take(top_n).cloned().collect();

    let mut sorted_laggards = entries.to_vec();
    sorted_laggards.sort_by(|a, b| {
        a.result
            .metrics
            .during_lift_pct
            .partial_cmp(&b.result.metrics.during_lift_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let laggards = sorted_laggards.iter().take(top_n).cloned().collect();

    ScanRankings { winners, laggards }
}
