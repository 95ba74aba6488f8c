/// Result output: JSON for machines on stdout or a file, a short summary for people on stderr
use colored::*;
use rxnfinder_core::{BatchResult, ReactionOutcome, RxnFinderResult};
use std::io::Write;
use std::path::Path;

/// Write `batch` as pretty JSON to `path`, or to stdout
pub fn write_json(batch: &BatchResult, path: Option<&Path>) -> RxnFinderResult<()> {
    let json = serde_json::to_string_pretty(batch)?;
    match path {
        Some(path) => {
            std::fs::write(path, json + "\n")?;
            success(&format!("Results written to {}", path.display()));
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }
    Ok(())
}

/// Display a success message
pub fn success(message: &str) {
    eprintln!("{} {}", "✓".green(), message);
}

/// One line per reaction
pub fn print_summary(batch: &BatchResult) {
    eprintln!("\n{}", "Results".bold().cyan());
    for hits in batch.iter() {
        let status = match &hits.outcome {
            ReactionOutcome::Ranked if hits.is_empty() => "no hits above floor".dimmed(),
            ReactionOutcome::Ranked => format!("{} hits", hits.ranked_hits.len()).green(),
            ReactionOutcome::NoCandidates => "no candidate genes".dimmed(),
            ReactionOutcome::AlignmentTimedOut { timeout_secs } => {
                format!("alignment timed out after {}s", timeout_secs).yellow()
            }
        };
        let best = hits
            .ranked_hits
            .first()
            .map(|h| format!(" (best {} at {:.1})", h.target_gene(), h.bit_score()))
            .unwrap_or_default();
        eprintln!("{} {}: {}{}", "●".blue(), hits.reaction_id, status, best);
    }
}
