use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use wg_core::Timestamp;
use wg_explore::{ExplorePhase, ManualClock};

use super::Session;

/// 2024-01-01T00:00:00Z, so runs are reproducible.
const START_MILLIS: i64 = 1_704_067_200_000;
/// In-world time between explore steps.
const STEP_MILLIS: i64 = 10 * 60 * 1000;

pub fn run(
    path: &Path,
    steps: u32,
    seed: u64,
    location: &str,
    biome: Option<&str>,
    config: Option<&Path>,
    export: Option<&Path>,
) -> Result<(), String> {
    let pack = super::load_pack(path)?;
    let config = super::load_config(config)?;
    let clock = ManualClock::new(Timestamp::from_millis(START_MILLIS));
    let mut session = Session::start(pack, location, biome, config, clock.clone());
    let mut rng = StdRng::seed_from_u64(seed);

    println!(
        "  {} {}",
        "Simulation".bold(),
        format!("({steps} steps, seed={seed})").dimmed()
    );

    let mut rests = 0u32;
    for step in 1..=steps {
        clock.advance(STEP_MILLIS);
        let phase = session
            .machine
            .begin_exploration()
            .map_err(|e| e.to_string())?
            .clone();

        match &phase {
            ExplorePhase::Encounter(_) | ExplorePhase::Chapter(_) => {
                let count = phase.options().len();
                let index = if count == 0 {
                    0
                } else {
                    rng.random_range(0..count)
                };
                let summary = session
                    .machine
                    .choose_option(index)
                    .map_err(|e| e.to_string())?;
                session
                    .machine
                    .continue_after_resolution()
                    .map_err(|e| e.to_string())?;
                let choice = summary.choice_text.as_deref().unwrap_or("—");
                println!(
                    "  {} {} {}",
                    format!("[{step:>3}]").dimmed(),
                    summary.title,
                    format!("-> {choice}").dimmed()
                );
                for line in &summary.reward_summaries {
                    println!("        {line}");
                }
            }
            ExplorePhase::RestNeeded(events) => {
                session.machine.rest().map_err(|e| e.to_string())?;
                rests += 1;
                println!(
                    "  {} {}",
                    format!("[{step:>3}]").dimmed(),
                    format!("rested after {events} encounters").yellow()
                );
            }
            ExplorePhase::Error(message) => {
                println!(
                    "  {} {}",
                    format!("[{step:>3}]").dimmed(),
                    format!("stopped: {message}").red()
                );
                break;
            }
            ExplorePhase::Idle | ExplorePhase::Loading | ExplorePhase::Resolution(_) => {}
        }
    }

    println!();
    let history = session.machine.history();
    if !history.is_empty() {
        let mut counts: Vec<(String, String, usize)> = Vec::new();
        for entry in history.entries() {
            match counts.iter_mut().find(|(id, _, _)| *id == entry.snippet_id) {
                Some((_, _, n)) => *n += 1,
                None => counts.push((entry.snippet_id.clone(), entry.title.clone(), 1)),
            }
        }
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Encounter", "Title", "Times"]);
        for (id, title, n) in &counts {
            table.add_row(vec![id.clone(), title.clone(), n.to_string()]);
        }
        println!("{table}");
        println!();
    }
    println!(
        "  {} encounters resolved, {rests} rests",
        history.len()
    );
    println!();
    session.print_status();

    if let Some(out) = export {
        let log = if out.extension().is_some_and(|ext| ext == "md") {
            history.export_markdown()
        } else {
            history.export_text()
        };
        std::fs::write(out, log).map_err(|e| format!("cannot write {}: {e}", out.display()))?;
        println!();
        println!("  {} {}", "Log written to".dimmed(), out.display());
    }

    Ok(())
}
