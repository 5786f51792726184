pub mod check;
pub mod play;
pub mod simulate;

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use parking_lot::Mutex;
use tracing::debug;

use wg_core::{ContentPack, PlayerState, validate_pack};
use wg_explore::{
    Clock, ExplorationMachine, ExploreConfig, ExploreHistory, ExplorePhase, InMemoryRepository,
    InMemoryStore, PlayerStore, ResolutionSummary, RewardLedger,
};

/// Load a content pack and refuse it if validation finds errors.
/// Warnings are printed to stderr.
fn load_pack(path: &Path) -> Result<ContentPack, String> {
    let pack = ContentPack::from_file(path).map_err(|e| e.to_string())?;
    let issues = validate_pack(&pack);
    for issue in issues.iter().filter(|i| !i.is_error) {
        eprintln!("  {}", issue.to_string().yellow());
    }
    let errors = issues.iter().filter(|i| i.is_error).count();
    if errors > 0 {
        for issue in issues.iter().filter(|i| i.is_error) {
            eprintln!("  {}", issue.to_string().red());
        }
        return Err(format!(
            "content pack has {errors} error{}",
            if errors == 1 { "" } else { "s" }
        ));
    }
    debug!(
        path = %path.display(),
        snippets = pack.snippets.len(),
        chapters = pack.chapters.len(),
        "content pack loaded"
    );
    Ok(pack)
}

fn load_config(path: Option<&Path>) -> Result<ExploreConfig, String> {
    match path {
        Some(path) => ExploreConfig::from_file(path).map_err(|e| e.to_string()),
        None => Ok(ExploreConfig::default()),
    }
}

/// A machine wired to in-memory collaborators the CLI can inspect.
struct Session {
    machine: ExplorationMachine,
    store: Arc<InMemoryStore>,
    ledger: Arc<Mutex<RewardLedger>>,
}

impl Session {
    fn start(
        pack: ContentPack,
        location: &str,
        biome: Option<&str>,
        config: ExploreConfig,
        clock: impl Clock + 'static,
    ) -> Self {
        let mut player = PlayerState::new(location);
        if let Some(biome) = biome {
            player = player.with_biome(biome);
        }
        let store = Arc::new(InMemoryStore::new(player, clock));
        let ledger = RewardLedger::new().shared();
        let machine = ExplorationMachine::new(
            store.clone(),
            Arc::new(InMemoryRepository::new(pack)),
            Box::new(Arc::clone(&ledger)),
            config,
        );
        Self {
            machine,
            store,
            ledger,
        }
    }

    fn print_status(&self) {
        let player = self.store.current();
        let now = self.store.peek_now();
        let director = self.machine.director();
        let state = &player.director;

        println!("  {}", "Status".bold().underline());
        if let Some(time) = now.to_datetime() {
            println!("  Time:       {}", time.format("%Y-%m-%d %H:%M UTC"));
        }
        match &player.biome {
            Some(biome) => println!("  Location:   {} ({biome})", player.location),
            None => println!("  Location:   {}", player.location),
        }
        println!("  Difficulty: {}", director.difficulty(state));
        println!("  Playstyle:  {}", director.dominant_style(state));
        println!(
            "  Fatigue:    {}/{}",
            state.events_since_rest,
            self.machine.config().fatigue_threshold
        );
        println!("  Encounters: {}", state.total_events);

        let statuses: Vec<_> = player.active_statuses(now).collect();
        if !statuses.is_empty() {
            let list: Vec<_> = statuses
                .iter()
                .map(|s| format!("{} ({}m left)", s.key, s.remaining_millis(now) / 60_000))
                .collect();
            println!("  Statuses:   {}", list.join(", "));
        }

        let ledger = self.ledger.lock();
        println!("  Seeds:      {}", ledger.wallet.seeds());
        let items: Vec<_> = ledger
            .inventory
            .items()
            .map(|(item, n)| format!("{item} x{n}"))
            .collect();
        if !items.is_empty() {
            println!("  Items:      {}", items.join(", "));
        }
        let skills: Vec<_> = ledger
            .skills
            .skills()
            .map(|(skill, xp)| format!("{skill} {xp}xp"))
            .collect();
        if !skills.is_empty() {
            println!("  Skills:     {}", skills.join(", "));
        }
    }
}

fn render_phase(phase: &ExplorePhase) {
    match phase {
        ExplorePhase::Idle => println!("  {}", "You stand still. Type 'explore'.".dimmed()),
        ExplorePhase::Loading => println!("  {}", "...".dimmed()),
        ExplorePhase::Encounter(snippet) => {
            println!("  {}", snippet.title.bold());
            println!("  {}", snippet.event_text);
            render_options(phase);
        }
        ExplorePhase::Chapter(chapter) => {
            println!(
                "  {} {}",
                "Chapter:".magenta().bold(),
                chapter.world_event_title.bold()
            );
            println!("  {}", chapter.world_event_summary.italic());
            if let Some(snippet) = chapter.primary_snippet() {
                println!();
                println!("  {}", snippet.event_text);
            }
            render_options(phase);
        }
        ExplorePhase::Resolution(summary) => render_summary(summary),
        ExplorePhase::RestNeeded(events) => println!(
            "  {} after {events} encounters. Type 'rest'.",
            "You are tired".yellow()
        ),
        ExplorePhase::Error(message) => println!("  {} {message}", "Nothing here:".red()),
    }
}

fn render_options(phase: &ExplorePhase) {
    for (i, option) in phase.options().iter().enumerate() {
        println!("    {}. {}", i + 1, option.text);
    }
}

fn render_summary(summary: &ResolutionSummary) {
    match &summary.choice_text {
        Some(choice) => println!("  {} {choice}", "You chose:".green()),
        None => println!("  {}", "You hesitate and move on.".dimmed()),
    }
    for line in &summary.reward_summaries {
        if line.starts_with("Reward not granted") {
            println!("    {}", line.yellow());
        } else {
            println!("    {}", line.cyan());
        }
    }
}

fn render_history(history: &ExploreHistory, limit: usize) {
    if history.is_empty() {
        println!("  {}", "(nothing explored yet)".dimmed());
        return;
    }
    let recent = history.recent(limit);
    let offset = history.len() - recent.len();
    for (i, entry) in recent.iter().enumerate() {
        let choice = entry.choice_summary.as_deref().unwrap_or("—");
        println!(
            "  {:>3}. {} {}",
            offset + i + 1,
            entry.title.bold(),
            format!("({choice})").dimmed()
        );
    }
}
