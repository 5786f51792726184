//! Content lookup.

use tracing::warn;
use wg_core::{
    ChapterEventResponse, ChapterTemplate, ContentPack, Difficulty, PlayerState, Snippet,
    Timestamp,
};

/// Read access to authored content.
pub trait ContentRepository: Send + Sync {
    /// Look up a snippet by id.
    fn snippet(&self, id: &str) -> Option<Snippet>;

    /// Snippets that may be offered to `player` right now, in authoring
    /// order.
    fn find_eligible(&self, player: &PlayerState, now: Timestamp) -> Vec<Snippet>;

    /// A chapter suitable for `player` at `difficulty`, if any.
    fn chapter_event(
        &self,
        player: &PlayerState,
        difficulty: Difficulty,
        now: Timestamp,
    ) -> Option<ChapterEventResponse>;
}

/// A repository backed by a [`ContentPack`] held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    pack: ContentPack,
}

impl InMemoryRepository {
    /// Serve content from `pack`.
    pub fn new(pack: ContentPack) -> Self {
        Self { pack }
    }

    /// Serve only `snippets`, with no chapters.
    pub fn from_snippets(snippets: Vec<Snippet>) -> Self {
        Self::new(ContentPack {
            snippets,
            chapters: Vec::new(),
        })
    }

    /// Add a chapter template.
    pub fn with_chapter(mut self, template: ChapterTemplate) -> Self {
        self.pack.chapters.push(template);
        self
    }

    /// The underlying pack.
    pub fn pack(&self) -> &ContentPack {
        &self.pack
    }
}

impl ContentRepository for InMemoryRepository {
    fn snippet(&self, id: &str) -> Option<Snippet> {
        self.pack.snippet(id).cloned()
    }

    fn find_eligible(&self, player: &PlayerState, now: Timestamp) -> Vec<Snippet> {
        self.pack
            .snippets
            .iter()
            .filter(|s| s.is_eligible(player, now))
            .cloned()
            .collect()
    }

    /// Among available templates, the one resolved longest ago (never
    /// resolved first); ties go to the earlier template.
    fn chapter_event(
        &self,
        player: &PlayerState,
        difficulty: Difficulty,
        now: Timestamp,
    ) -> Option<ChapterEventResponse> {
        let template = self
            .pack
            .chapters
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_available(player, difficulty, now))
            .filter(|(_, t)| !t.snippet_ids.is_empty())
            .min_by_key(|(i, t)| (player.last_choice_at(&t.completion_tag()), *i))
            .map(|(_, t)| t)?;

        match self.pack.assemble(template) {
            Ok(chapter) => Some(chapter),
            Err(e) => {
                warn!(chapter = %template.title, error = %e, "chapter could not be assembled");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wg_core::{ChoiceOption, Condition, Consequence};

    fn snippet(id: &str) -> Snippet {
        Snippet::new(id, id, "text").with_choice(ChoiceOption::new("go"), Consequence::none())
    }

    fn repo() -> InMemoryRepository {
        InMemoryRepository::from_snippets(vec![
            snippet("explore_a"),
            snippet("explore_b").with_location("pond"),
            snippet("explore_c").with_condition(Condition::HasChoice {
                tag: "found_key".into(),
            }),
        ])
        .with_chapter(
            ChapterTemplate::new("Moonlit Assembly", "The moths gather.").with_snippet("explore_a"),
        )
        .with_chapter(
            ChapterTemplate::new("Storm Front", "Rain.")
                .with_snippet("explore_b")
                .with_min_difficulty(Difficulty::Hard),
        )
    }

    #[test]
    fn lookup() {
        let repo = repo();
        assert_eq!(repo.snippet("explore_b").unwrap().id, "explore_b");
        assert!(repo.snippet("explore_z").is_none());
    }

    #[test]
    fn eligibility_filters_location_and_conditions() {
        let repo = repo();
        let mut player = PlayerState::new("garden");
        let now = Timestamp::EPOCH;
        let ids: Vec<_> = repo
            .find_eligible(&player, now)
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["explore_a"]);

        player.record_choice("found_key", now);
        let ids: Vec<_> = repo
            .find_eligible(&player, now)
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["explore_a", "explore_c"]);
    }

    #[test]
    fn chapter_respects_min_difficulty() {
        let repo = repo();
        let player = PlayerState::new("garden");
        let chapter = repo
            .chapter_event(&player, Difficulty::Normal, Timestamp::EPOCH)
            .unwrap();
        assert_eq!(chapter.world_event_title, "Moonlit Assembly");
        assert_eq!(chapter.snippets[0].id, "explore_a");
    }

    #[test]
    fn chapter_rotation_prefers_unplayed() {
        let repo = repo();
        let mut player = PlayerState::new("garden");
        player.record_choice(
            "explore_completed_chapter_moonlit_assembly",
            Timestamp::from_millis(10),
        );
        let chapter = repo
            .chapter_event(&player, Difficulty::Hard, Timestamp::from_millis(20))
            .unwrap();
        assert_eq!(chapter.world_event_title, "Storm Front");
    }

    #[test]
    fn broken_chapter_is_skipped() {
        let repo = InMemoryRepository::default()
            .with_chapter(ChapterTemplate::new("Ghost", "").with_snippet("explore_missing"));
        let player = PlayerState::new("garden");
        assert!(repo
            .chapter_event(&player, Difficulty::Expert, Timestamp::EPOCH)
            .is_none());
    }
}
