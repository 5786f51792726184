//! Applies a [`Consequence`] to a player snapshot.

use tracing::{debug, warn};
use wg_core::{Consequence, PlayerState, Timestamp};

use crate::rewards::RewardGateway;

/// The outcome of applying a consequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    /// The updated snapshot.
    pub player: PlayerState,
    /// Player-facing lines: statuses gained, rewards granted or refused.
    pub summaries: Vec<String>,
}

/// Turns consequence descriptions into state changes.
///
/// Effect kinds are applied in a fixed order: status effects, then choice
/// tags, then rewards. Kinds the interpreter does not know are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsequenceInterpreter;

impl ConsequenceInterpreter {
    /// Create an interpreter.
    pub fn new() -> Self {
        Self
    }

    /// Apply `consequence` to `player` at `now`.
    ///
    /// Reward refusals do not abort the rest of the consequence; they come
    /// back as a summary line instead.
    pub fn apply(
        &self,
        consequence: &Consequence,
        mut player: PlayerState,
        now: Timestamp,
        rewards: &mut dyn RewardGateway,
    ) -> Applied {
        let mut summaries = Vec::new();

        for grant in &consequence.status_effects {
            let expires_at =
                player.refresh_status(grant.key.as_str(), now.plus_millis(grant.duration_ms));
            summaries.push(format!(
                "Status: {} ({})",
                grant.key,
                format_duration(expires_at.millis_since(now))
            ));
        }

        for tag in &consequence.choice_tags {
            player.record_choice(tag.as_str(), now);
        }

        for reward in &consequence.rewards {
            match rewards.grant(reward) {
                Ok(confirmation) => summaries.push(confirmation),
                Err(e) => {
                    warn!(%reward, error = %e, "reward not granted");
                    summaries.push(format!("Reward not granted: {reward} ({e})"));
                }
            }
        }

        for kind in consequence.unrecognized_kinds() {
            debug!(kind, "ignoring unknown effect kind");
        }

        Applied { player, summaries }
    }
}

/// `3600000` -> `1h`, `90000` -> `90s`, `1800000` -> `30m`.
fn format_duration(millis: i64) -> String {
    const HOUR: i64 = 3_600_000;
    const MINUTE: i64 = 60_000;
    const SECOND: i64 = 1_000;
    if millis != 0 && millis % HOUR == 0 {
        format!("{}h", millis / HOUR)
    } else if millis != 0 && millis % MINUTE == 0 {
        format!("{}m", millis / MINUTE)
    } else if millis % SECOND == 0 {
        format!("{}s", millis / SECOND)
    } else {
        format!("{millis}ms")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::{RewardError, RewardLedger};
    use wg_core::RewardGrant;

    const NOW: Timestamp = Timestamp::from_millis(1_000_000);

    fn apply(consequence: &Consequence, ledger: &mut RewardLedger) -> Applied {
        ConsequenceInterpreter::new().apply(consequence, PlayerState::new("garden"), NOW, ledger)
    }

    #[test]
    fn status_effect_expiry() {
        let applied = apply(
            &Consequence::none().with_status("forest_poise", 3_600_000),
            &mut RewardLedger::new(),
        );
        let status = applied.player.status("forest_poise").unwrap();
        assert_eq!(status.expires_at, Timestamp::from_millis(4_600_000));
        assert_eq!(applied.summaries, vec!["Status: forest_poise (1h)"]);
    }

    #[test]
    fn longer_existing_status_is_kept() {
        let mut player = PlayerState::new("garden");
        player.refresh_status("forest_poise", Timestamp::from_millis(9_000_000));
        let applied = ConsequenceInterpreter::new().apply(
            &Consequence::none().with_status("forest_poise", 60_000),
            player,
            NOW,
            &mut RewardLedger::new(),
        );
        assert_eq!(
            applied.player.status("forest_poise").unwrap().expires_at,
            Timestamp::from_millis(9_000_000)
        );
        assert_eq!(applied.summaries, vec!["Status: forest_poise (8000s)"]);
    }

    #[test]
    fn tags_are_logged_without_summary() {
        let applied = apply(
            &Consequence::none().with_tag("met_beetle"),
            &mut RewardLedger::new(),
        );
        assert!(applied.player.has_choice("met_beetle"));
        assert_eq!(applied.player.last_choice_at("met_beetle"), Some(NOW));
        assert!(applied.summaries.is_empty());
    }

    #[test]
    fn rewards_are_granted_in_order() {
        let mut ledger = RewardLedger::new();
        let applied = apply(
            &Consequence::none()
                .with_reward(RewardGrant::Seeds { amount: 12 })
                .with_reward(RewardGrant::Seeds { amount: -2 }),
            &mut ledger,
        );
        assert_eq!(
            applied.summaries,
            vec!["+12 seeds (12 total)", "-2 seeds (10 total)"]
        );
        assert_eq!(ledger.wallet.seeds(), 10);
    }

    #[test]
    fn refused_reward_is_reported_and_rest_continues() {
        let mut ledger = RewardLedger::new();
        let applied = apply(
            &Consequence::none()
                .with_reward(RewardGrant::Seeds { amount: -5 })
                .with_reward(RewardGrant::Experience {
                    skill: "foraging".into(),
                    amount: 40,
                }),
            &mut ledger,
        );
        let expected_error = RewardError::InsufficientSeeds {
            balance: 0,
            needed: 5,
        };
        assert_eq!(
            applied.summaries,
            vec![
                format!("Reward not granted: -5 seeds ({expected_error})"),
                "+40 foraging XP (40 total)".to_string(),
            ]
        );
    }

    #[test]
    fn unknown_reward_type_is_refused_not_fatal() {
        let consequence: Consequence = serde_json::from_str(
            r#"{"rewards": [
                {"type": "companion_bond", "companion": "newt", "amount": 2},
                {"type": "seeds", "amount": 3}
            ]}"#,
        )
        .unwrap();
        let mut ledger = RewardLedger::new();
        let applied = apply(&consequence, &mut ledger);
        assert_eq!(
            applied.summaries,
            vec![
                "Reward not granted: companion_bond reward (unsupported reward kind 'companion_bond')",
                "+3 seeds (3 total)",
            ]
        );
        assert_eq!(ledger.wallet.seeds(), 3);
    }

    #[test]
    fn unknown_kinds_are_ignored() {
        let consequence: Consequence = serde_json::from_str(
            r#"{"choice_tags": ["waved"], "weather": {"rain": true}}"#,
        )
        .unwrap();
        let applied = apply(&consequence, &mut RewardLedger::new());
        assert!(applied.player.has_choice("waved"));
        assert!(applied.summaries.is_empty());
    }

    #[test]
    fn empty_consequence_changes_nothing() {
        let applied = apply(&Consequence::none(), &mut RewardLedger::new());
        assert_eq!(applied.player, PlayerState::new("garden"));
        assert!(applied.summaries.is_empty());
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(3_600_000), "1h");
        assert_eq!(format_duration(1_800_000), "30m");
        assert_eq!(format_duration(90_000), "90s");
        assert_eq!(format_duration(1_500), "1500ms");
        assert_eq!(format_duration(0), "0s");
    }
}
