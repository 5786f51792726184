//! Playstyle classification and tag mapping.

use wg_core::{PlayStyle, PlaystyleScores};

use crate::config::StyleKeywords;

/// Below this top score there is not enough signal to classify.
pub const MIN_STYLE_SIGNAL: u32 = 10;

/// A runner-up at or above this percentage of the top score means no clear
/// preference.
pub const BALANCED_CLOSENESS_PERCENT: u32 = 80;

/// The player's dominant playstyle.
///
/// Returns `Balanced` when the top counter is below [`MIN_STYLE_SIGNAL`], or
/// when the second-highest counter is at least
/// [`BALANCED_CLOSENESS_PERCENT`] of the top one.
pub fn dominant_style(scores: &PlaystyleScores) -> PlayStyle {
    let mut ranked = scores.counted();
    // Stable sort keeps tie-break order among equal counters.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let (top_style, top) = ranked[0];
    let runner_up = ranked[1].1;

    if top < MIN_STYLE_SIGNAL {
        return PlayStyle::Balanced;
    }
    // runner_up / top >= 80 / 100, kept in integers.
    if u64::from(runner_up) * 100 >= u64::from(top) * u64::from(BALANCED_CLOSENESS_PERCENT) {
        return PlayStyle::Balanced;
    }
    top_style
}

/// Maps a choice tag onto a playstyle counter.
pub trait StyleMapper: Send + Sync {
    /// The style a tag counts towards, if any.
    fn style_for(&self, tag: &str) -> Option<PlayStyle>;
}

/// Maps tags by keyword lists.
#[derive(Debug, Clone, Default)]
pub struct KeywordStyleMapper {
    keywords: StyleKeywords,
}

impl KeywordStyleMapper {
    /// Create a mapper from keyword lists.
    pub fn new(keywords: StyleKeywords) -> Self {
        Self { keywords }
    }

    fn list(&self, style: PlayStyle) -> &[String] {
        match style {
            PlayStyle::Cautious => &self.keywords.cautious,
            PlayStyle::Aggressive => &self.keywords.aggressive,
            PlayStyle::Explorer => &self.keywords.explorer,
            PlayStyle::Hoarder => &self.keywords.hoarder,
            PlayStyle::Social => &self.keywords.social,
            PlayStyle::Balanced => &[],
        }
    }
}

impl StyleMapper for KeywordStyleMapper {
    fn style_for(&self, tag: &str) -> Option<PlayStyle> {
        let lower = tag.to_lowercase();
        let pieces: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|p| !p.is_empty())
            .collect();

        PlayStyle::COUNTED.into_iter().find(|style| {
            self.list(*style)
                .iter()
                .any(|kw| pieces.contains(&kw.as_str()))
        })
    }
}
