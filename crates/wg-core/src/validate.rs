//! Consistency checks for authored content.
//!
//! Problems that would make content unplayable are errors. Problems the
//! runtime tolerates (extra consequence entries, effect kinds this build
//! does not know) are warnings.

use std::collections::HashSet;

use crate::chapter::{CHAPTER_COMPLETION_PREFIX, slugify};
use crate::choice::RewardGrant;
use crate::pack::ContentPack;

/// Reward types the built-in managers understand.
const KNOWN_REWARD_KINDS: [&str; 3] = ["seeds", "experience", "item"];

/// A warning or error found during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// The snippet id or chapter title where the issue was found.
    pub source: String,
    /// A human-readable description of the issue.
    pub message: String,
    /// Whether this is an error (true) or a warning (false).
    pub is_error: bool,
}

impl ValidationIssue {
    fn error(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
            is_error: true,
        }
    }

    fn warning(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
            is_error: false,
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = if self.is_error { "error" } else { "warning" };
        write!(f, "{level}: {}: {}", self.source, self.message)
    }
}

/// Validate a content pack. Returns every issue found, errors and warnings
/// interleaved in pack order.
pub fn validate_pack(pack: &ContentPack) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for snippet in &pack.snippets {
        if snippet.id.trim().is_empty() {
            issues.push(ValidationIssue::error(&snippet.title, "snippet id is empty"));
        } else if !seen.insert(snippet.id.as_str()) {
            issues.push(ValidationIssue::error(&snippet.id, "duplicate snippet id"));
        }

        if snippet.completion_tag().starts_with(CHAPTER_COMPLETION_PREFIX) {
            issues.push(ValidationIssue::error(
                &snippet.id,
                "snippet id collides with chapter completion tags; rename it without a 'chapter_' prefix",
            ));
        }

        if snippet.choice_options.is_empty() {
            issues.push(ValidationIssue::warning(&snippet.id, "no choice options"));
        }

        if snippet.consequences.len() > snippet.choice_options.len() {
            issues.push(ValidationIssue::warning(
                &snippet.id,
                format!(
                    "{} consequences for {} options; extra entries are never applied",
                    snippet.consequences.len(),
                    snippet.choice_options.len()
                ),
            ));
        }

        for (index, consequence) in snippet.consequences.iter().enumerate() {
            for grant in &consequence.status_effects {
                if grant.duration_ms < 0 {
                    issues.push(ValidationIssue::error(
                        &snippet.id,
                        format!(
                            "option {index}: status '{}' has negative duration",
                            grant.key
                        ),
                    ));
                }
            }
            for reward in &consequence.rewards {
                if let RewardGrant::Other { kind, .. } = reward {
                    if KNOWN_REWARD_KINDS.contains(&kind.as_str()) {
                        issues.push(ValidationIssue::error(
                            &snippet.id,
                            format!("option {index}: malformed '{kind}' reward"),
                        ));
                    } else {
                        issues.push(ValidationIssue::warning(
                            &snippet.id,
                            format!(
                                "option {index}: reward type '{kind}' is passed on as-is and may be refused"
                            ),
                        ));
                    }
                }
            }
            for kind in consequence.unrecognized_kinds() {
                issues.push(ValidationIssue::warning(
                    &snippet.id,
                    format!("option {index}: unknown effect kind '{kind}' will be ignored"),
                ));
            }
        }
    }

    let mut chapter_slugs = HashSet::new();
    for chapter in &pack.chapters {
        let slug = slugify(&chapter.title);
        if slug.is_empty() {
            issues.push(ValidationIssue::error(
                &chapter.title,
                "chapter title has no letters or digits",
            ));
        } else if !chapter_slugs.insert(slug) {
            issues.push(ValidationIssue::warning(
                &chapter.title,
                "another chapter has the same slug; their history entries will collide",
            ));
        }

        if chapter.snippet_ids.is_empty() {
            issues.push(ValidationIssue::error(&chapter.title, "chapter bundles no snippets"));
        }
        for id in &chapter.snippet_ids {
            if pack.snippet(id).is_none() {
                issues.push(ValidationIssue::error(
                    &chapter.title,
                    format!("unknown snippet '{id}'"),
                ));
            }
        }
    }

    issues
}
