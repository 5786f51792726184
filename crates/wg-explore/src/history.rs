//! Session history and export.

use serde::{Deserialize, Serialize};

/// One resolved encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExploreHistoryEntry {
    /// Snippet id, or `chapter:<slug>`.
    pub snippet_id: String,
    /// Title shown at the time.
    pub title: String,
    /// What the player chose, if the choice was valid.
    pub choice_summary: Option<String>,
    /// The autosave tag written for this resolution.
    pub autosave_tag: String,
}

/// Resolved encounters in resolution order. Append-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExploreHistory {
    entries: Vec<ExploreHistoryEntry>,
}

impl ExploreHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&mut self, entry: ExploreHistoryEntry) {
        self.entries.push(entry);
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[ExploreHistoryEntry] {
        &self.entries
    }

    /// The newest `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> &[ExploreHistoryEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been resolved yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Export as markdown.
    pub fn export_markdown(&self) -> String {
        let mut out = String::from("# Exploration Log\n\n");
        for (i, entry) in self.entries.iter().enumerate() {
            out.push_str(&format!("## {}. {}\n\n", i + 1, entry.title));
            match &entry.choice_summary {
                Some(choice) => out.push_str(&format!("**Choice**: {choice}\n")),
                None => out.push_str("**Choice**: *(none)*\n"),
            }
            out.push_str(&format!("*{}* `{}`\n\n", entry.snippet_id, entry.autosave_tag));
        }
        out
    }

    /// Export as plain text.
    pub fn export_text(&self) -> String {
        let mut out = String::from("=== Exploration Log ===\n\n");
        for (i, entry) in self.entries.iter().enumerate() {
            out.push_str(&format!("{}. {} [{}]\n", i + 1, entry.title, entry.snippet_id));
            if let Some(choice) = &entry.choice_summary {
                out.push_str(&format!("   Choice: {choice}\n"));
            }
        }
        out
    }
}
