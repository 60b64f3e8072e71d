// src/talents.rs
//! Talent directory: the static group/talent configuration and the derived
//! keyword index used to attribute scraped stream cards to a talent.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Sentinel talent id for cards whose name text matched no keyword.
pub const UNKNOWN_TALENT_ID: &str = "unknown";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Talent {
    pub id: String,
    pub name: String,
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub members: Vec<Talent>,
}

/// Lowercase keyword -> (talent, owning group id), in directory order.
///
/// Resolution scans entries in build order and keyword matching is
/// substring-based, so the outcome is deterministic but order-sensitive.
/// Overlapping keywords across talents are a known limitation of the
/// directory format, not something resolved here.
#[derive(Debug, Clone, Default)]
pub struct TalentIndex {
    entries: Vec<(String, Talent, String)>,
}

impl TalentIndex {
    pub fn build(groups: &[Group]) -> Self {
        let mut entries: Vec<(String, Talent, String)> = Vec::new();
        for group in groups {
            for member in &group.members {
                for keyword in &member.keywords {
                    let key = keyword.to_lowercase();
                    // A shared keyword keeps its original position but the
                    // later-loaded talent wins, same as re-inserting into an
                    // insertion-ordered map.
                    if let Some(slot) = entries.iter_mut().find(|(k, _, _)| *k == key) {
                        slot.1 = member.clone();
                        slot.2 = group.id.clone();
                    } else {
                        entries.push((key, member.clone(), group.id.clone()));
                    }
                }
            }
        }
        Self { entries }
    }

    /// First keyword (in build order) that is a substring of `normalized`.
    /// The caller is expected to pass lowercased, whitespace-collapsed text.
    pub fn resolve(&self, normalized: &str) -> Option<(&Talent, &str)> {
        self.entries
            .iter()
            .find(|(key, _, _)| normalized.contains(key.as_str()))
            .map(|(_, talent, group_id)| (talent, group_id.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Load the talent directory from a JSON document of `Group` records.
/// A missing or malformed directory is fatal to the run; there is no
/// meaningful pipeline without it.
pub fn load_directory(path: &Path) -> Result<(Vec<Group>, TalentIndex)> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading talent directory from {}", path.display()))?;
    let groups: Vec<Group> = serde_json::from_str(&content)
        .with_context(|| format!("parsing talent directory {}", path.display()))?;
    let index = TalentIndex::build(&groups);
    Ok((groups, index))
}
