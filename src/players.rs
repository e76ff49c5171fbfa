// src/players.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::consts::{PLAYER_ALIASES, TRACKED_PLAYERS};

/// The closed set of player ids every analysis is restricted to,
/// plus optional display aliases ("msiebert" → "Matt").
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedPlayers {
    ids: Vec<String>,
    #[serde(default)]
    aliases: BTreeMap<String, String>,
}

impl Default for TrackedPlayers {
    fn default() -> Self {
        Self {
            ids: TRACKED_PLAYERS.iter().map(|s| s.to_string()).collect(),
            aliases: PLAYER_ALIASES
                .iter()
                .map(|(id, name)| (id.to_string(), name.to_string()))
                .collect(),
        }
    }
}

impl TrackedPlayers {
    /// Ids keep their given order (it is the column/legend order downstream).
    /// Duplicates are dropped.
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for id in ids {
            let id = id.into();
            if !out.contains(&id) {
                out.push(id);
            }
        }
        Self { ids: out, aliases: BTreeMap::new() }
    }

    pub fn with_aliases(mut self, aliases: BTreeMap<String, String>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn contains(&self, player: &str) -> bool {
        self.ids.iter().any(|p| p == player)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Alias if one is configured, otherwise the id itself.
    pub fn display_name<'a>(&'a self, player: &'a str) -> &'a str {
        self.aliases.get(player).map(String::as_str).unwrap_or(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_has_four_players_with_aliases() {
        let players = TrackedPlayers::default();
        assert_eq!(players.len(), 4);
        assert!(players.contains("AstroHood"));
        assert!(!players.contains("astrohood"));
        assert_eq!(players.display_name("siebert23"), "Keith");
        assert_eq!(players.display_name("stranger"), "stranger");
    }

    #[test]
    fn new_dedups_and_keeps_order() {
        let players = TrackedPlayers::new(["b", "a", "b"]);
        assert_eq!(players.iter().collect::<Vec<_>>(), vec!["b", "a"]);
    }
}
