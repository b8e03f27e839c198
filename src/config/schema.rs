use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::approval::Actor;

/// Engine configuration.
///
/// Example YAML:
/// ```yaml
/// reviewers: [alice, bob]
/// store_path: /var/lib/refund-engine/determinations.json
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Actors allowed to approve or reject review-band determinations
    #[serde(default)]
    pub reviewers: Vec<String>,

    /// Determination record file (default: ~/.config/refund-engine/determinations.json)
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

impl Config {
    pub fn is_reviewer(&self, name: &str) -> bool {
        let name = name.trim();
        self.reviewers.iter().any(|r| r.trim() == name)
    }

    /// Resolve a name into an actor with the capabilities this config grants.
    pub fn actor(&self, name: &str) -> Actor {
        if self.is_reviewer(name) {
            Actor::reviewer(name.trim())
        } else {
            Actor::member(name.trim())
        }
    }
}
