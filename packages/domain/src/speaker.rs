//! The two fixed podcast roles and their display names.

use serde::{Deserialize, Serialize};

/// Speaker role in a two-host script.
///
/// Names and voices live in configuration. The role set itself is closed so
/// that turn alternation can be checked structurally instead of by comparing
/// free-form labels.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// Opens the episode and leads the discussion.
    #[display("host")]
    Host,
    /// Second voice in the conversation.
    #[display("co-host")]
    CoHost,
}

impl Speaker {
    /// Both roles, in speaking order.
    pub const ALL: [Speaker; 2] = [Speaker::Host, Speaker::CoHost];

    /// The role that is expected to answer this one.
    pub const fn other(self) -> Self {
        match self {
            Speaker::Host => Speaker::CoHost,
            Speaker::CoHost => Speaker::Host,
        }
    }
}

/// Display names used when prompting for and rendering a dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostNames {
    pub host: String,
    pub co_host: String,
}

impl Default for HostNames {
    fn default() -> Self {
        Self {
            host: "Alex".to_string(),
            co_host: "Sam".to_string(),
        }
    }
}

impl HostNames {
    pub fn new(host: impl Into<String>, co_host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            co_host: co_host.into(),
        }
    }

    /// Display name for a role.
    pub fn name(&self, speaker: Speaker) -> &str {
        match speaker {
            Speaker::Host => &self.host,
            Speaker::CoHost => &self.co_host,
        }
    }

    /// Map a dialogue label such as `Alex` or `**Sam**` back to its role.
    ///
    /// Matching ignores case, surrounding whitespace and markdown emphasis.
    pub fn resolve(&self, label: &str) -> Option<Speaker> {
        let label = label.trim().trim_matches(|c| c == '*' || c == '_').trim();
        Speaker::ALL
            .into_iter()
            .find(|speaker| self.name(*speaker).eq_ignore_ascii_case(label))
    }
}
