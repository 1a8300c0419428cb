//! Opaque voice identifier (UUID, slug, etc.).
use serde::{Deserialize, Serialize};

use crate::speaker::Speaker;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct VoiceId(pub String);

impl VoiceId {
    /// Create a new voice identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying identifier string.
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Voice assignment for the two roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostVoices {
    pub host: VoiceId,
    pub co_host: VoiceId,
}

impl Default for HostVoices {
    fn default() -> Self {
        // ElevenLabs stock voices "Adam" and "Rachel".
        Self {
            host: VoiceId::new("pNInz6obpgDQGcFmaJgB"),
            co_host: VoiceId::new("21m00Tcm4TlvDq8ikWAM"),
        }
    }
}

impl HostVoices {
    pub fn voice(&self, speaker: Speaker) -> &VoiceId {
        match speaker {
            Speaker::Host => &self.host,
            Speaker::CoHost => &self.co_host,
        }
    }
}
