//! Dialogue script generation on top of a chat model.

use std::sync::Arc;

use async_trait::async_trait;
use fluent_podcast_domain::{DraftTurn, HostNames, draft_from_dialogue};

use super::{ChatCompletion, ChatMessage, ScriptGenerator};
use crate::error::CollaboratorError;

pub struct LlmScriptGenerator {
    chat: Arc<dyn ChatCompletion>,
    speaking_rate_wpm: f64,
}

impl LlmScriptGenerator {
    pub fn new(chat: Arc<dyn ChatCompletion>, speaking_rate_wpm: f64) -> Self {
        Self {
            chat,
            speaking_rate_wpm,
        }
    }

    pub fn system_prompt(&self, hosts: &HostNames, target_words: usize) -> String {
        let minutes = (target_words as f64 / self.speaking_rate_wpm).max(1.0).round();
        let (a, b) = (&hosts.host, &hosts.co_host);
        format!(
            "You are an expert podcast script writer. Create an engaging, conversational script \
for a {minutes}-minute podcast episode featuring two hosts named {a} and {b}.

The script should:
1. Be based STRICTLY on the research summary provided, with NO additional information
2. Have a natural, engaging dialogue flow between the hosts, alternating speakers
3. Include an introduction, body discussing key points, and conclusion
4. Be approximately {target_words} words total to fit the {minutes}-minute format
5. Format the script as a dialogue with speaker names followed by their lines

Format example:
{a}: Welcome to today's episode where we'll be discussing...
{b}: That's right, and this research is particularly interesting because...

DO NOT add any content that is not directly supported by the summary!"
        )
    }
}

#[async_trait]
impl ScriptGenerator for LlmScriptGenerator {
    async fn compose(
        &self,
        summary: &str,
        hosts: &HostNames,
        target_words: usize,
    ) -> Result<Vec<DraftTurn>, CollaboratorError> {
        let messages = [
            ChatMessage::system(self.system_prompt(hosts, target_words)),
            ChatMessage::user(format!("Research Summary:\n\n{summary}")),
        ];
        let reply = self.chat.complete(&messages).await?;
        let draft = draft_from_dialogue(&reply, hosts);
        if draft.is_empty() {
            return Err(CollaboratorError::Rejected(format!(
                "reply contained no lines for {} or {}",
                hosts.host, hosts.co_host
            )));
        }
        tracing::debug!(turns = draft.len(), target_words, "script drafted");
        Ok(draft)
    }
}
