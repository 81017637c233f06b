use std::sync::Arc;

use jyotish_common::{ConversationTurn, Result, TurnRole, UserIdentity};
use jyotish_config::GeminiConfig;
use jyotish_kundali::KundaliComposite;
use tracing::{debug, instrument};

use crate::priming::build_priming_pair;
use crate::prompts::ASTROLOGER_SYSTEM_PROMPT;
use crate::providers::{ChatMessage, GeminiProvider, GenerationConfig, LlmProvider, LlmRequest};

/// One chat call's worth of caller state. The priming pair is not part of
/// `conversation`; it is derived from `chart_context` on each call.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub conversation: Vec<ConversationTurn>,
    pub chart_context: Option<KundaliComposite>,
    pub user_identity: Option<UserIdentity>,
}

/// Chart-aware chat on top of an [`LlmProvider`].
pub struct AstrologerChat {
    provider: Arc<dyn LlmProvider>,
    model: String,
    system_prompt: String,
    generation: GenerationConfig,
}

impl AstrologerChat {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            system_prompt: ASTROLOGER_SYSTEM_PROMPT.to_string(),
            generation: GenerationConfig::default(),
        }
    }

    pub fn from_config(config: &GeminiConfig) -> Self {
        Self::new(Arc::new(GeminiProvider::new(config)), config.model.clone())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Assemble the provider request: persona, priming pair (if a chart is
    /// present), then the caller's turns in order.
    pub fn build_request(
        &self,
        conversation: &[ConversationTurn],
        chart: Option<&KundaliComposite>,
        identity: Option<&UserIdentity>,
    ) -> Result<LlmRequest> {
        let mut messages = Vec::with_capacity(conversation.len() + 2);

        if let Some(chart) = chart {
            let (context, greeting) = build_priming_pair(chart, identity)?;
            messages.push(context);
            messages.push(greeting);
        }

        messages.extend(conversation.iter().map(|turn| match turn.role {
            TurnRole::User => ChatMessage::user(turn.content.clone()),
            TurnRole::Assistant => ChatMessage::model(turn.content.clone()),
        }));

        Ok(LlmRequest {
            model: self.model.clone(),
            messages,
            system: Some(self.system_prompt.clone()),
            generation: self.generation,
        })
    }

    #[instrument(skip_all, fields(turns = conversation.len(), chart = chart.is_some()))]
    pub async fn chat(
        &self,
        conversation: &[ConversationTurn],
        chart: Option<&KundaliComposite>,
        identity: Option<&UserIdentity>,
    ) -> Result<String> {
        let request = self.build_request(conversation, chart, identity)?;
        let response = self.provider.complete(&request).await?;
        debug!(
            "reply from {} ({} chars, finish_reason={:?})",
            response.model,
            response.text.len(),
            response.finish_reason
        );
        Ok(response.text)
    }

    pub async fn respond(&self, request: &ChatRequest) -> Result<String> {
        self.chat(
            &request.conversation,
            request.chart_context.as_ref(),
            request.user_identity.as_ref(),
        )
        .await
    }
}
