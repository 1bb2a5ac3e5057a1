//! LLM request orchestration: one bounded, validated model call.
//!
//! The orchestrator resolves the tier's model parameters, shapes history
//! through the token budgeter, executes the call under the retry policy,
//! and validates the reply's shape. It is side-effect-free with respect to
//! persisted state — appending the new turn is the caller's job.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::budget::{estimate_tokens, TokenBudgeter};
use crate::context::ConversationContext;
use crate::error::{FailureKind, TransportFailure};
use crate::quota::Tier;
use crate::retry::RetryPolicy;
use crate::tracker::TokenTracker;
use crate::{ChatRequest, ChatTransport, Role, WireMessage};

pub struct Orchestrator {
    transport: Arc<dyn ChatTransport>,
    budgeter: TokenBudgeter,
    policy: RetryPolicy,
    system_prompt: Option<String>,
    tracker: Mutex<TokenTracker>,
}

impl Orchestrator {
    pub fn new(transport: Arc<dyn ChatTransport>, config: &aura_config::AuraConfig) -> Self {
        Self {
            transport,
            budgeter: TokenBudgeter::new(&config.context, config.models.clone()),
            policy: RetryPolicy::new(&config.retry),
            system_prompt: None,
            tracker: Mutex::new(TokenTracker::new()),
        }
    }

    /// Prepend a system prompt to every request. Its token cost counts
    /// against the history budget like the user prompt does.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn budgeter(&self) -> &TokenBudgeter {
        &self.budgeter
    }

    /// Ask the model one question, with truncated history as context.
    ///
    /// Transport failures are retried per policy; a well-formed transport
    /// reply without usable choice content is a `Validation` failure and is
    /// never retried, since retrying cannot fix a shape error.
    pub async fn generate(
        &self,
        prompt: &str,
        context: Option<&ConversationContext>,
        tier: Tier,
    ) -> Result<String, TransportFailure> {
        let request = self.build_request(prompt, context, tier);
        let model = request.model.clone();
        debug!(model = %model, messages = request.messages.len(), "generating reply");

        let transport = Arc::clone(&self.transport);
        let completion = self
            .policy
            .run(|_attempt, deadline| {
                let request = request.clone();
                let transport = Arc::clone(&transport);
                async move { transport.send_chat(request, deadline).await }
            })
            .await?;

        if let Some(usage) = &completion.usage {
            self.tracker.lock().await.record(&model, usage);
        }

        completion
            .content
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                TransportFailure::new(
                    FailureKind::Validation,
                    "response contained no usable choice content",
                )
            })
    }

    /// Availability probe passthrough; never used on the main path.
    pub async fn is_available(&self) -> bool {
        self.transport.is_available().await
    }

    /// Snapshot of cumulative token usage.
    pub async fn token_usage(&self) -> TokenTracker {
        self.tracker.lock().await.clone()
    }

    fn build_request(
        &self,
        prompt: &str,
        context: Option<&ConversationContext>,
        tier: Tier,
    ) -> ChatRequest {
        let model = self.budgeter.model_for(tier).clone();

        let mut prompt_tokens = estimate_tokens(prompt);
        if let Some(system) = &self.system_prompt {
            prompt_tokens += estimate_tokens(system);
        }
        let budget = self
            .budgeter
            .available_budget(prompt_tokens, model.max_response_tokens);

        let mut messages = Vec::new();
        if let Some(system) = &self.system_prompt {
            messages.push(WireMessage {
                role: Role::System,
                content: system.clone(),
            });
        }
        if let Some(context) = context {
            for message in self.budgeter.truncate_history(context.messages(), budget, tier) {
                messages.push(WireMessage {
                    role: message.role,
                    content: message.content,
                });
            }
        }
        messages.push(WireMessage {
            role: Role::User,
            content: prompt.to_string(),
        });

        ChatRequest {
            model: model.model,
            messages,
            max_response_tokens: model.max_response_tokens,
            temperature: model.temperature,
            top_p: model.top_p,
        }
    }
}
