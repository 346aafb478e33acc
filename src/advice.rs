//! Motivational advice from the text-generation service.
//!
//! [`Advisor`] always resolves to displayable text: any failure of the
//! underlying [`MessageSender`] (no API key, network, HTTP status, rate limit,
//! empty body, timeout) is logged and replaced by [`ADVICE_FALLBACK`].

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::campaign::{CampaignState, Progress, sales_needed};
use crate::config::SaleTargetConfig;
use crate::generation::{GenerationError, MessageSender, MessagesRequest};
use crate::ui::format_money;

pub const ADVICE_FALLBACK: &str = "Keep pushing forward. The target is in sight.";

/// The figures the advice is about.
#[derive(Debug, Clone, PartialEq)]
pub struct AdviceRequest {
    pub target: f64,
    pub current: f64,
    pub unit_value: f64,
    pub currency_symbol: String,
}

impl AdviceRequest {
    pub fn from_state(state: &CampaignState) -> Self {
        Self {
            target: state.target_amount,
            current: Progress::of(state).current_amount,
            unit_value: state.unit_value,
            currency_symbol: state.currency_symbol.clone(),
        }
    }
}

/// Builds the single user message sent to the model.
pub fn build_prompt(req: &AdviceRequest) -> String {
    let c = req.currency_symbol.as_str();
    let needed = sales_needed(req.target, req.current, req.unit_value);
    format!(
        "I have a sales target of {target}. Currently, I have reached {current}. \
         Each sale is worth {unit}. I need {needed} more sales. \
         Give me a very short, minimalist, punchy piece of advice (max 20 words) \
         to help me stay focused and reach this target. \
         No emojis, just plain black and white energy.",
        target = format_money(c, req.target),
        current = format_money(c, req.current),
        unit = format_money(c, req.unit_value),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdviceSource {
    Generated,
    Fallback,
}

/// Text ready for display plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advice {
    pub text: String,
    pub source: AdviceSource,
}

impl Advice {
    fn fallback() -> Self {
        Self {
            text: ADVICE_FALLBACK.to_string(),
            source: AdviceSource::Fallback,
        }
    }
}

/// Lifecycle of the advice shown on the dashboard.
///
/// `Idle → Requesting → {Succeeded, FellBack} → Idle`. The phase stays
/// `Requesting` while any request is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdvicePhase {
    #[default]
    Idle,
    Requesting,
    Succeeded,
    FellBack,
}

impl From<AdviceSource> for AdvicePhase {
    fn from(source: AdviceSource) -> Self {
        match source {
            AdviceSource::Generated => AdvicePhase::Succeeded,
            AdviceSource::Fallback => AdvicePhase::FellBack,
        }
    }
}

/// Generation parameters for advice requests.
#[derive(Debug, Clone)]
pub struct AdviceSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl From<&SaleTargetConfig> for AdviceSettings {
    fn from(config: &SaleTargetConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout: config.advice_timeout(),
        }
    }
}

/// Wraps an optional generation client with the guaranteed fallback.
pub struct Advisor<G> {
    client: Option<Arc<G>>,
    settings: AdviceSettings,
}

impl<G> Clone for Advisor<G> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl<G: MessageSender> Advisor<G> {
    pub fn new(client: Option<G>, settings: AdviceSettings) -> Self {
        Self {
            client: client.map(Arc::new),
            settings,
        }
    }

    /// Requests advice; never fails.
    pub async fn request(&self, req: &AdviceRequest) -> Advice {
        match self.generate(req).await {
            Ok(text) => Advice {
                text,
                source: AdviceSource::Generated,
            },
            Err(e) => {
                warn!(error = %e, "advice generation failed, using fallback");
                Advice::fallback()
            }
        }
    }

    /// Convenience form returning only the text.
    pub async fn request_advice(
        &self,
        target: f64,
        current: f64,
        unit_value: f64,
        currency_symbol: &str,
    ) -> String {
        let req = AdviceRequest {
            target,
            current,
            unit_value,
            currency_symbol: currency_symbol.to_string(),
        };
        self.request(&req).await.text
    }

    async fn generate(&self, req: &AdviceRequest) -> Result<String, GenerationError> {
        let client = self.client.as_ref().ok_or(GenerationError::NotConfigured)?;
        let message = MessagesRequest::single_turn(
            self.settings.model.clone(),
            self.settings.max_tokens,
            Some(self.settings.temperature),
            build_prompt(req),
        );

        debug!(model = %message.model, "requesting advice");
        let response = tokio::time::timeout(self.settings.timeout, client.send_message(&message))
            .await
            .map_err(|_| GenerationError::Timeout(self.settings.timeout.as_secs()))??;

        response
            .text()
            .map(str::to_string)
            .ok_or(GenerationError::EmptyResponse)
    }
}
