// Strategy insights: turns a validated autofill payload into a short
// AI-generated read on where the content strategy should focus.
// All LLM calls go through llm_client — no direct API calls here.

pub mod handlers;
pub mod prompts;

use serde::{Deserialize, Serialize};

use crate::autofill::service::AutofillPayload;
use crate::errors::AppError;
use crate::llm_client::LlmClient;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInsights {
    pub summary: String,
    pub priorities: Vec<String>,
    pub risks: Vec<String>,
    pub recommended_focus: String,
}

/// Generates strategy insights from the autofilled field map.
pub async fn generate_strategy_insights(
    payload: &AutofillPayload,
    llm: &LlmClient,
) -> Result<StrategyInsights, AppError> {
    let prompt = prompts::STRATEGY_INSIGHTS_PROMPT_TEMPLATE
        .replace("{fields_json}", &render_fields_block(payload))
        .replace("{freshness}", payload.data_freshness.status_label());

    llm.call_json(&prompt, prompts::STRATEGY_INSIGHTS_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Failed to generate strategy insights: {e}")))
}

/// Renders the field map (values, sources, confidences) as pretty JSON for
/// the prompt. Field entries already carry their provenance, so the model
/// can weigh low-confidence values down.
fn render_fields_block(payload: &AutofillPayload) -> String {
    serde_json::to_string_pretty(&payload.fields).unwrap_or_else(|_| "{}".to_string())
}
