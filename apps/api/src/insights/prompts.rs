// LLM prompt constants for the Insights module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// System prompt for strategy insight generation — enforces JSON-only output.
pub const STRATEGY_INSIGHTS_SYSTEM: &str = JSON_ONLY_SYSTEM;

/// Insights prompt template. Replace `{fields_json}` and `{freshness}`
/// before sending.
pub const STRATEGY_INSIGHTS_PROMPT_TEMPLATE: &str = r#"You are reviewing the autofilled content-strategy profile of a business.

Each field below carries a `source` (which onboarding data produced it) and a
`confidence` in [0, 1]. Weigh low-confidence and defaulted values accordingly
and do not present them as established facts. The underlying onboarding data
is {freshness}.

Return a JSON object with this EXACT schema (no extra fields):
{
  "summary": "Two or three sentences describing the strategic position.",
  "priorities": ["The three to five highest-leverage actions, most important first."],
  "risks": ["Gaps or weak data points that could undermine the strategy."],
  "recommended_focus": "The single content theme to invest in first, with a one-sentence reason."
}

STRATEGY FIELDS:
{fields_json}"#;
