use crate::autofill::service::AutofillService;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum
/// extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Autofill facade. Holds the onboarding data source behind
    /// `Arc<dyn OnboardingDataSource>` so tests can swap in an in-memory
    /// source without a database.
    pub autofill: AutofillService,
}
