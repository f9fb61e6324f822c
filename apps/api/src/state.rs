use std::sync::Arc;

use sqlx::PgPool;

use crate::analysis::enrichment::ProfileEnricher;
use crate::analysis::extractor::SkillExtractor;
use crate::analysis::mentor::MentorAdvisor;
use crate::fetcher::ProfileFetcher;
use crate::llm_client::LanguageModel;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once at startup; every service is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub extractor: SkillExtractor,
    pub enricher: ProfileEnricher,
    pub mentor: MentorAdvisor,
}

impl AppState {
    pub fn new(
        db: PgPool,
        llm: Arc<dyn LanguageModel>,
        fetcher: ProfileFetcher,
        max_tool_rounds: u32,
    ) -> Self {
        let extractor = SkillExtractor::new(llm.clone(), max_tool_rounds);
        Self {
            db,
            enricher: ProfileEnricher::new(fetcher, extractor.clone()),
            extractor,
            mentor: MentorAdvisor::new(llm),
        }
    }
}
