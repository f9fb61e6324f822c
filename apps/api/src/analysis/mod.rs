//! Profile analysis: skill extraction, enrichment orchestration and mentoring.
//!
//! ```text
//! EnrichmentRequest ─▶ ProfileEnricher ─▶ ProfileFetcher (scrape, repos)
//!                              │
//!                              ▼
//!                       SkillExtractor ─▶ LanguageModel (+ tools)
//!                              │
//!                              ▼
//!                      StructuredProfile
//! ```

pub mod enrichment;
pub mod error;
pub mod extractor;
pub mod handlers;
pub mod mentor;
pub mod models;
pub mod prompts;
