pub mod analysis;
pub mod app_config;
pub mod config;
pub mod pipeline_config;
pub mod record;
pub mod tags;
pub mod types;

pub use analysis::{summarize_samples, LabelCounts, TagAnalysisResult};
pub use app_config::{AppConfig, Credentials};
pub use config::{load_app_config, load_app_config_from_env};
pub use pipeline_config::{DelayRange, DiscoveryLimits, FallbackRanges, PipelineConfig};
pub use record::{absolute_post_url, AnalysisRecord, PLATFORM, PLATFORM_BASE_URL};
pub use tags::{
    normalize_tag, DiscoverySource, RankedTag, RankingPolicy, TagFrequencyTable, TagObservation,
    DEFAULT_EXCLUDED_TAGS,
};
pub use types::{EngagementCounts, PostSample, RunId, SentimentLabel, SentimentScore};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
