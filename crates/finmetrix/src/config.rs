//! Calculator configuration

use serde::{Deserialize, Serialize};

use crate::backend::Backend;
use crate::error::{ReturnsError, ReturnsResult};
use crate::validation::ValidationPolicy;

pub const ENV_BACKEND: &str = "FINMETRIX_BACKEND";
pub const ENV_VALIDATION: &str = "FINMETRIX_VALIDATION";
pub const ENV_PARALLEL_THRESHOLD: &str = "FINMETRIX_PARALLEL_THRESHOLD";
pub const ENV_PARALLEL_CHUNK_SIZE: &str = "FINMETRIX_PARALLEL_CHUNK_SIZE";

/// Inputs shorter than this never use the parallel kernel by default
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1 << 16;

/// Returns per rayon task in the parallel kernel
pub const DEFAULT_PARALLEL_CHUNK_SIZE: usize = 1 << 13;

/// Configuration for [`crate::TwrCalculator`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwrConfig {
    /// Fixed backend, or `None` to pick one per call (`"auto"` in serialized form)
    #[serde(with = "backend_choice")]
    pub backend: Option<Backend>,

    /// Validation applied before any kernel runs
    pub validation: ValidationPolicy,

    /// Minimum input length for automatic parallel selection
    pub parallel_threshold: usize,

    /// Chunk size for the parallel kernel
    pub parallel_chunk_size: usize,
}

impl Default for TwrConfig {
    fn default() -> Self {
        Self {
            backend: None,
            validation: ValidationPolicy::Finite,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            parallel_chunk_size: DEFAULT_PARALLEL_CHUNK_SIZE,
        }
    }
}

impl TwrConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load defaults overridden by `FINMETRIX_*` environment variables
    ///
    /// `FINMETRIX_BACKEND` accepts `auto` as well as any backend name.
    pub fn from_env() -> ReturnsResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`TwrConfig::from_env`] with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> ReturnsResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_BACKEND) {
            config.backend = parse_backend_choice(&value)?;
        }
        if let Some(value) = lookup(ENV_VALIDATION) {
            config.validation = value.parse()?;
        }
        if let Some(value) = lookup(ENV_PARALLEL_THRESHOLD) {
            config.parallel_threshold = parse_positive(ENV_PARALLEL_THRESHOLD, &value)?;
        }
        if let Some(value) = lookup(ENV_PARALLEL_CHUNK_SIZE) {
            config.parallel_chunk_size = parse_positive(ENV_PARALLEL_CHUNK_SIZE, &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Pick a backend per call
    pub fn with_auto_backend(mut self) -> Self {
        self.backend = None;
        self
    }

    pub fn with_validation(mut self, policy: ValidationPolicy) -> Self {
        self.validation = policy;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn with_parallel_chunk_size(mut self, size: usize) -> Self {
        self.parallel_chunk_size = size;
        self
    }

    /// Check the configuration against the current build
    ///
    /// Applies the same rules whether the config came from the environment,
    /// a deserialized document or the builder methods.
    pub fn validate(&self) -> ReturnsResult<()> {
        if let Some(backend) = self.backend {
            backend.ensure_available()?;
        }
        if self.parallel_threshold == 0 {
            return Err(ReturnsError::InvalidConfig(
                "parallel_threshold must be greater than zero".to_string(),
            ));
        }
        if self.parallel_chunk_size == 0 {
            return Err(ReturnsError::InvalidConfig(
                "parallel_chunk_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// `auto` (or an empty value) means per-call selection
fn parse_backend_choice(value: &str) -> ReturnsResult<Option<Backend>> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "auto" => Ok(None),
        name => name.parse::<Backend>().map(Some),
    }
}

mod backend_choice {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::backend::Backend;

    pub fn serialize<S>(backend: &Option<Backend>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(backend.map_or("auto", |b| b.name()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Backend>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(value) => super::parse_backend_choice(&value).map_err(de::Error::custom),
        }
    }
}

fn parse_positive(key: &str, value: &str) -> ReturnsResult<usize> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ReturnsError::InvalidConfig(format!(
            "{key} must be a positive integer, got '{value}'"
        ))),
    }
}
