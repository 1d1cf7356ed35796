#![forbid(unsafe_code)]

//! Binding configuration.
//!
//! Defaults can be overridden from the environment. Lookups go through a
//! closure so tests can supply their own environment. Unparsable values are
//! ignored and the default is kept.

use crate::reconcile::DEFAULT_MAX_SHIFTING_SPLICES;

/// Environment variable selecting the recompute mode (`immediate` or `deferred`).
const ENV_RECOMPUTE: &str = "DESTLIST_RECOMPUTE";
/// Environment variable overriding the in-place splice threshold.
const ENV_MAX_SHIFTING_SPLICES: &str = "DESTLIST_MAX_SHIFTING_SPLICES";

/// When a binding runs its recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecomputeMode {
    /// Changes are coalesced until the host calls `flush`.
    #[default]
    Deferred,
    /// Every change recomputes synchronously.
    Immediate,
}

impl RecomputeMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "deferred" | "defer" | "coalesce" => Some(Self::Deferred),
            "immediate" | "sync" | "eager" => Some(Self::Immediate),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deferred => "deferred",
            Self::Immediate => "immediate",
        }
    }
}

/// Configuration of a reactive list binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingConfig {
    /// When recomputes run.
    pub recompute: RecomputeMode,
    /// Size-changing splices applied in place before a linear rewrite.
    pub max_shifting_splices: usize,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            recompute: RecomputeMode::default(),
            max_shifting_splices: DEFAULT_MAX_SHIFTING_SPLICES,
        }
    }
}

impl BindingConfig {
    /// Defaults overridden by the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by a custom environment lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = get_env(ENV_RECOMPUTE) {
            match RecomputeMode::parse(&value) {
                Some(mode) => config.recompute = mode,
                None => {
                    crate::warn!(
                        variable = ENV_RECOMPUTE,
                        value = %value,
                        "ignoring unknown recompute mode"
                    );
                }
            }
        }

        if let Some(value) = get_env(ENV_MAX_SHIFTING_SPLICES) {
            match value.trim().parse::<usize>() {
                Ok(max) => config.max_shifting_splices = max,
                Err(_err) => {
                    crate::warn!(
                        variable = ENV_MAX_SHIFTING_SPLICES,
                        value = %value,
                        error = %_err,
                        "ignoring invalid splice threshold"
                    );
                }
            }
        }

        config
    }

    /// Set the recompute mode.
    #[must_use]
    pub fn with_recompute(mut self, mode: RecomputeMode) -> Self {
        self.recompute = mode;
        self
    }

    /// Set the in-place splice threshold.
    #[must_use]
    pub fn with_max_shifting_splices(mut self, max: usize) -> Self {
        self.max_shifting_splices = max;
        self
    }

    /// Serialize to JSON (for diagnostics logs).
    #[must_use]
    pub fn to_json(&self) -> String {
        format!(
            r#"{{"recompute":"{}","max_shifting_splices":{}}}"#,
            self.recompute.as_str(),
            self.max_shifting_splices
        )
    }
}
