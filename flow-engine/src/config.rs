//! Engine configuration — §6 of `SPEC_FULL.md`. Plain struct with a
//! `Default` impl and builder-style setters, the same shape as the
//! teacher's `ReactConfig`/`SingleShotConfig`, extended with `from_env`
//! since the run loop's tunables are meant to be read once from the
//! process environment rather than threaded through every call site.

/// Engine-wide tunables, read once at construction.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Run-loop step bound (Invariant I6). A session that would exceed this
    /// many node executions in one `start_session`/`process_input` call is
    /// terminated with `MAX_STEPS_EXCEEDED` instead.
    pub max_steps: u32,
    /// Fallback passed to `ToolService::execute` when a Tool-Call node's own
    /// `timeout` is unset.
    pub default_tool_timeout_ms: u64,
    /// Enables `debug!`-level tracing around dispatch, in addition to the
    /// `info!`/`warn!` spans emitted unconditionally.
    pub debug: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_steps: 100,
            default_tool_timeout_ms: 30_000,
            debug: false,
        }
    }
}

impl EngineConfig {
    /// Read `MAX_STEPS`, `DEFAULT_TOOL_TIMEOUT_MS`, and `DEBUG` from the
    /// process environment, falling back to [`EngineConfig::default`] for
    /// any variable that's unset or fails to parse.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_steps: std::env::var("MAX_STEPS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_steps),
            default_tool_timeout_ms: std::env::var("DEFAULT_TOOL_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_tool_timeout_ms),
            debug: std::env::var("DEBUG")
                .ok()
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.debug),
        }
    }

    /// Set the step bound, builder-style.
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set the default tool-call timeout, builder-style.
    pub fn with_default_tool_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.default_tool_timeout_ms = timeout_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_values() {
        let config = EngineConfig::default();
        assert_eq!(config.max_steps, 100);
        assert_eq!(config.default_tool_timeout_ms, 30_000);
        assert!(!config.debug);
    }

    #[test]
    fn builder_setters_override_defaults() {
        let config = EngineConfig::default()
            .with_max_steps(5)
            .with_default_tool_timeout_ms(1_000);
        assert_eq!(config.max_steps, 5);
        assert_eq!(config.default_tool_timeout_ms, 1_000);
    }
}
