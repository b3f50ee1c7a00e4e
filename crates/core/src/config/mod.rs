use std::time::Duration;

use crate::OffPolicy;

/// Top-level configuration for a show run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub player: PlayerConfig,
    /// Pause between loading the track and starting playback. The player
    /// gives no readiness signal, so this fixed delay is all there is.
    pub startup_delay: Duration,
    pub off_policy: OffPolicy,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            startup_delay: Duration::from_secs(1),
            off_policy: OffPolicy::Strict,
        }
    }
}

/// How to launch the external audio player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            program: "mpg123".to_string(),
            args: vec!["-R".to_string()],
        }
    }
}
