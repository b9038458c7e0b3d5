//! Engine settings shared by every front end.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// IANA zone used for calendar days and hour-of-day rules.
    pub timezone: Tz,
    /// Upper bound on evaluation passes per drain of the change-signal queue.
    pub max_passes_per_drain: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            max_passes_per_drain: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"timezone":"America/Chicago"}"#).unwrap();
        assert_eq!(cfg.timezone, chrono_tz::America::Chicago);
        assert_eq!(cfg.max_passes_per_drain, 16);
    }
}
