use serde::{Deserialize, Serialize};

/// Engine configuration. The numeric fields encode business policy (plan
/// defaults) that changes independently of the resolution algorithm, so they
/// are named and overridable instead of buried as literals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub portal_base_url: String,
    /// Allowance substituted when a credit-pool subscription resolves no allocation.
    #[serde(default = "defaults::credit_pool_total")]
    pub default_credit_pool_total: f64,
    /// Allowance substituted when a per-message subscription resolves no allocation.
    #[serde(default = "defaults::per_message_total")]
    pub default_per_message_total: f64,
    /// Floor applied when a ledger-driven total would come out as zero.
    #[serde(default = "defaults::ledger_fallback_total")]
    pub ledger_fallback_total: f64,
}

mod defaults {
    pub fn credit_pool_total() -> f64 {
        4000.0
    }

    pub fn per_message_total() -> f64 {
        50.0
    }

    pub fn ledger_fallback_total() -> f64 {
        600.0
    }
}

impl EngineConfig {
    pub fn default_config() -> Self {
        Self {
            portal_base_url: "https://portal.withorb.com/api/v1".to_string(),
            default_credit_pool_total: defaults::credit_pool_total(),
            default_per_message_total: defaults::per_message_total(),
            ledger_fallback_total: defaults::ledger_fallback_total(),
        }
    }
}
