//! Usage-allowance resolution for metered subscription portals.
//!
//! Given a portal token, the engine fetches the subscription document, the
//! optional ledger balance and the per-day usage series, classifies the
//! metering regime (credit pool vs. per-message), picks the pricing interval
//! in effect, reconciles the allocation against the ledger and folds the
//! usage series into one immutable [`UsageSnapshot`]. Display surfaces only
//! consume that snapshot; the engine itself holds no state between calls.

pub mod engine;

pub use engine::api::PortalClient;
pub use engine::config::EngineConfig;
pub use engine::credential::extract_token;
pub use engine::error::EngineError;
pub use engine::refresh::RefreshContext;
pub use engine::resolve::BillingMode;
pub use engine::snapshot::{resolve_snapshot, BillingPeriod, UsageSnapshot};
