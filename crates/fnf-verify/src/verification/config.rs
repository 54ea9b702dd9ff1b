use serde::{Deserialize, Serialize};

use super::comparison::MatchPolicy;
use super::settlement::SettlementPolicy;

/// Policy dials for the comparison engine and settlement derivation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationConfig {
    pub match_policy: MatchPolicy,
    pub settlement: SettlementPolicy,
}
