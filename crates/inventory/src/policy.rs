//! Cart quantity limits derived from an availability snapshot.
//!
//! An [`AvailabilityMap`] answers 0 both for "nothing left" and for "not
//! tracked at all". Which reading applies is a caller decision, made explicit
//! here through [`ZeroStockPolicy`].

use serde::{Deserialize, Serialize};

use crate::availability::AvailabilityMap;

/// How a computed maximum of zero is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroStockPolicy {
    /// Zero means stock is not tracked: quantity increases are never blocked.
    #[default]
    Untracked,
    /// Zero means sold out: quantity increases are blocked.
    SoldOut,
    /// Zero on an untracked product/size is unlimited; zero on a tracked one is sold out.
    Distinguish,
}

/// Outcome of checking a cart line against availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum CartDecision {
    /// No limit applies.
    Unlimited,
    /// The line can grow by up to `remaining` more units.
    Allowed { remaining: u64 },
    /// The line already holds every available unit (`max` may be 0).
    AtLimit { max: u64 },
}

impl CartDecision {
    pub fn can_increase(&self) -> bool {
        !matches!(self, CartDecision::AtLimit { .. })
    }
}

/// Cart line limiter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartLimit {
    policy: ZeroStockPolicy,
}

impl CartLimit {
    pub fn new(policy: ZeroStockPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ZeroStockPolicy {
        self.policy
    }

    /// Decide whether a cart line holding `current_qty` units may grow.
    ///
    /// `size == None` checks against the product's total across sizes.
    pub fn evaluate(
        &self,
        availability: &AvailabilityMap,
        name: &str,
        size: Option<&str>,
        current_qty: u64,
    ) -> CartDecision {
        let max = availability.qty_for(name, size);

        if max == 0 {
            let unlimited = match self.policy {
                ZeroStockPolicy::Untracked => true,
                ZeroStockPolicy::SoldOut => false,
                ZeroStockPolicy::Distinguish => match size {
                    Some(size) => !availability.contains(name, size),
                    None => !availability.is_tracked(name),
                },
            };
            return if unlimited {
                CartDecision::Unlimited
            } else {
                CartDecision::AtLimit { max: 0 }
            };
        }

        if current_qty < max {
            CartDecision::Allowed {
                remaining: max - current_qty,
            }
        } else {
            CartDecision::AtLimit { max }
        }
    }
}
