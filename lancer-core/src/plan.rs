//! The subscription plan table.
//!
//! Prices, bid quotas, and commission rates are fixed per tier. A user with
//! no active subscription is treated as FREE tier.

use serde::{Deserialize, Serialize};

use crate::errors::MarketError;
use crate::types::money::Money;

/// Commission charged on tiers other than ELITE, in basis points.
pub const DEFAULT_COMMISSION_BPS: u32 = 500;

/// ELITE-tier commission, in basis points.
pub const ELITE_COMMISSION_BPS: u32 = 400;

/// Monthly bid allowance for users without an active subscription.
pub const FREE_MONTHLY_BIDS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionPlan {
    Free,
    Growth,
    Pro,
    Elite,
}

impl SubscriptionPlan {
    pub const ALL: [SubscriptionPlan; 4] = [
        SubscriptionPlan::Free,
        SubscriptionPlan::Growth,
        SubscriptionPlan::Pro,
        SubscriptionPlan::Elite,
    ];

    /// Monthly price in minor units.
    pub fn monthly_price(self) -> Money {
        let cents = match self {
            SubscriptionPlan::Free => 0,
            SubscriptionPlan::Growth => 99_900,
            SubscriptionPlan::Pro => 179_900,
            SubscriptionPlan::Elite => 249_900,
        };
        Money::from_cents(cents).unwrap_or(Money::ZERO)
    }

    /// Bids allowed per cycle. `None` means unbounded (ELITE).
    pub fn monthly_bids(self) -> Option<u32> {
        match self {
            SubscriptionPlan::Free => Some(FREE_MONTHLY_BIDS),
            SubscriptionPlan::Growth => Some(50),
            SubscriptionPlan::Pro => Some(120),
            SubscriptionPlan::Elite => None,
        }
    }

    /// Commission withheld at milestone settlement, in basis points.
    pub fn commission_bps(self) -> u32 {
        match self {
            SubscriptionPlan::Elite => ELITE_COMMISSION_BPS,
            _ => DEFAULT_COMMISSION_BPS,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            SubscriptionPlan::Free => "Free",
            SubscriptionPlan::Growth => "Growth",
            SubscriptionPlan::Pro => "Pro",
            SubscriptionPlan::Elite => "Elite",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SubscriptionPlan::Free => "FREE",
            SubscriptionPlan::Growth => "GROWTH",
            SubscriptionPlan::Pro => "PRO",
            SubscriptionPlan::Elite => "ELITE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "FREE" => Some(SubscriptionPlan::Free),
            "GROWTH" => Some(SubscriptionPlan::Growth),
            "PRO" => Some(SubscriptionPlan::Pro),
            "ELITE" => Some(SubscriptionPlan::Elite),
            _ => None,
        }
    }
}

impl std::str::FromStr for SubscriptionPlan {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(&s.to_ascii_uppercase()).ok_or_else(|| MarketError::InvalidPlan {
            name: s.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_table_matches_pricing() {
        assert_eq!(SubscriptionPlan::Free.monthly_price().cents(), 0);
        assert_eq!(SubscriptionPlan::Growth.monthly_price().cents(), 99_900);
        assert_eq!(SubscriptionPlan::Pro.monthly_price().cents(), 179_900);
        assert_eq!(SubscriptionPlan::Elite.monthly_price().cents(), 249_900);
    }

    #[test]
    fn only_elite_gets_reduced_commission() {
        for plan in SubscriptionPlan::ALL {
            let expected = if plan == SubscriptionPlan::Elite { 400 } else { 500 };
            assert_eq!(plan.commission_bps(), expected, "plan {plan:?}");
        }
    }

    #[test]
    fn elite_is_unbounded() {
        assert_eq!(SubscriptionPlan::Free.monthly_bids(), Some(5));
        assert_eq!(SubscriptionPlan::Growth.monthly_bids(), Some(50));
        assert_eq!(SubscriptionPlan::Pro.monthly_bids(), Some(120));
        assert_eq!(SubscriptionPlan::Elite.monthly_bids(), None);
    }

    #[test]
    fn parse_is_case_insensitive_and_typed() {
        assert_eq!("elite".parse::<SubscriptionPlan>().unwrap(), SubscriptionPlan::Elite);
        assert!(matches!(
            "PLATINUM".parse::<SubscriptionPlan>(),
            Err(MarketError::InvalidPlan { .. })
        ));
    }
}
