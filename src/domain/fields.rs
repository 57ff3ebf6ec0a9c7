use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use time::OffsetDateTime;

use super::model::{DbReferral, DbUser};

/// Minimum elapsed time between successive check-in rewards (6 hours).
pub const CHECK_IN_COOLDOWN_MS: i64 = 6 * 60 * 60 * 1000;
pub const CHECK_IN_REWARD: i64 = 10;
pub const BOOST_REWARD: i64 = 200;

pub fn now_ms() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// Wallet address, lowercased on construction so every comparison and
/// stored value uses the normalized form.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Address(String);

impl Address {
    pub fn inner(&self) -> String {
        self.0.to_owned()
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self(value.to_lowercase())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from(value))
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Referral code chosen by the owner's client. Case-sensitive, immutable
/// after creation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ReferralCode(String);

impl ReferralCode {
    pub fn inner(&self) -> String {
        self.0.to_owned()
    }
}

impl From<String> for ReferralCode {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for ReferralCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct Referral {
    pub code: ReferralCode,
    pub owner: Address,
    pub referred: Vec<Address>,
}

impl Referral {
    pub fn new(code: ReferralCode, owner: Address) -> Self {
        Self {
            code,
            owner,
            referred: Vec::new(),
        }
    }

    pub fn invites(&self) -> i64 {
        self.referred.len() as i64
    }

    pub fn is_owner(&self, address: &Address) -> bool {
        &self.owner == address
    }

    /// Appends the address if not already present. Returns whether the set
    /// changed, so callers can skip the write on a repeat submission.
    pub fn add_referred(&mut self, address: Address) -> bool {
        if self.referred.contains(&address) {
            return false;
        }
        self.referred.push(address);
        true
    }
}

impl From<DbReferral> for Referral {
    fn from(value: DbReferral) -> Self {
        Self {
            code: value.code.into(),
            owner: value.owner.into(),
            referred: value.referred.into_iter().map(Address::from).collect(),
        }
    }
}

pub enum CheckInState {
    Eligible,
    Cooling { remaining_ms: i64 },
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub address: Address,
    pub points: i64,
    pub boosts: i64,
    pub last_check_in: Option<i64>,
    pub last_boost: Option<i64>,
}

impl User {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            points: 0,
            boosts: 0,
            last_check_in: None,
            last_boost: None,
        }
    }

    pub fn check_in_state(&self, now: i64) -> CheckInState {
        match self.last_check_in {
            None => CheckInState::Eligible,
            Some(last) => {
                let elapsed = now - last;
                if elapsed < CHECK_IN_COOLDOWN_MS {
                    CheckInState::Cooling {
                        remaining_ms: CHECK_IN_COOLDOWN_MS - elapsed,
                    }
                } else {
                    CheckInState::Eligible
                }
            }
        }
    }

    pub fn apply_check_in(&mut self, now: i64) {
        self.points += CHECK_IN_REWARD;
        self.last_check_in = Some(now);
    }

    pub fn apply_boost(&mut self, now: i64) {
        self.points += BOOST_REWARD;
        self.boosts += 1;
        self.last_boost = Some(now);
    }
}

impl From<DbUser> for User {
    fn from(value: DbUser) -> Self {
        Self {
            address: value.address.into(),
            points: value.points,
            boosts: value.boosts,
            last_check_in: value.last_check_in,
            last_boost: value.last_boost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_is_lowercased_on_construction() {
        let address = Address::from("0xAbCdEf".to_string());
        assert_eq!(address.inner(), "0xabcdef");
    }

    #[test]
    fn address_deserializes_to_lowercase() {
        let address: Address = serde_json::from_str("\"0xDEF\"").unwrap();
        assert_eq!(address.inner(), "0xdef");
    }

    #[test]
    fn referral_code_keeps_case() {
        let code = ReferralCode::from("RAVEN1".to_string());
        assert_eq!(code.inner(), "RAVEN1");
    }

    #[test]
    fn add_referred_is_idempotent() {
        let mut referral = Referral::new(
            "RAVEN1".to_string().into(),
            Address::from("0xabc".to_string()),
        );
        assert!(referral.add_referred(Address::from("0xDEF".to_string())));
        assert!(!referral.add_referred(Address::from("0xdef".to_string())));
        assert_eq!(referral.invites(), 1);
        assert_eq!(referral.referred[0].inner(), "0xdef");
    }

    #[test]
    fn fresh_user_is_eligible() {
        let user = User::new(Address::from("0xabc".to_string()));
        assert!(matches!(user.check_in_state(0), CheckInState::Eligible));
    }

    #[test]
    fn check_in_state_boundaries() {
        let mut user = User::new(Address::from("0xabc".to_string()));
        user.apply_check_in(1_000);

        match user.check_in_state(1_000 + CHECK_IN_COOLDOWN_MS - 1) {
            CheckInState::Cooling { remaining_ms } => assert_eq!(remaining_ms, 1),
            CheckInState::Eligible => panic!("expected cooling just before the window closes"),
        }
        assert!(matches!(
            user.check_in_state(1_000 + CHECK_IN_COOLDOWN_MS),
            CheckInState::Eligible
        ));
        assert!(matches!(
            user.check_in_state(1_000 + CHECK_IN_COOLDOWN_MS + 1),
            CheckInState::Eligible
        ));
    }

    #[test]
    fn check_in_adds_reward_and_stamps_time() {
        let mut user = User::new(Address::from("0xabc".to_string()));
        user.apply_check_in(42);
        assert_eq!(user.points, CHECK_IN_REWARD);
        assert_eq!(user.last_check_in, Some(42));
        assert_eq!(user.boosts, 0);
    }

    #[test]
    fn boosts_accumulate_without_cooldown() {
        let mut user = User::new(Address::from("0xabc".to_string()));
        for i in 0..3 {
            user.apply_boost(i);
        }
        assert_eq!(user.points, 3 * BOOST_REWARD);
        assert_eq!(user.boosts, 3);
        assert_eq!(user.last_boost, Some(2));
    }
}
