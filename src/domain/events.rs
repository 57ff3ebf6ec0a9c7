use super::fields::{Address, Referral, ReferralCode, User};
use serde::Serialize;

#[derive(Serialize, Clone)]
pub struct ReferralRecordedEvent {
    pub code: ReferralCode,
    pub referred: Address,
}

#[derive(Serialize, Clone)]
#[serde(tag = "type", content = "data")]
pub enum AppEvent {
    CodeCreated(Referral),
    ReferralRecorded(ReferralRecordedEvent),
    CheckIn(User),
    Boost(User),
}
