use crate::domain::fields::{Address, Referral, ReferralCode, User};
use tokio::sync::RwLock;

/// In-memory backend. Records live in plain vectors so listing preserves
/// insertion order, which is what keeps leaderboard tie-breaks stable.
#[derive(Default)]
pub struct MemoryStore {
    referrals: RwLock<Vec<Referral>>,
    users: RwLock<Vec<User>>,
}

impl MemoryStore {
    pub async fn referral_by_code(&self, code: &ReferralCode) -> Option<Referral> {
        self.referrals
            .read()
            .await
            .iter()
            .find(|r| &r.code == code)
            .cloned()
    }

    pub async fn referral_by_owner(&self, owner: &Address) -> Option<Referral> {
        self.referrals
            .read()
            .await
            .iter()
            .find(|r| &r.owner == owner)
            .cloned()
    }

    pub async fn referral_list(&self) -> Vec<Referral> {
        self.referrals.read().await.clone()
    }

    pub async fn referral_upsert(&self, referral: &Referral) {
        let mut referrals = self.referrals.write().await;
        match referrals.iter_mut().find(|r| r.code == referral.code) {
            Some(existing) => *existing = referral.clone(),
            None => referrals.push(referral.clone()),
        }
    }

    pub async fn user_by_address(&self, address: &Address) -> Option<User> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| &u.address == address)
            .cloned()
    }

    pub async fn user_list(&self) -> Vec<User> {
        self.users.read().await.clone()
    }

    pub async fn user_upsert(&self, user: &User) {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.address == user.address) {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }
    }
}
