//! Subscription storage contract.
//!
//! A subscription is a `(user, schedule owner)` pair; the owner id is the
//! group or professor name. The store behaves as one logical document with
//! read-modify-write updates: concurrent mutations may lose one of the
//! writes (last write wins), but the idempotence check keeps a pair from
//! ever appearing twice. Documented weak consistency, acceptable at this
//! scale.

mod json_store;

pub use json_store::JsonSubscriptionStore;

use crate::error::StoreError;

/// Chat/user identifier of the transport.
pub type UserId = u64;

pub trait SubscriptionStore: Send + Sync {
    /// Add a subscription. Returns `true` iff the pair did not already
    /// exist; re-subscribing is a no-op returning `false`.
    fn subscribe(&self, user: UserId, owner_id: &str) -> Result<bool, StoreError>;

    /// Remove a subscription. Returns `true` iff the pair existed.
    fn unsubscribe(&self, user: UserId, owner_id: &str) -> Result<bool, StoreError>;

    /// Owner ids `user` is subscribed to.
    fn subscriptions(&self, user: UserId) -> Result<Vec<String>, StoreError>;

    /// Users subscribed to `owner_id`.
    fn subscribers(&self, owner_id: &str) -> Result<Vec<UserId>, StoreError>;
}
