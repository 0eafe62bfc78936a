//! Read models for the records the account service owns, and the identity
//! keys the panel derives from them.

pub mod client;
pub mod group;
pub mod keys;

pub use client::{Client, ClientStatus};
pub use group::{Group, GroupId, DEFAULT_MULTIPLIER};
pub use keys::{group_key, key_of, split_key, ClientKey, GroupKey, KEY_SEPARATOR};
