//! # Record Store
//!
//! A single-writer, in-process keyed store of [`User`]s and [`Group`]s
//! (spec §4.1). The PDP and SCIM service depend only on `KeyedStore`'s
//! contract, in keeping with the persistence driver being an external
//! collaborator (spec §1) — this crate is the reference implementation
//! that contract is built against.

pub mod filter;
pub mod store;

use identity_core::model::{Group, User};
use store::{KeyExtractor, KeyedStore};

pub struct UserKey;

impl KeyExtractor<User> for UserKey {
    fn id(record: &User) -> String {
        record.id.clone()
    }

    fn secondary_key(record: &User) -> String {
        record.user_name.to_lowercase()
    }

    fn filterable_attribute() -> &'static str {
        "userName"
    }

    fn normalize(literal: &str) -> String {
        literal.to_lowercase()
    }
}

pub struct GroupKey;

impl KeyExtractor<Group> for GroupKey {
    fn id(record: &Group) -> String {
        record.id.clone()
    }

    fn secondary_key(record: &Group) -> String {
        record.display_name.clone()
    }

    fn filterable_attribute() -> &'static str {
        "displayName"
    }

    fn normalize(literal: &str) -> String {
        literal.to_string()
    }
}

pub type UserStore = KeyedStore<User, UserKey>;
pub type GroupStore = KeyedStore<Group, GroupKey>;

/// The two collections a fresh process starts with; wired together so the
/// gateway and CLI share one handle instead of juggling two Arcs.
#[derive(Default)]
pub struct RecordStore {
    pub users: UserStore,
    pub groups: GroupStore,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}
