// src/backend/storage/storable.rs
use crate::models::common::MAX_CODE_ID_LEN;
use ic_stable_structures::{storable::Bound, Storable};
use serde::{de::DeserializeOwned, Serialize};
use std::borrow::Cow;

/// Wraps any serde type so it can live in stable memory as CBOR.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cbor<T>(pub T)
where
    T: Serialize + DeserializeOwned;

impl<T> Storable for Cbor<T>
where
    T: Serialize + DeserializeOwned,
{
    fn to_bytes(&self) -> Cow<[u8]> {
        let mut writer = vec![];
        ciborium::ser::into_writer(&self.0, &mut writer)
            .expect("Failed to serialize value to CBOR for stable storage");
        Cow::Owned(writer)
    }

    fn from_bytes(bytes: Cow<[u8]>) -> Self {
        let value: T = ciborium::de::from_reader(bytes.as_ref())
            .expect("Failed to deserialize value from CBOR from stable storage");
        Cbor(value)
    }

    const BOUND: Bound = Bound::Unbounded;
}

/// Stable map key for a code. Stored as raw UTF-8 so keys sort by id.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct CodeKey(pub String);

impl From<&str> for CodeKey {
    fn from(id: &str) -> Self {
        CodeKey(id.to_string())
    }
}

impl Storable for CodeKey {
    fn to_bytes(&self) -> Cow<[u8]> {
        Cow::Borrowed(self.0.as_bytes())
    }

    fn from_bytes(bytes: Cow<[u8]>) -> Self {
        CodeKey(String::from_utf8(bytes.into_owned()).expect("Stored code key is not valid UTF-8"))
    }

    const BOUND: Bound = Bound::Bounded {
        max_size: MAX_CODE_ID_LEN as u32,
        is_fixed_size: false,
    };
}

/// Key of the claimed-at index: newest claim sorts first, ties broken by id.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClaimIndexKey {
    inverted_at: u64,
    pub id: String,
}

impl ClaimIndexKey {
    pub fn new(claimed_at: u64, id: &str) -> Self {
        Self {
            inverted_at: u64::MAX - claimed_at,
            id: id.to_string(),
        }
    }

    pub fn claimed_at(&self) -> u64 {
        u64::MAX - self.inverted_at
    }
}

impl Storable for ClaimIndexKey {
    fn to_bytes(&self) -> Cow<[u8]> {
        let mut bytes = Vec::with_capacity(8 + self.id.len());
        bytes.extend_from_slice(&self.inverted_at.to_be_bytes());
        bytes.extend_from_slice(self.id.as_bytes());
        Cow::Owned(bytes)
    }

    fn from_bytes(bytes: Cow<[u8]>) -> Self {
        let (at, id) = bytes.split_at(8);
        let mut inverted_at = [0u8; 8];
        inverted_at.copy_from_slice(at);
        Self {
            inverted_at: u64::from_be_bytes(inverted_at),
            id: String::from_utf8(id.to_vec()).expect("Stored index id is not valid UTF-8"),
        }
    }

    const BOUND: Bound = Bound::Bounded {
        max_size: 8 + MAX_CODE_ID_LEN as u32,
        is_fixed_size: false,
    };
}
