// src/backend/storage/codes.rs
// Stable registry of issued codes and their claim state.

use crate::error::RedeemError;
use crate::models::{is_well_formed_code_id, ClaimResult, ClaimStamp, CodeRecord, TimestampNs};
use crate::storage::memory::{get_claims_by_time_memory, get_codes_memory, Memory};
use crate::storage::storable::{Cbor, ClaimIndexKey, CodeKey};
use ic_stable_structures::StableBTreeMap;
use std::cell::RefCell;

type StorableCodeRecord = Cbor<CodeRecord>;

thread_local! {
    /// Codes: Key = code id, Value = CodeRecord
    static CODES: RefCell<StableBTreeMap<CodeKey, StorableCodeRecord, Memory>> = RefCell::new(
        StableBTreeMap::init(get_codes_memory())
    );

    /// Claimed codes ordered newest claim first. Kept in step with CODES.
    static CLAIMS_BY_TIME: RefCell<StableBTreeMap<ClaimIndexKey, (), Memory>> = RefCell::new(
        StableBTreeMap::init(get_claims_by_time_memory())
    );
}

/// Inserts a fresh, unclaimed record. Existing records are never overwritten.
pub fn insert_code(record: CodeRecord) -> Result<(), RedeemError> {
    if !is_well_formed_code_id(&record.id) {
        return Err(RedeemError::InvalidInput(format!(
            "Malformed code id: {:?}",
            record.id
        )));
    }
    CODES.with(|map_ref| {
        let mut map = map_ref.borrow_mut();
        let key = CodeKey::from(record.id.as_str());
        if map.contains_key(&key) {
            return Err(RedeemError::DuplicateCode(record.id));
        }
        map.insert(key, Cbor(CodeRecord { claim: None, ..record }));
        Ok(())
    })
}

pub fn get_code(code_id: &str) -> Option<CodeRecord> {
    if !is_well_formed_code_id(code_id) {
        return None;
    }
    CODES.with(|map_ref| map_ref.borrow().get(&CodeKey::from(code_id)).map(|c| c.0))
}

/// Claims `code_id` for `claimant` if, and only if, it is currently unclaimed.
///
/// The lookup and the write happen under one mutable borrow with no await
/// point, so no other message can observe the record in between.
pub fn try_claim(code_id: &str, claimant: &str, claimed_at: TimestampNs) -> ClaimResult {
    if !is_well_formed_code_id(code_id) {
        return ClaimResult::NotFound;
    }
    CODES.with(|map_ref| {
        let mut map = map_ref.borrow_mut();
        let key = CodeKey::from(code_id);
        let Some(Cbor(mut record)) = map.get(&key) else {
            return ClaimResult::NotFound;
        };
        if let Some(existing) = record.claim {
            return ClaimResult::AlreadyClaimed(existing);
        }
        let stamp = ClaimStamp {
            claimed_by: claimant.to_string(),
            claimed_at,
        };
        record.claim = Some(stamp.clone());
        map.insert(key, Cbor(record));
        CLAIMS_BY_TIME.with(|index| {
            index
                .borrow_mut()
                .insert(ClaimIndexKey::new(claimed_at, code_id), ())
        });
        ClaimResult::Claimed(stamp)
    })
}

/// Returns every claimed record to its unclaimed state. Returns how many changed.
pub fn reset_all() -> u64 {
    CODES.with(|map_ref| {
        let mut map = map_ref.borrow_mut();
        let claimed: Vec<(CodeKey, CodeRecord)> = map
            .iter()
            .filter(|(_, value)| value.0.is_claimed())
            .map(|(key, value)| (key, value.0))
            .collect();
        let count = claimed.len() as u64;
        for (key, record) in claimed {
            map.insert(key, Cbor(CodeRecord { claim: None, ..record }));
        }
        CLAIMS_BY_TIME.with(|index| index.borrow_mut().clear_new());
        count
    })
}

/// Rebuilds the claimed-at index from the records when the two disagree.
/// Returns the number of indexed claims.
pub fn rebuild_claim_index() -> u64 {
    CODES.with(|map_ref| {
        CLAIMS_BY_TIME.with(|index_ref| {
            let map = map_ref.borrow();
            let mut index = index_ref.borrow_mut();
            let claimed: Vec<ClaimIndexKey> = map
                .iter()
                .filter_map(|(_, value)| {
                    let record = value.0;
                    record
                        .claimed_at()
                        .map(|at| ClaimIndexKey::new(at, &record.id))
                })
                .collect();
            if claimed.len() as u64 != index.len() {
                index.clear_new();
                for key in &claimed {
                    index.insert(key.clone(), ());
                }
            }
            index.len()
        })
    })
}

pub fn code_count() -> u64 {
    CODES.with(|map_ref| map_ref.borrow().len())
}

/// Page of records for the dashboard: claimed codes first, newest claim on top,
/// then unclaimed codes by id. Returns the page and the total record count.
pub fn list_codes(offset: u64, limit: usize) -> (Vec<CodeRecord>, u64) {
    CODES.with(|map_ref| {
        CLAIMS_BY_TIME.with(|index_ref| {
            let map = map_ref.borrow();
            let index = index_ref.borrow();
            let total = map.len();
            let claimed = index.len();

            let mut page: Vec<CodeRecord> = index
                .iter()
                .skip(offset as usize)
                .take(limit)
                .filter_map(|(key, _)| map.get(&CodeKey(key.id)).map(|value| value.0))
                .collect();

            let remaining = limit.saturating_sub(page.len());
            if remaining > 0 {
                page.extend(
                    map.iter()
                        .map(|(_, value)| value.0)
                        .filter(|record| !record.is_claimed())
                        .skip(offset.saturating_sub(claimed) as usize)
                        .take(remaining),
                );
            }
            (page, total)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(id: &str) {
        insert_code(CodeRecord::new(id.to_string(), 1)).expect("insert");
    }

    #[test]
    fn insert_rejects_duplicates_and_malformed_ids() {
        issue("ABC123");
        assert_eq!(
            insert_code(CodeRecord::new("ABC123".to_string(), 2)),
            Err(RedeemError::DuplicateCode("ABC123".to_string()))
        );
        assert!(matches!(
            insert_code(CodeRecord::new("has space".to_string(), 2)),
            Err(RedeemError::InvalidInput(_))
        ));
        assert_eq!(code_count(), 1);
    }

    #[test]
    fn insert_always_stores_unclaimed_record() {
        let mut record = CodeRecord::new("PRECLAIMED".to_string(), 5);
        record.claim = Some(ClaimStamp {
            claimed_by: "User_000000".to_string(),
            claimed_at: 6,
        });
        insert_code(record).unwrap();
        assert!(!get_code("PRECLAIMED").unwrap().is_claimed());
    }

    #[test]
    fn first_claim_wins_and_later_claims_see_original_stamp() {
        issue("ABC123");
        let first = try_claim("ABC123", "User_aaaaaa", 10);
        let winner = ClaimStamp {
            claimed_by: "User_aaaaaa".to_string(),
            claimed_at: 10,
        };
        assert_eq!(first, ClaimResult::Claimed(winner.clone()));

        for (claimant, at) in [("User_bbbbbb", 11), ("User_cccccc", 12)] {
            assert_eq!(
                try_claim("ABC123", claimant, at),
                ClaimResult::AlreadyClaimed(winner.clone())
            );
        }
        assert_eq!(get_code("ABC123").unwrap().claim, Some(winner));
    }

    #[test]
    fn unknown_and_malformed_ids_are_not_found() {
        assert_eq!(try_claim("NOPE00", "User_aaaaaa", 1), ClaimResult::NotFound);
        assert_eq!(try_claim("", "User_aaaaaa", 1), ClaimResult::NotFound);
        assert_eq!(get_code("NOPE00"), None);
        assert_eq!(code_count(), 0);
    }

    #[test]
    fn ids_are_case_sensitive() {
        issue("ABC123");
        assert_eq!(try_claim("abc123", "User_aaaaaa", 1), ClaimResult::NotFound);
    }

    #[test]
    fn reset_clears_only_claimed_records() {
        issue("R1");
        issue("R2");
        try_claim("R1", "User_aaaaaa", 10);
        assert_eq!(reset_all(), 1);
        let record = get_code("R1").unwrap();
        assert_eq!(record.claim, None);
        assert_eq!(record.created_at, 1);
        assert!(matches!(
            try_claim("R1", "User_bbbbbb", 20),
            ClaimResult::Claimed(ref s) if s.claimed_by == "User_bbbbbb" && s.claimed_at == 20
        ));
    }

    #[test]
    fn listing_puts_latest_claims_first() {
        for id in ["C", "A", "B", "D"] {
            issue(id);
        }
        try_claim("D", "User_000001", 5);
        try_claim("C", "User_000002", 9);

        let (page, total) = list_codes(0, 10);
        let ids: Vec<&str> = page.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(total, 4);
        assert_eq!(ids, vec!["C", "D", "A", "B"]);

        let (page, _) = list_codes(1, 2);
        let ids: Vec<&str> = page.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["D", "A"]);
    }

    #[test]
    fn listing_pages_across_the_claimed_and_unclaimed_boundary() {
        for id in ["E", "A", "C", "B", "D"] {
            issue(id);
        }
        try_claim("C", "User_000001", 3);
        try_claim("E", "User_000002", 7);
        try_claim("A", "User_000003", 7);

        let ids = |offset, limit| -> Vec<String> {
            list_codes(offset, limit).0.into_iter().map(|r| r.id).collect()
        };
        assert_eq!(ids(0, 10), vec!["A", "E", "C", "B", "D"]);
        assert_eq!(ids(2, 2), vec!["C", "B"]);
        assert_eq!(ids(4, 2), vec!["D"]);
        assert!(ids(9, 2).is_empty());

        reset_all();
        assert_eq!(ids(0, 10), vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn claim_index_is_rebuilt_from_records() {
        issue("X1");
        issue("X2");
        try_claim("X2", "User_000001", 4);
        CLAIMS_BY_TIME.with(|index| index.borrow_mut().clear_new());

        assert_eq!(rebuild_claim_index(), 1);
        let (page, _) = list_codes(0, 1);
        assert_eq!(page[0].id, "X2");
        assert_eq!(rebuild_claim_index(), 1);
    }
}
