// src/backend/models/common.rs
pub type CodeId = String; // Issued code, e.g. "3F9A01BC"
pub type ClaimantId = String; // Minted per claim request, e.g. "User_a1b2c3"

pub type TimestampNs = u64; // Nanoseconds since epoch

/// Longest code id the registry will store or look up.
pub const MAX_CODE_ID_LEN: usize = 64;

/// Returns true if `id` could have been produced by issuance or inserted by an admin.
///
/// Ids are matched case-sensitively, so no normalisation happens here.
pub fn is_well_formed_code_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_CODE_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_issued_and_mixed_case_ids() {
        assert!(is_well_formed_code_id("ABC123"));
        assert!(is_well_formed_code_id("abc-123_X"));
    }

    #[test]
    fn rejects_empty_overlong_and_path_like_ids() {
        assert!(!is_well_formed_code_id(""));
        assert!(!is_well_formed_code_id(&"A".repeat(MAX_CODE_ID_LEN + 1)));
        assert!(!is_well_formed_code_id("../etc"));
        assert!(!is_well_formed_code_id("AB CD"));
        assert!(!is_well_formed_code_id("ÄBC"));
    }
}
