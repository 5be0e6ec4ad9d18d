use base64::Engine;
use rand::RngCore;

use crate::constants::SEQUENCE_ID_BYTES;

/// Generate a short URL-safe random identifier for a new sequence.
///
/// Uniqueness is not checked up front; the primary-key constraint catches a
/// collision at insert time and the creation fails. At 64 random bits that is
/// an accepted risk, not a retry case.
pub fn generate_sequence_id() -> String {
    let mut bytes = [0u8; SEQUENCE_ID_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
