//! Webhook signature scheme.
//!
//! The gateway signs the raw request body with HMAC-SHA256 and sends the
//! hex-encoded digest in a header. Verification recomputes the digest over
//! the same raw bytes and compares in constant time; it must run before the
//! body is parsed so a mutated body can never pass with a stale signature.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::domain::foundation::LedgerError;

type HmacSha256 = Hmac<Sha256>;

/// Hex-encodes a digest.
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Computes the hex HMAC-SHA256 signature of a payload.
pub fn compute_signature(secret: &[u8], payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(payload);
    hex_encode(&mac.finalize().into_bytes())
}

/// Verifies a hex signature against the raw payload, in constant time.
pub fn verify_signature(
    secret: &[u8],
    payload: &[u8],
    signature: &str,
) -> Result<(), LedgerError> {
    let expected = compute_signature(secret, payload);
    if expected
        .as_bytes()
        .ct_eq(signature.trim().as_bytes())
        .unwrap_u8()
        != 1
    {
        return Err(LedgerError::Authentication(
            "webhook signature mismatch".to_string(),
        ));
    }
    Ok(())
}
