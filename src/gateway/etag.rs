//! Content ETags
//!
//! A djb2 rolling hash over the object bytes, rendered as lowercase
//! hex. This is a change marker, not an integrity digest: if ETags ever
//! back conditional requests, replace it with a real content hash.

/// Compute the ETag for an object's content.
///
/// Pure function of the bytes: identical content yields an identical
/// ETag regardless of key or write time.
pub fn compute(content: &[u8]) -> String {
    let mut hash: u64 = 5381;
    for &byte in content {
        hash = hash.wrapping_mul(33).wrapping_add(u64::from(byte));
    }
    format!("{hash:08x}")
}
