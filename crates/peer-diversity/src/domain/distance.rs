//! Common prefix length between node identifiers.

use crate::domain::NodeId;

/// Number of leading bits shared by `a` and `b`.
///
/// # Properties
/// - Symmetric: `common_prefix_len(a, b) == common_prefix_len(b, a)`
/// - Self is 256: identical IDs share every bit
/// - Equals the index of the first differing bit otherwise
#[inline]
pub fn common_prefix_len(a: &NodeId, b: &NodeId) -> u32 {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    for i in 0..32 {
        let xor = a_bytes[i] ^ b_bytes[i];
        if xor != 0 {
            return (i as u32) * 8 + xor.leading_zeros();
        }
    }

    256
}
