//! Selection algorithms — which pool index becomes the next current key.
//!
//! Operates on indices so the manager keeps ownership of the credentials.
//! `available` holds the indices of keys still under the quota threshold,
//! in pool order.

use rand::seq::SliceRandom;

/// Next index in pool order after `current`, restricted to `available`.
///
/// Scans at most one full traversal with wraparound, so a disagreeing
/// available set can never loop forever. Returns `current` itself only
/// when it is the sole available index; `None` when nothing is available.
pub fn next_sequential(pool_len: usize, current: usize, available: &[usize]) -> Option<usize> {
    if pool_len == 0 || available.is_empty() {
        return None;
    }
    for step in 1..=pool_len {
        let idx = (current + step) % pool_len;
        if available.contains(&idx) {
            return Some(idx);
        }
    }
    None
}

/// Uniform pick from `available`. May return the current index.
pub fn pick_random(available: &[usize]) -> Option<usize> {
    available.choose(&mut rand::thread_rng()).copied()
}
