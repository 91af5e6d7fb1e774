use std::sync::atomic::{AtomicU64, Ordering};

const PREFIX: &str = "term_";

/// Shared by every prover in the process so that names never collide, even
/// between sessions that talk to the same engine.
static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Draws the next id from the process-wide counter.
///
/// # Returns
///
/// An id no earlier call in this process has returned.
pub fn fresh_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Generates a name for annotating a term, e.g. `term_42`.
pub fn generate_term_name() -> String {
    format!("{}{}", PREFIX, fresh_id())
}
