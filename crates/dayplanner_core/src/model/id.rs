//! Task identifier generation.
//!
//! # Responsibility
//! - Produce a fresh, practically collision-free id for every new task.
//!
//! # Invariants
//! - Generation never fails and never panics.
//! - Every id has the hyphenated UUID v4 shape
//!   (`xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx`, `y` in `8..=b`), whether it
//!   came from the OS entropy source or from the seeded fallback.

use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::{Builder, Uuid};

/// Opaque task identifier in its persisted string form.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = String;

static FALLBACK_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Returns a new task id.
///
/// Uses OS entropy when available and falls back to a time-seeded PRNG
/// otherwise.
pub fn new_task_id() -> TaskId {
    let mut bytes = [0u8; 16];
    match OsRng.try_fill_bytes(&mut bytes) {
        Ok(()) => format_v4(bytes),
        Err(err) => {
            log::warn!("event=task_id_fallback module=model status=degraded error={err}");
            fallback_task_id()
        }
    }
}

pub(crate) fn fallback_task_id() -> TaskId {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default();
    let sequence = FALLBACK_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let seed = nanos
        ^ sequence.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ u64::from(std::process::id()).rotate_left(32);

    let mut bytes = [0u8; 16];
    StdRng::seed_from_u64(seed).fill_bytes(&mut bytes);
    format_v4(bytes)
}

fn format_v4(bytes: [u8; 16]) -> TaskId {
    // Builder stamps the version nibble (4) and the RFC 4122 variant bits.
    let uuid: Uuid = Builder::from_random_bytes(bytes).into_uuid();
    uuid.hyphenated().to_string()
}

#[cfg(test)]
mod tests {
    use super::{fallback_task_id, new_task_id};
    use std::collections::HashSet;
    use uuid::{Uuid, Variant};

    fn assert_v4_shape(id: &str) {
        assert_eq!(id.len(), 36, "unexpected id length: {id}");
        let groups: Vec<&str> = id.split('-').collect();
        assert_eq!(
            groups.iter().map(|group| group.len()).collect::<Vec<_>>(),
            vec![8, 4, 4, 4, 12]
        );
        assert!(groups[2].starts_with('4'));
        assert!(matches!(groups[3].chars().next(), Some('8' | '9' | 'a' | 'b')));

        let parsed = Uuid::parse_str(id).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
        assert_eq!(parsed.get_variant(), Variant::RFC4122);
    }

    #[test]
    fn new_ids_have_uuid_v4_shape() {
        assert_v4_shape(&new_task_id());
    }

    #[test]
    fn fallback_ids_keep_the_same_shape() {
        assert_v4_shape(&fallback_task_id());
    }

    #[test]
    fn ids_do_not_repeat() {
        let primary: HashSet<_> = (0..500).map(|_| new_task_id()).collect();
        assert_eq!(primary.len(), 500);

        let fallback: HashSet<_> = (0..500).map(|_| fallback_task_id()).collect();
        assert_eq!(fallback.len(), 500);
    }
}
