//! Concurrency test for the mutex-guarded pool wrapper.
//!
//! Worker threads hammer one shared pool with acquire-and-activate
//! claims; because each claim happens under the lock, no two claims may
//! ever land on the same slot.

use std::collections::HashSet;
use std::thread;

use husk_core::{EntityPool, Recyclable, SharedPool};

struct Slot {
    live: bool,
}

impl Recyclable for Slot {
    fn is_active(&self) -> bool {
        self.live
    }

    fn terminate(&mut self) -> bool {
        self.live = false;
        true
    }
}

const THREADS: usize = 4;
const CLAIMS_PER_THREAD: usize = 16;

#[test]
fn test_concurrent_claims_never_share_a_slot() {
    let mut pool = EntityPool::builder()
        .category("slot", 8, |_| Ok(Slot { live: false }))
        .build();
    pool.warm_up().unwrap();
    let shared = SharedPool::new(pool);

    let workers: Vec<_> = (0..THREADS)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                let mut claimed = Vec::with_capacity(CLAIMS_PER_THREAD);
                for _ in 0..CLAIMS_PER_THREAD {
                    let (handle, ()) = shared
                        .acquire_with(&"slot", |slot| slot.live = true)
                        .unwrap();
                    claimed.push(handle);
                }
                claimed
            })
        })
        .collect();

    let mut all = Vec::new();
    for worker in workers {
        all.extend(worker.join().unwrap());
    }

    // Nothing was released, so every claim must be a distinct slot.
    let unique: HashSet<_> = all.iter().copied().collect();
    assert_eq!(unique.len(), THREADS * CLAIMS_PER_THREAD);
    assert_eq!(
        shared.with(|p| p.active_count(&"slot")),
        Some(THREADS * CLAIMS_PER_THREAD)
    );
    assert_eq!(
        shared.with(|p| p.len(&"slot")),
        Some(THREADS * CLAIMS_PER_THREAD)
    );

    // One bulk terminate recycles the whole arena.
    assert_eq!(
        shared.terminate_active(&"slot").unwrap(),
        THREADS * CLAIMS_PER_THREAD
    );
    assert_eq!(shared.with(|p| p.active_count(&"slot")), Some(0));
}
