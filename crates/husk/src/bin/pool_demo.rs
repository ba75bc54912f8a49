//! # Pool Demo
//!
//! Drives one entity pool through its whole life: settings load,
//! warm-up, steady recycling, overflow growth, bulk termination, and a
//! polled drain - the same sequence a scene runs from load to unload.
//!
//! Run with: `cargo run --package husk --bin pool_demo`

use husk::{all_idle, CategorySpec, PollWait, PoolContext, PoolSettings};
use husk_core::Recyclable;

/// Entity categories in the demo arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Kind {
    /// Short-lived projectile, fired every tick.
    Bullet,
    /// Long-lived area effect, fired occasionally.
    Burst,
}

/// One pooled arena entity with a tick-based lifetime.
#[derive(Debug)]
struct Mote {
    live: bool,
    ttl: u32,
}

impl Mote {
    fn dormant() -> Self {
        Self { live: false, ttl: 0 }
    }

    /// Configure-then-activate, in that order.
    fn ignite(&mut self, ttl: u32) {
        self.ttl = ttl;
        self.live = true;
    }

    /// The consumer's own lifecycle: burn down, deactivate at zero.
    fn step(&mut self) {
        if self.live {
            self.ttl -= 1;
            if self.ttl == 0 {
                self.live = false;
            }
        }
    }
}

impl Recyclable for Mote {
    fn is_active(&self) -> bool {
        self.live
    }

    fn terminate(&mut self) -> bool {
        self.live = false;
        self.ttl = 0;
        true
    }
}

/// Settings a deployment would load from disk.
const SETTINGS: &str = r#"
default_warm_up = 8
spawn_channel_capacity = 64

[categories]
burst = 2
"#;

const TICKS: u32 = 120;
const BULLETS_PER_TICK: usize = 3;

fn main() {
    let settings = PoolSettings::from_toml_str(SETTINGS).expect("embedded settings parse");

    let mut context = PoolContext::initialize(
        settings,
        vec![
            CategorySpec::new(Kind::Bullet, "bullet", |_| Ok(Mote::dormant())),
            CategorySpec::new(Kind::Burst, "burst", |_| Ok(Mote::dormant())),
        ],
    )
    .expect("warm-up");

    let spawn_events = context.pool().spawn_events().expect("events enabled");
    let readiness = context.pool().readiness();
    assert!(readiness.is_ready());

    println!("=== Pool Demo: warm-up ===");
    println!(
        "bullets warmed: {:?}, bursts warmed: {:?}",
        context.pool().len(&Kind::Bullet),
        context.pool().len(&Kind::Burst)
    );

    // =========================================================================
    // STEP 1: Steady-state spawning with consumer-side expiry
    // =========================================================================
    let mut fired = 0usize;
    for tick in 0..TICKS {
        for _ in 0..BULLETS_PER_TICK {
            let result = context
                .pool_mut()
                .acquire_with(&Kind::Bullet, |mote| mote.ignite(4));
            match result {
                Ok(_) => fired += 1,
                Err(err) => println!("bullet skipped this tick: {err}"),
            }
        }
        if tick % 10 == 0 {
            if let Err(err) = context
                .pool_mut()
                .acquire_with(&Kind::Burst, |mote| mote.ignite(25))
            {
                println!("burst skipped this tick: {err}");
            }
        }

        for kind in [Kind::Bullet, Kind::Burst] {
            for mote in context.pool_mut().iter_mut(&kind) {
                mote.step();
            }
        }
    }

    let growth = spawn_events.drain();
    println!("\n=== Pool Demo: after {TICKS} ticks ===");
    println!("shots fired: {fired}");
    println!(
        "bullet pool: {:?} (active {:?}), burst pool: {:?} (active {:?})",
        context.pool().len(&Kind::Bullet),
        context.pool().active_count(&Kind::Bullet),
        context.pool().len(&Kind::Burst),
        context.pool().active_count(&Kind::Burst)
    );
    println!("overflow constructions observed: {}", growth.len());
    for event in &growth {
        println!(
            "  grew {:?} to {} entities (slot {})",
            event.handle.category(),
            event.pool_len,
            event.handle.slot()
        );
    }

    // =========================================================================
    // STEP 2: Scene teardown - kill bullets, drain bursts, poll for idle
    // =========================================================================
    let killed = context
        .pool_mut()
        .terminate_active(&Kind::Bullet)
        .expect("bulk terminate");
    println!("\n=== Pool Demo: teardown ===");
    println!("bullets terminated: {killed}");

    // Bursts burn out on their own; the scene polls them down through
    // the shared wrapper, one evaluation per simulated tick.
    let shared = context.into_shared();
    let mut idle_wait = PollWait::new({
        let shared = shared.clone();
        move || shared.with(|pool| all_idle(pool, &Kind::Burst))
    });
    while !idle_wait.tick() {
        shared.with(|pool| {
            for mote in pool.iter_mut(&Kind::Burst) {
                mote.step();
            }
        });
    }
    println!("bursts idle after {} polled ticks", idle_wait.ticks());
    println!("done");
}
