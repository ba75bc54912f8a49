//! Integration test for the settings-to-context flow.
//!
//! Loads settings from a real TOML file, warms a pool through the
//! context, and checks the counts and event wiring end to end.

use std::collections::HashMap;

use husk::{all_idle, CategorySpec, PollWait, PoolContext, PoolSettings};
use husk_core::Recyclable;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Kind {
    Bullet,
    Goblin,
}

impl Kind {
    const fn name(self) -> &'static str {
        match self {
            Self::Bullet => "bullet",
            Self::Goblin => "enemy:goblin",
        }
    }
}

#[derive(Debug)]
struct Shell {
    live: bool,
}

impl Recyclable for Shell {
    fn is_active(&self) -> bool {
        self.live
    }

    fn terminate(&mut self) -> bool {
        self.live = false;
        true
    }
}

fn temp_settings_path() -> std::path::PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("test_pool_settings_{id}.toml"))
}

fn specs() -> Vec<CategorySpec<Kind, Shell>> {
    [Kind::Bullet, Kind::Goblin]
        .into_iter()
        .map(|kind| CategorySpec::new(kind, kind.name(), |_| Ok(Shell { live: false })))
        .collect()
}

#[test]
fn test_settings_file_drives_warm_up() {
    let path = temp_settings_path();
    std::fs::write(
        &path,
        r#"
        default_warm_up = 6
        spawn_channel_capacity = 32

        [categories]
        "enemy:goblin" = 2
        "#,
    )
    .unwrap();

    let settings = PoolSettings::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let context = PoolContext::initialize(settings, specs()).unwrap();
    assert!(context.pool().is_ready());
    assert_eq!(context.pool().len(&Kind::Bullet), Some(6));
    assert_eq!(context.pool().len(&Kind::Goblin), Some(2));
    assert!(context.pool().spawn_events().is_some());

    context.teardown();
}

#[test]
fn test_missing_settings_file_is_reported() {
    let path = temp_settings_path();
    assert!(PoolSettings::load(&path).is_err());
}

#[test]
fn test_overflow_events_reach_subscribers_through_context() {
    let settings = PoolSettings {
        default_warm_up: 1,
        spawn_channel_capacity: Some(8),
        categories: HashMap::from([("enemy:goblin".to_owned(), 0)]),
    };

    let mut context = PoolContext::initialize(settings, specs()).unwrap();
    let events = context.pool().spawn_events().unwrap();

    // Warm-up count zero: the very first goblin is an overflow spawn.
    let (handle, ()) = context
        .pool_mut()
        .acquire_with(&Kind::Goblin, |shell| shell.live = true)
        .unwrap();

    let drained = events.drain();
    assert_eq!(drained.len(), 1);
    assert_eq!(drained[0].handle, handle);
    assert_eq!(drained[0].pool_len, 1);
}

#[test]
fn test_polled_drain_after_bulk_terminate() {
    let settings = PoolSettings {
        default_warm_up: 4,
        spawn_channel_capacity: None,
        categories: HashMap::new(),
    };

    let mut context = PoolContext::initialize(settings, specs()).unwrap();
    for _ in 0..4 {
        context
            .pool_mut()
            .acquire_with(&Kind::Bullet, |shell| shell.live = true)
            .unwrap();
    }
    assert!(!all_idle(context.pool(), &Kind::Bullet));

    let terminated = context.pool_mut().terminate_active(&Kind::Bullet).unwrap();
    assert_eq!(terminated, 4);

    // A scene-unload wait completes on its first poll once everything
    // is recycled.
    let mut wait = PollWait::new(|| all_idle(context.pool(), &Kind::Bullet));
    assert!(wait.tick());
    assert_eq!(wait.ticks(), 1);
}
