use cucumber::{given, then, when};
use futures::executor::{block_on, LocalPool};
use futures::task::LocalSpawnExt;
use h5p_embed_core::application::{MountState, PlayerMount};
use h5p_embed_core::{MountConfig, MountError};
use h5p_embed_tests::{EmbedWorld, FixedProbe, RecordingContainer, ScriptedHost};
use std::cell::RefCell;
use std::rc::Rc;

type TestMount = PlayerMount<RecordingContainer, FixedProbe, ScriptedHost>;

fn mount(world: &EmbedWorld) -> TestMount {
    PlayerMount::new(world.container(), world.probe(), world.loader())
        .with_config(MountConfig { settle_delay_ms: 0 })
}

fn state_name(state: &MountState) -> &'static str {
    match state {
        MountState::Idle => "idle",
        MountState::ProbingContent => "probing",
        MountState::LoadingRuntime => "loading",
        MountState::Constructing => "constructing",
        MountState::Ready => "ready",
        MountState::Failed(_) => "failed",
        MountState::Disposed => "disposed",
    }
}

/// Spawn a load and collect its final state into `outcomes`
fn spawn_load(
    pool: &LocalPool,
    mount: &TestMount,
    path: &str,
    outcomes: &Rc<RefCell<Vec<(String, MountState)>>>,
) {
    let run = mount.load(path);
    let outcomes = outcomes.clone();
    let path = path.to_string();
    pool.spawner()
        .spawn_local(async move {
            let state = run.await;
            outcomes.borrow_mut().push((path, state));
        })
        .expect("spawn mount run");
}

// ===== Given Steps =====

#[given(expr = "content exists at {string}")]
fn content_exists(world: &mut EmbedWorld, path: String) {
    world.existing_content.insert(path);
}

#[given("the player constructor is missing")]
fn constructor_missing(world: &mut EmbedWorld) {
    world.constructor_missing = true;
}

// ===== When Steps =====

#[when(expr = "the player mounts {string}")]
fn player_mounts(world: &mut EmbedWorld, path: String) {
    let mount = mount(world);
    let state = block_on(mount.load(path.as_str()));
    world.mount_outcomes.push((path, state.clone()));
    world.final_state = Some(mount.state());
}

#[when(expr = "the player mounts {string} and switches to {string} while the runtime loads")]
fn player_switches(world: &mut EmbedWorld, first: String, second: String) {
    world.host_script.hold_sleeps = true;
    let mount = mount(world);
    let outcomes = Rc::new(RefCell::new(Vec::new()));
    let mut pool = LocalPool::new();

    spawn_load(&pool, &mount, &first, &outcomes);
    pool.run_until_stalled();
    assert_eq!(mount.state(), MountState::LoadingRuntime);

    spawn_load(&pool, &mount, &second, &outcomes);
    pool.run_until_stalled();
    mount.loader().host().release_sleeps();
    pool.run();

    world.mount_outcomes = outcomes.take();
    world.final_state = Some(mount.state());
}

#[when(expr = "the player mounting {string} is disposed while the runtime loads")]
fn player_disposed(world: &mut EmbedWorld, path: String) {
    world.host_script.hold_sleeps = true;
    let mount = mount(world);
    let outcomes = Rc::new(RefCell::new(Vec::new()));
    let mut pool = LocalPool::new();

    spawn_load(&pool, &mount, &path, &outcomes);
    pool.run_until_stalled();
    assert_eq!(mount.state(), MountState::LoadingRuntime);

    mount.dispose();
    mount.loader().host().release_sleeps();
    pool.run();

    world.mount_outcomes = outcomes.take();
    world.final_state = Some(mount.state());
}

// ===== Then Steps =====

#[then(expr = "the mount ends {string}")]
fn mount_ends(world: &mut EmbedWorld, expected: String) {
    let (_, state) = world.mount_outcomes.last().expect("No mount ran");
    assert_eq!(state_name(state), expected, "state was {}", state);
}

#[then(expr = "the mount of {string} ends {string}")]
fn mount_of_ends(world: &mut EmbedWorld, path: String, expected: String) {
    let state = world.outcome_for(&path).expect("No mount for path");
    assert_eq!(state_name(state), expected, "state was {}", state);
}

#[then("the mount fails with content not found")]
fn mount_fails_not_found(world: &mut EmbedWorld) {
    let (_, state) = world.mount_outcomes.last().expect("No mount ran");
    assert!(matches!(
        state,
        MountState::Failed(MountError::ContentNotFound {
            status: Some(404),
            ..
        })
    ));
}

#[then(expr = "a player was constructed for {string}")]
fn player_constructed_for(world: &mut EmbedWorld, path: String) {
    let log = world.container_log();
    assert!(log.constructed.iter().any(|o| o.h5p_json_path == path));
}

#[then(expr = "no player was constructed for {string}")]
fn no_player_constructed_for(world: &mut EmbedWorld, path: String) {
    let log = world.container_log();
    assert!(!log.constructed.iter().any(|o| o.h5p_json_path == path));
}

#[then("no player was constructed")]
fn no_player_constructed(world: &mut EmbedWorld) {
    let log = world.container_log();
    assert!(log.constructed.is_empty());
    assert_eq!(log.fallback_inits, 0);
}

#[then(expr = "the fallback init ran {int} time(s)")]
fn fallback_ran(world: &mut EmbedWorld, times: u32) {
    assert_eq!(world.container_log().fallback_inits, times);
}

#[then(expr = "the container was cleared {int} time(s)")]
fn container_cleared(world: &mut EmbedWorld, times: u32) {
    assert_eq!(world.container_log().clears, times);
}
