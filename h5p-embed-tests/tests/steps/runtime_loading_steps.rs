use cucumber::{given, then, when};
use futures::executor::block_on;
use futures::future::join_all;
use h5p_embed_core::LoadError;
use h5p_embed_tests::EmbedWorld;

// ===== Given Steps =====

#[given(expr = "the runtime entry point appears after {int} checks")]
fn entry_point_after(world: &mut EmbedWorld, checks: u32) {
    world.host_script.ready_after = Some(checks);
}

#[given("the runtime entry point never appears")]
fn entry_point_never(world: &mut EmbedWorld) {
    world.host_script.ready_after = None;
}

#[given(expr = "the retry budget is {int} attempts")]
fn retry_budget(world: &mut EmbedWorld, attempts: u32) {
    world.retry_count = Some(attempts);
}

#[given(expr = "the main bundle fails to load {int} time(s)")]
fn main_bundle_fails(world: &mut EmbedWorld, times: u32) {
    world.host_script.script_failures = times;
}

#[given(expr = "the asset version is {string}")]
fn asset_version(world: &mut EmbedWorld, version: String) {
    world.asset_version = Some(version);
}

// ===== When Steps =====

#[when(expr = "{int} player(s) request(s) the runtime at the same time")]
fn concurrent_requests(world: &mut EmbedWorld, count: usize) {
    let loader = world.loader();
    world.load_results = block_on(join_all((0..count).map(|_| loader.ensure_ready())));
}

#[when(expr = "{int} player(s) request(s) the runtime one after another")]
fn sequential_requests(world: &mut EmbedWorld, count: usize) {
    let loader = world.loader();
    world.load_results = (0..count).map(|_| block_on(loader.ensure_ready())).collect();
}

// ===== Then Steps =====

#[then("every request succeeds")]
fn every_request_succeeds(world: &mut EmbedWorld) {
    assert!(!world.load_results.is_empty());
    for result in &world.load_results {
        assert!(result.is_ok(), "Unexpected failure: {:?}", result);
    }
}

#[then(expr = "request {int} succeeds")]
fn request_succeeds(world: &mut EmbedWorld, index: usize) {
    assert!(world.load_results[index - 1].is_ok());
}

#[then(expr = "request {int} fails with a script error")]
fn request_fails_with_script_error(world: &mut EmbedWorld, index: usize) {
    assert!(matches!(
        world.load_results[index - 1],
        Err(LoadError::ScriptFailed { .. })
    ));
}

#[then(expr = "every request fails with an entry point timeout after {int} attempts")]
fn every_request_times_out(world: &mut EmbedWorld, attempts: u32) {
    assert!(!world.load_results.is_empty());
    for result in &world.load_results {
        assert_eq!(result, &Err(LoadError::EntryPointTimeout { attempts }));
    }
}

#[then(expr = "the main bundle was requested {int} time(s)")]
fn main_bundle_requested(world: &mut EmbedWorld, times: usize) {
    let log = world.host_log();
    let loads = log
        .scripts
        .iter()
        .filter(|src| src.contains("/main.bundle.js"))
        .count();
    assert_eq!(loads, times);
}

#[then(expr = "the stylesheet was injected {int} time(s)")]
fn stylesheet_injected(world: &mut EmbedWorld, times: usize) {
    assert_eq!(world.host_log().stylesheets.len(), times);
}

#[then(expr = "the host slept {int} time(s)")]
fn host_slept(world: &mut EmbedWorld, times: u32) {
    assert_eq!(world.host_log().sleeps, times);
}

#[then(expr = "the frame bundle URL is {string}")]
fn frame_bundle_url(world: &mut EmbedWorld, url: String) {
    let assets = world.load_results[0].as_ref().unwrap();
    assert_eq!(assets.frame_js, url);
}

#[then(expr = "the stylesheet URL is {string}")]
fn stylesheet_url(world: &mut EmbedWorld, url: String) {
    let assets = world.load_results[0].as_ref().unwrap();
    assert_eq!(assets.frame_css, url);
    assert_eq!(world.host_log().stylesheets, vec![url]);
}
