use cucumber::{given, then, when};
use h5p_embed_core::application::{KeyValueStore, TrackOutcome, PROGRESS_KEY};
use h5p_embed_core::{Activity, ActivityCatalog, InteractionEvent};
use h5p_embed_tests::EmbedWorld;
use serde_json::json;

fn statement(verb: &str, object_id: &str, raw: u32, max: u32) -> InteractionEvent {
    InteractionEvent::from_json(json!({
        "statement": {
            "verb": {"id": format!("http://adlnet.gov/expapi/verbs/{}", verb)},
            "object": {"id": object_id},
            "result": {"score": {"raw": raw, "max": max}}
        }
    }))
    .expect("valid statement")
}

// ===== Given Steps =====

#[given(expr = "a catalog with activities {string}")]
fn catalog_with(world: &mut EmbedWorld, slugs: String) {
    let activities = slugs
        .split(',')
        .map(str::trim)
        .map(|slug| Activity::new(slug, slug, ""))
        .collect();
    world.catalog = ActivityCatalog::new(activities).expect("valid catalog");
    world.tracker = None;
}

// ===== When Steps =====

#[when(regex = r#"^an? "(\w+)" statement for "([^"]+)" scores (\d+) of (\d+)$"#)]
fn statement_received(world: &mut EmbedWorld, verb: String, object_id: String, raw: u32, max: u32) {
    let event = statement(&verb, &object_id, raw, max);
    let outcome = world.tracker().handle(&event);
    world.last_outcome = Some(outcome);
}

#[when(regex = r"^the statement (\{.+\}) is received$")]
fn raw_statement_received(world: &mut EmbedWorld, raw: String) {
    let statement: serde_json::Value = serde_json::from_str(&raw).expect("Statement is JSON");
    let event = InteractionEvent::from_statement(statement.clone());
    world.last_statement = Some(statement);
    let outcome = world.tracker().handle(&event);
    world.last_outcome = Some(outcome);
}

#[when("the page is reloaded")]
fn page_reloaded(world: &mut EmbedWorld) {
    world.reload();
}

// ===== Then Steps =====

#[then(expr = "progress for {string} is {float} percent")]
fn progress_is(world: &mut EmbedWorld, slug: String, percent: f64) {
    let entry = *world.tracker().record().get(&slug).expect("No progress entry");
    assert_eq!(entry.percent, Some(percent));
}

#[then(regex = r"^the stored progress is (.+)$")]
fn stored_progress_is(world: &mut EmbedWorld, expected: String) {
    let stored = world.store.get(PROGRESS_KEY).expect("Progress not persisted");
    let stored: serde_json::Value = serde_json::from_str(&stored).expect("Stored progress is JSON");
    let expected: serde_json::Value = serde_json::from_str(&expected).expect("Expected value is JSON");
    assert_eq!(stored, expected);
}

#[then(expr = "the summary shows {int} of {int} activities completed")]
fn summary_shows(world: &mut EmbedWorld, completed: usize, total: usize) {
    let summary = world.tracker().summary().clone();
    assert_eq!(summary.completed_activities, completed);
    assert_eq!(summary.total_activities, total);
}

#[then(expr = "the completion rate is {float} percent")]
fn completion_rate_is(world: &mut EmbedWorld, rate: f64) {
    assert_eq!(world.tracker().summary().completion_rate, rate);
}

#[then(expr = "the average score is {float} percent")]
fn average_score_is(world: &mut EmbedWorld, average: f64) {
    assert_eq!(world.tracker().summary().average_score_percent, average);
}

#[then("the statement is ignored")]
fn statement_ignored(world: &mut EmbedWorld) {
    assert_eq!(world.last_outcome, Some(TrackOutcome::Ignored));
}

#[then("the statement is unattributed")]
fn statement_unattributed(world: &mut EmbedWorld) {
    assert_eq!(world.last_outcome, Some(TrackOutcome::Unattributed));
}

#[then("no progress is recorded")]
fn no_progress(world: &mut EmbedWorld) {
    assert!(world.tracker().record().is_empty());
    assert_eq!(world.store.get(PROGRESS_KEY), None);
}

#[then(expr = "the raw log holds {int} statement(s)")]
fn raw_log_holds(world: &mut EmbedWorld, count: usize) {
    assert_eq!(world.tracker().records().len(), count);
}

#[then("the last logged statement equals the received one")]
fn last_logged_equals_received(world: &mut EmbedWorld) {
    let expected = world.last_statement.clone().expect("No statement received");
    let records = world.tracker().records();
    assert_eq!(records.last(), Some(&expected));
}
