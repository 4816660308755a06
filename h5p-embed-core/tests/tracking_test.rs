use h5p_embed_core::application::{KeyValueStore, PROGRESS_KEY, SUMMARY_KEY};
use h5p_embed_core::infrastructure::{LocalEventChannel, MemoryStore};
use h5p_embed_core::{ActivityCatalog, EventBridge, InteractionEvent, ProgressTracker};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_test_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new("debug"))
        .with(fmt::layer().with_test_writer())
        .try_init();
}

fn statement(verb: &str, object_id: &str, raw: u32, max: u32) -> InteractionEvent {
    InteractionEvent::from_json(json!({
        "statement": {
            "verb": {"id": format!("http://adlnet.gov/expapi/verbs/{}", verb)},
            "object": {"id": object_id},
            "result": {"score": {"raw": raw, "max": max}}
        }
    }))
    .unwrap()
}

#[test]
fn test_progress_survives_reload() {
    init_test_tracing();

    let store = MemoryStore::new();
    let channel = LocalEventChannel::new();

    {
        let tracker = Rc::new(RefCell::new(ProgressTracker::new(
            ActivityCatalog::demo(),
            store.clone(),
        )));
        let attached = EventBridge::new(tracker).attach(&channel);

        channel.emit(&statement("answered", "http://localhost/h5p/my-interactive", 1, 1));
        channel.emit(&statement(
            "completed",
            "http://localhost/h5p/fill-in-the-blanks?lang=en",
            3,
            4,
        ));
        attached.detach();
    }

    let stored: serde_json::Value = serde_json::from_str(&store.get(PROGRESS_KEY).unwrap()).unwrap();
    assert_eq!(stored["my-interactive"]["percent"], 100.0);
    assert_eq!(stored["fill-in-the-blanks"]["percent"], 75.0);
    assert!(store.get(SUMMARY_KEY).is_some());

    let reloaded = ProgressTracker::new(ActivityCatalog::demo(), store);
    assert_eq!(reloaded.record().len(), 2);
    assert_eq!(reloaded.summary().completed_activities, 2);
    assert_eq!(reloaded.summary().average_score_percent, 87.5);
}
