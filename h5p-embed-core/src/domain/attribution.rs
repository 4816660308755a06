use std::collections::HashMap;

use super::activity::{ActivityCatalog, Slug};
use super::statement::Statement;

const SEGMENT_DELIMITERS: &[char] = &['/', '?', '&', '=', '#'];

/// Maps statements to activity slugs
///
/// Resolution order:
/// 1. explicit bindings registered via [`Attributor::bind`]
/// 2. previously resolved content ids
/// 3. slugs found in the statement's object id
///
/// Step 3 is a heuristic. Among several matching slugs the one that
/// appears as a whole URL segment wins, then the longest, then catalog order.
#[derive(Debug, Clone, Default)]
pub struct Attributor {
    bindings: HashMap<String, Slug>,
    resolved: HashMap<String, Slug>,
}

impl Attributor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an unambiguous content id for an activity
    pub fn bind(&mut self, content_id: impl Into<String>, slug: impl Into<Slug>) {
        self.bindings.insert(content_id.into(), slug.into());
    }

    pub fn resolve(&mut self, statement: &Statement, catalog: &ActivityCatalog) -> Option<Slug> {
        let content_id = statement.content_id();

        if let Some(id) = &content_id {
            if let Some(slug) = self.bindings.get(id).filter(|s| catalog.contains(s)) {
                return Some(slug.clone());
            }
            if let Some(slug) = self.resolved.get(id).filter(|s| catalog.contains(s)) {
                return Some(slug.clone());
            }
        }

        let slug = best_match(&statement.object.id, catalog)?;

        if let Some(id) = content_id {
            tracing::debug!(content_id = %id, slug = %slug, "Cached content id attribution");
            self.resolved.insert(id, slug.clone());
        }

        Some(slug)
    }

    /// Number of cached content id mappings (bindings excluded)
    pub fn cached(&self) -> usize {
        self.resolved.len()
    }
}

fn best_match(object_id: &str, catalog: &ActivityCatalog) -> Option<Slug> {
    if object_id.is_empty() {
        return None;
    }

    let segments: Vec<&str> = object_id.split(SEGMENT_DELIMITERS).collect();

    catalog
        .iter()
        .enumerate()
        .filter_map(|(index, activity)| {
            let encoded = activity.slug.replace(' ', "%20");
            let forms = [activity.slug.as_str(), encoded.as_str()];

            if !forms.iter().any(|f| object_id.contains(f)) {
                return None;
            }
            let whole_segment = segments.iter().any(|seg| forms.contains(seg));
            Some((whole_segment, activity.slug.len(), index, &activity.slug))
        })
        // later catalog entries lose ties
        .max_by(|a, b| (a.0, a.1, std::cmp::Reverse(a.2)).cmp(&(b.0, b.1, std::cmp::Reverse(b.2))))
        .map(|(_, _, _, slug)| slug.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Activity;
    use serde_json::json;

    fn catalog(slugs: &[&str]) -> ActivityCatalog {
        ActivityCatalog::new(slugs.iter().map(|s| Activity::new(*s, *s, "")).collect()).unwrap()
    }

    fn statement(object_id: &str, content_id: Option<i64>) -> Statement {
        let mut value = json!({
            "verb": {"id": "http://adlnet.gov/expapi/verbs/answered"},
            "object": {"id": object_id}
        });
        if let Some(id) = content_id {
            value["object"]["definition"] =
                json!({"extensions": {"http://h5p.org/x-api/h5p-local-content-id": id}});
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_substring_match() {
        let catalog = catalog(&["A", "B"]);
        let mut attributor = Attributor::new();

        let slug = attributor.resolve(&statement("http://localhost/h5p/A", None), &catalog);
        assert_eq!(slug.as_deref(), Some("A"));
    }

    #[test]
    fn test_no_match_is_dropped() {
        let catalog = catalog(&["quiz"]);
        let mut attributor = Attributor::new();

        assert_eq!(attributor.resolve(&statement("http://localhost/other", Some(1)), &catalog), None);
        assert_eq!(attributor.cached(), 0);
    }

    #[test]
    fn test_content_id_is_cached() {
        let catalog = catalog(&["column", "quiz"]);
        let mut attributor = Attributor::new();

        let first = attributor.resolve(&statement("http://localhost/h5p/column", Some(7)), &catalog);
        assert_eq!(first.as_deref(), Some("column"));
        assert_eq!(attributor.cached(), 1);

        // Sub-content ids often carry no slug at all
        let second = attributor.resolve(&statement("http://localhost/?subContentId=abc", Some(7)), &catalog);
        assert_eq!(second.as_deref(), Some("column"));
    }

    #[test]
    fn test_prefers_whole_segment_over_substring() {
        let catalog = catalog(&["quiz", "quiz-advanced"]);
        let mut attributor = Attributor::new();

        let slug = attributor.resolve(&statement("http://localhost/h5p/quiz", None), &catalog);
        assert_eq!(slug.as_deref(), Some("quiz"));

        let slug = attributor.resolve(&statement("http://localhost/h5p/quiz-advanced", None), &catalog);
        assert_eq!(slug.as_deref(), Some("quiz-advanced"));
    }

    #[test]
    fn test_prefers_longest_substring() {
        let catalog = catalog(&["test", "test-1292696978100675539"]);
        let mut attributor = Attributor::new();

        let slug = attributor.resolve(
            &statement("http://localhost/h5p/test-1292696978100675539-x", None),
            &catalog,
        );
        assert_eq!(slug.as_deref(), Some("test-1292696978100675539"));
    }

    #[test]
    fn test_encoded_spaces_match() {
        let catalog = catalog(&["What Would You Do"]);
        let mut attributor = Attributor::new();

        let slug = attributor.resolve(&statement("http://localhost/h5p/What%20Would%20You%20Do", None), &catalog);
        assert_eq!(slug.as_deref(), Some("What Would You Do"));
    }

    #[test]
    fn test_explicit_binding_wins() {
        let catalog = catalog(&["A", "B"]);
        let mut attributor = Attributor::new();
        attributor.bind("99", "B");

        let slug = attributor.resolve(&statement("http://localhost/h5p/A", Some(99)), &catalog);
        assert_eq!(slug.as_deref(), Some("B"));
    }

    #[test]
    fn test_binding_to_unknown_slug_is_ignored() {
        let catalog = catalog(&["A"]);
        let mut attributor = Attributor::new();
        attributor.bind("5", "gone");

        let slug = attributor.resolve(&statement("http://localhost/h5p/A", Some(5)), &catalog);
        assert_eq!(slug.as_deref(), Some("A"));
    }
}
