use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Activity slug (unique within a catalog)
pub type Slug = String;

/// Rendering strategy requested from the player runtime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EmbedMode {
    /// Full player inside an iframe
    #[default]
    Iframe,
    /// Inline container in the host page
    #[serde(alias = "inline")]
    Div,
}

impl EmbedMode {
    /// Value passed to the runtime as `embedType`
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbedMode::Iframe => "iframe",
            EmbedMode::Div => "div",
        }
    }
}

impl fmt::Display for EmbedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A displayable H5P activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub slug: Slug,
    pub title: String,
    pub summary: String,
    #[serde(default, alias = "embedType")]
    pub embed_mode: EmbedMode,
    #[serde(default)]
    pub debug: bool,
}

impl Activity {
    pub fn new(slug: impl Into<String>, title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            summary: summary.into(),
            embed_mode: EmbedMode::default(),
            debug: false,
        }
    }

    pub fn with_embed_mode(mut self, embed_mode: EmbedMode) -> Self {
        self.embed_mode = embed_mode;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Content path under `content_base`, e.g. `/h5p/my-interactive`
    ///
    /// Spaces in the slug are percent-encoded; some exported packages use
    /// their title as folder name.
    pub fn content_path(&self, content_base: &str) -> String {
        let base = content_base.trim_end_matches('/');
        format!("{}/{}", base, self.slug.replace(' ', "%20"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Activity slug must not be empty (title: {title})")]
    EmptySlug { title: String },

    #[error("Duplicate activity slug: {0}")]
    DuplicateSlug(String),
}

/// Ordered, validated list of activities (order is display order)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct ActivityCatalog {
    activities: Vec<Activity>,
}

impl ActivityCatalog {
    /// Build a catalog, rejecting empty and duplicate slugs
    pub fn new(activities: Vec<Activity>) -> Result<Self, CatalogError> {
        for (i, activity) in activities.iter().enumerate() {
            if activity.slug.trim().is_empty() {
                return Err(CatalogError::EmptySlug {
                    title: activity.title.clone(),
                });
            }
            if activities[..i].iter().any(|a| a.slug == activity.slug) {
                return Err(CatalogError::DuplicateSlug(activity.slug.clone()));
            }
        }
        Ok(Self { activities })
    }

    pub fn get(&self, slug: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.slug == slug)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.get(slug).is_some()
    }

    pub fn first(&self) -> Option<&Activity> {
        self.activities.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Activity> {
        self.activities.iter()
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Activities bundled with the demo site
    pub fn demo() -> Self {
        Self {
            activities: vec![
                Activity::new(
                    "koha",
                    "Estate Planning Awareness – Conventional & Islamic (Malaysia)",
                    "Interactive book on estate planning awareness for Malaysia, covering both conventional and Islamic perspectives.",
                )
                .with_embed_mode(EmbedMode::Div)
                .with_debug(true),
                Activity::new(
                    "my-interactive",
                    "Blackcurrant Quiz",
                    "Simple multiple choice question rendered from local H5P package.",
                ),
                Activity::new(
                    "fill-in-the-blanks",
                    "Fill in the Blanks",
                    "Interactive fill-in-the-blanks activity rendered from local H5P package.",
                ),
                Activity::new(
                    "animal-world",
                    "Animal World",
                    "Explore the fascinating world of animals with this interactive activity.",
                ),
                Activity::new(
                    "answer-the-question",
                    "Answer the Question",
                    "Interactive activity to answer questions rendered from local H5P package.",
                ),
                Activity::new(
                    "course-presentation-1292697122536488879",
                    "Course Presentation",
                    "A course presentation with interactive slides and activities.",
                ),
                Activity::new(
                    "Introduction to Time Management",
                    "Introduction to Time Management",
                    "Branching scenario on time management skills.",
                ),
                Activity::new(
                    "test-1292696978100675539",
                    "test",
                    "Interactive video with embedded questions.",
                ),
                Activity::new(
                    "What Would You Do",
                    "What Would You Do?",
                    "Branching scenario: What Would You Do?",
                ),
                Activity::new(
                    "column",
                    "Example: Column",
                    "A column activity with multiple interactive elements.",
                ),
                Activity::new(
                    "resource-for-presenting-h5p-1292697191836419139",
                    "Resource for presenting H5P",
                    "A course presentation resource with interactive slides.",
                ),
            ],
        }
    }
}

impl<'de> Deserialize<'de> for ActivityCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let activities = Vec::<Activity>::deserialize(deserializer)?;
        ActivityCatalog::new(activities).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a ActivityCatalog {
    type Item = &'a Activity;
    type IntoIter = std::slice::Iter<'a, Activity>;

    fn into_iter(self) -> Self::IntoIter {
        self.activities.iter()
    }
}
