use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Header row written once when the feedback log is created.
pub const LOG_HEADER: [&str; 4] = ["project", "context", "rating", "comment"];

/// One user-submitted evaluation, stored positionally as four CSV fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub project_description: String,
    pub context_label: String,
    /// Raw rating text. Validated when the log is aggregated, never on write.
    pub rating: String,
    pub comment: String,
}

impl FeedbackRecord {
    pub fn new(
        project_description: impl Into<String>,
        context_label: impl Into<String>,
        rating: impl ToString,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            project_description: project_description.into(),
            context_label: context_label.into(),
            rating: rating.to_string(),
            comment: comment.into(),
        }
    }

    pub fn fields(&self) -> [&str; 4] {
        [
            self.project_description.as_str(),
            self.context_label.as_str(),
            self.rating.as_str(),
            self.comment.as_str(),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackCount {
    pub feedback: String,
    pub count: u64,
}

/// Derived view of the whole log. Rebuilt wholesale on every aggregation run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateSnapshot {
    pub average_rating: f64,
    #[serde(rename = "common_feedback")]
    pub top_feedback: Vec<FeedbackCount>,
}

impl AggregateSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Plain-text analysis report, one theme per line.
    pub fn render_report(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Average Rating: {:?}", self.average_rating);
        let _ = writeln!(out, "Common Feedback Themes:");
        for theme in &self.top_feedback {
            let _ = writeln!(out, "- {} ({} times)", theme.feedback, theme.count);
        }
        out
    }
}
