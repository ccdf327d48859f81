//! Satisfaction ratings stream
//!
//! Ratings arrive as a `{question_id: rating}` object. Each one is expanded
//! into a list of question/rating pairs carrying the question's label from
//! the account's surveys and the rating's label from the rating scale.

use super::incremental::sync_incremental;
use super::labels::{lookup, RATINGS};
use super::StreamDefinition;
use crate::engine::SyncContext;
use crate::error::Result;
use crate::pagination::PageRequest;
use crate::state::Cursor;
use crate::types::{JsonValue, ReplicationMethod};
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use tracing::debug;

/// Satisfaction ratings, filtered with `created_since`
#[derive(Debug, Clone, Copy, Default)]
pub struct SatisfactionRatings;

/// Question id -> label across every survey
fn question_labels(surveys: &[JsonValue]) -> HashMap<String, String> {
    surveys
        .iter()
        .filter_map(|survey| survey.get("questions").and_then(JsonValue::as_array))
        .flatten()
        .filter_map(|question| {
            let id = question.get("id").and_then(JsonValue::as_str)?;
            let label = question.get("label").and_then(JsonValue::as_str)?;
            Some((id.to_string(), label.to_string()))
        })
        .collect()
}

/// Replace a record's `ratings` object with the expanded list
///
/// Records without ratings are left alone; an empty ratings object becomes
/// an empty list.
pub fn expand_ratings(record: &mut JsonValue, questions: &HashMap<String, String>) {
    let Some(fields) = record.as_object_mut() else {
        return;
    };
    let Some(JsonValue::Object(ratings)) = fields.get("ratings") else {
        return;
    };

    let expanded: Vec<JsonValue> = ratings
        .iter()
        .map(|(question_id, rating)| {
            let question_label = questions.get(question_id).map_or("", String::as_str);
            let rating_label = rating.as_i64().and_then(|code| lookup(RATINGS, code));
            json!({
                "question_id": question_id,
                "question_label": question_label,
                "rating_id": rating,
                "rating_label": rating_label,
            })
        })
        .collect();

    fields.insert("ratings".to_string(), JsonValue::Array(expanded));
}

#[async_trait]
impl StreamDefinition for SatisfactionRatings {
    fn stream_id(&self) -> &'static str {
        "satisfaction_ratings"
    }

    fn replication_method(&self) -> ReplicationMethod {
        ReplicationMethod::Incremental
    }

    fn replication_keys(&self) -> &'static [&'static str] {
        &["created_at"]
    }

    async fn sync(&self, ctx: &mut SyncContext<'_>, start: Cursor) -> Result<()> {
        let surveys = ctx.client().get_all(PageRequest::new("surveys")).await?;
        let questions = question_labels(&surveys);
        debug!(questions = questions.len(), "Loaded survey questions");

        let request = PageRequest::new("surveys/satisfaction_ratings")
            .filter("created_since", start)
            .cursor_field("created_at");
        let decorate = move |record: &mut JsonValue| expand_ratings(record, &questions);

        sync_incremental(ctx, request, self.stream_id(), start, &decorate).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_question_labels_span_every_survey() {
        let surveys = vec![
            json!({"id": 1, "questions": [{"id": "default_question", "label": "How was it?"}]}),
            json!({"id": 2, "questions": [
                {"id": "question_1", "label": "Speed"},
                {"id": "question_2", "label": "Quality"}
            ]}),
            json!({"id": 3}),
        ];

        let labels = question_labels(&surveys);
        assert_eq!(labels.len(), 3);
        assert_eq!(labels["question_2"], "Quality");
    }
}
