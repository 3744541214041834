use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::extractors::ValidatedForm;
use form::{FormSchema, Schema};

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

/// Query string of a user search.
#[derive(Debug, Default, Serialize)]
pub struct SearchForm {
    pub q: String,
    pub ids: Vec<i64>,
    pub tags: Vec<String>,
    pub since: Option<DateTime<Utc>>,
    pub limit: i64,
    pub min_score: f32,
}

impl FormSchema for SearchForm {
    fn schema() -> Schema<Self> {
        Schema::<Self>::new()
            .text("q", "as:q,min:2", |s| &mut s.q)
            .int64_list("ids", "as:ids,comma", |s| &mut s.ids)
            .text_list("tags", "as:tag", |s| &mut s.tags)
            .optional_timestamp("since", "as:since", |s| &mut s.since)
            .int64("limit", "as:limit", |s| &mut s.limit)
            .float32("min_score", "as:min_score", |s| &mut s.min_score)
    }
}

impl SearchForm {
    /// Effective page size: unset or non-positive falls back to the default.
    pub const fn page_size(&self) -> i64 {
        if self.limit <= 0 {
            DEFAULT_LIMIT
        } else if self.limit > MAX_LIMIT {
            MAX_LIMIT
        } else {
            self.limit
        }
    }
}

#[derive(Debug, Serialize)]
struct SearchEcho {
    #[serde(flatten)]
    query: SearchForm,
    page_size: i64,
}

// Echo a validated search query
async fn search_users(ValidatedForm(query): ValidatedForm<SearchForm>) -> impl IntoResponse {
    let page_size = query.page_size();
    debug!(q = %query.q, ids = query.ids.len(), page_size, "user search");
    (StatusCode::OK, Json(SearchEcho { query, page_size }))
}

pub(super) fn router() -> Router {
    Router::new().route("/v1/users/search", get(search_users))
}
