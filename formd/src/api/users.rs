use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::error::FormRejection;
use crate::extractors::DecodedForm;
use form::{ErrorResponse, FormSchema, Schema};

/// Sign-up form as submitted by the browser.
#[derive(Debug, Default)]
pub struct CreateUserForm {
    pub friend_ids: Vec<i64>,
    pub family_ids: Vec<i64>,
    pub date: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub password: String,
    pub active: bool,
    pub colors: Vec<String>,
}

impl FormSchema for CreateUserForm {
    fn schema() -> Schema<Self> {
        Schema::<Self>::new()
            .int64_list("friend_ids", "as:friend_ids", |f| &mut f.friend_ids)
            .int64_list("family_ids", "as:family_ids", |f| &mut f.family_ids)
            .timestamp("date", "as:date", |f| &mut f.date)
            .text("name", "as:name,required", |f| &mut f.name)
            .text("email", "as:email,email,required", |f| &mut f.email)
            .text("password", "as:password,min:6,required", |f| &mut f.password)
            .boolean("active", "as:active", |f| &mut f.active)
            .text_list("colors", "as:colors", |f| &mut f.colors)
    }
}

/// The stored user. Never carries the password back out.
#[derive(Debug, Default, Serialize)]
pub struct User {
    pub friend_ids: Vec<i64>,
    pub family_ids: Vec<i64>,
    pub date: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub active: bool,
    pub colors: Vec<String>,
}

impl FormSchema for User {
    fn schema() -> Schema<Self> {
        Schema::<Self>::new()
            .int64_list("friend_ids", "as:friend_ids", |u| &mut u.friend_ids)
            .int64_list("family_ids", "as:family_ids", |u| &mut u.family_ids)
            .timestamp("date", "as:date", |u| &mut u.date)
            .text("name", "as:name", |u| &mut u.name)
            .text("email", "as:email", |u| &mut u.email)
            .boolean("active", "as:active", |u| &mut u.active)
            .text_list("colors", "as:colors", |u| &mut u.colors)
    }
}

// Create a user from a sign-up form
pub(super) async fn create_user(DecodedForm(session): DecodedForm<CreateUserForm>) -> Response {
    if let Some(report) = session.report() {
        info!(invalid_fields = report.fields.len(), "user creation rejected");
        return FormRejection::from(report).into_response();
    }

    let mut user = User::default();
    match session.apply_to(&mut user) {
        Ok(fields) => {
            info!(
                user.name = %user.name,
                user.email = %user.email,
                fields,
                "user created"
            );
            (StatusCode::CREATED, Json(user)).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to build user from form");
            FormRejection::from(ErrorResponse::invalid_schema()).into_response()
        }
    }
}

pub(super) fn router() -> Router {
    Router::new().route("/v1/users", post(create_user))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use form::{FormValues, UrlEncoded, decode};

    async fn json_body(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn http_form() -> FormValues {
        let mut values = FormValues::new();
        values.set("friend_ids", ["1", "2nd"]);
        values.set("family_ids", ["3", "4"]);
        values.set("date", ["2015-05-28T21:00:00Z"]);
        values.set("email", ["ilkergoktugozturk@gmail.com"]);
        values.set("password", ["12345"]);
        values.set("active", ["false"]);
        values.set("colors", ["blue", "red"]);
        values
    }

    #[tokio::test]
    async fn test_create_user_reports_invalid_fields() {
        let session = decode::<CreateUserForm, _>(&http_form()).unwrap();
        let response = create_user(DecodedForm(session)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = json_body(response).await;
        assert_eq!(json["message"], "Unvalid Form Data");
        assert_eq!(json["fields"]["friend_ids"], "must be numbers");
        assert_eq!(json["fields"]["name"], "required");
        assert_eq!(json["fields"]["password"], "must be at least 6 chars long");
        assert_eq!(json["fields"].as_object().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let body = b"name=Ada&email=ada%40example.com&password=hunter22&active=true\
            &family_ids=3&family_ids=4&colors=blue&colors=red&date=2015-05-28T21%3A00%3A00Z";
        let session = decode::<CreateUserForm, _>(&UrlEncoded(body)).unwrap();
        let response = create_user(DecodedForm(session)).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = json_body(response).await;
        assert_eq!(json["name"], "Ada");
        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json["family_ids"], serde_json::json!([3, 4]));
        assert_eq!(json["friend_ids"], serde_json::json!([]));
        assert_eq!(json["colors"], serde_json::json!(["blue", "red"]));
        assert_eq!(json["active"], true);
        assert_eq!(json["date"], "2015-05-28T21:00:00Z");
        assert!(json.get("password").is_none());
    }
}
