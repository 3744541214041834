use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{Method, header::CONTENT_TYPE},
};
use tracing::{debug, error};

use crate::error::FormRejection;
use form::{ErrorResponse, FormSchema, FormSource, FormValues, MalformedForm, Session, decode};

const URLENCODED: &str = "application/x-www-form-urlencoded";

/// Form data of one request: the url-encoded body, when there is one, then
/// the query string. Body values come first for keys present in both.
struct RequestForm<'a> {
    body: Option<&'a [u8]>,
    query: Option<&'a str>,
}

impl FormSource for RequestForm<'_> {
    fn form_values(&self) -> Result<FormValues, MalformedForm> {
        let mut values = match self.body {
            Some(body) => FormValues::parse_urlencoded(body)?,
            None => FormValues::new(),
        };
        if let Some(query) = self.query {
            values.merge(FormValues::parse_urlencoded(query.as_bytes())?);
        }
        Ok(values)
    }
}

fn has_form_body(req: &Request) -> bool {
    if req.method() == Method::GET || req.method() == Method::HEAD {
        return false;
    }
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(URLENCODED))
}

async fn read_session<T, S>(req: Request, state: &S) -> Result<Session<T>, FormRejection>
where
    S: Send + Sync,
    T: FormSchema,
{
    let query = req.uri().query().map(str::to_owned);
    let body = if has_form_body(&req) {
        Some(Bytes::from_request(req, state).await?)
    } else {
        None
    };

    let source = RequestForm {
        body: body.as_deref(),
        query: query.as_deref(),
    };
    decode::<T, _>(&source).map_err(|e| {
        error!(error = %e, "form schema rejected");
        FormRejection::from(ErrorResponse::invalid_schema())
    })
}

/// Decoded form whose fields all passed validation.
#[derive(Debug)]
pub struct ValidatedForm<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedForm<T>
where
    S: Send + Sync,
    T: FormSchema + Send,
{
    type Rejection = FormRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let session = read_session::<T, S>(req, state).await?;
        if session.has_errors() {
            debug!(invalid_fields = session.errors().len(), "form rejected");
        }
        session.into_result().map(Self).map_err(FormRejection::from)
    }
}

/// The whole decode session, for handlers that inspect presence or errors
/// themselves. Only an unreadable body or a broken schema is rejected.
#[derive(Debug)]
pub struct DecodedForm<T>(pub Session<T>);

impl<T, S> FromRequest<S> for DecodedForm<T>
where
    S: Send + Sync,
    T: FormSchema + Send,
{
    type Rejection = FormRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let session = read_session::<T, S>(req, state).await?;
        if let Some(malformed) = session.malformed() {
            debug!(error = %malformed, "form body unparsable");
            return Err(ErrorResponse::unparsable().into());
        }
        Ok(Self(session))
    }
}
