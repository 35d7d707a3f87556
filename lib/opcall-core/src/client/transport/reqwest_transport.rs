use http::Method;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{BODY_MAX_LENGTH, HttpTransport, RequestOptions, TransportError, TransportRequest};
use crate::client::ParameterBag;
use crate::client::parameters::scalar_to_string;

/// [`HttpTransport`] backed by a [`reqwest::Client`].
///
/// - `GET`, `HEAD`, `DELETE` and `OPTIONS` send the parameters as a query string;
///   arrays are repeated (`?tags=a&tags=b`).
/// - Other verbs send the parameters as a JSON body, when there are any.
/// - A non-success status is turned into [`TransportError::UnexpectedStatusCode`].
///
/// The successful [`reqwest::Response`] is returned as-is.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Uses the given client, e.g. one built with custom TLS or proxy settings.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn exchange(&self, request: TransportRequest) -> Result<reqwest::Response, TransportError> {
        let TransportRequest {
            method,
            url,
            params,
            options,
        } = request;

        let request = self.build_request(method, &url, &params, &options)?;

        debug!(?request, "sending...");
        let response = self.client.execute(request).await?;
        debug!(?response, "...receiving");

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map(truncate_body)
                .unwrap_or_else(|e| format!("<unable to read response body: {e}>"));
            return Err(TransportError::UnexpectedStatusCode {
                status_code: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    fn build_request(
        &self,
        method: Method,
        url: &str,
        params: &ParameterBag,
        options: &RequestOptions,
    ) -> Result<reqwest::Request, TransportError> {
        let mut url = Url::parse(url)?;
        let with_query = sends_query(&method);
        if with_query && !params.is_empty() {
            let pairs = query_pairs(params)?;
            url.query_pairs_mut().extend_pairs(pairs);
        }

        let mut builder = self.client.request(method, url);
        if !with_query && !params.is_empty() {
            builder = builder.json(params);
        }
        if let Some(timeout) = options.timeout() {
            builder = builder.timeout(timeout);
        }

        let mut headers = HeaderMap::new();
        for (name, value) in options.headers() {
            let name = HeaderName::from_bytes(name.as_bytes())?;
            let value = HeaderValue::from_str(value)?;
            headers.insert(name, value);
        }

        let request = builder.headers(headers).build()?;
        Ok(request)
    }
}

impl HttpTransport for ReqwestTransport {
    type Response = reqwest::Response;
    type Error = TransportError;

    async fn call(&self, request: TransportRequest) -> Result<Self::Response, Self::Error> {
        self.exchange(request).await
    }
}

/// Keeps at most [`BODY_MAX_LENGTH`] bytes, cut on a char boundary.
fn truncate_body(text: String) -> String {
    if text.len() <= BODY_MAX_LENGTH {
        return text;
    }
    let end = text
        .char_indices()
        .map(|(index, ch)| index + ch.len_utf8())
        .take_while(|end| *end <= BODY_MAX_LENGTH)
        .last()
        .unwrap_or(0);
    let truncated = text.get(..end).unwrap_or_default();
    format!("{truncated}... (truncated)")
}

fn sends_query(method: &Method) -> bool {
    [Method::GET, Method::HEAD, Method::DELETE, Method::OPTIONS].contains(method)
}

/// Form style: arrays repeat the parameter name for each item.
fn query_pairs(params: &ParameterBag) -> Result<Vec<(&str, String)>, TransportError> {
    let mut pairs = Vec::with_capacity(params.len());
    for (name, value) in params.iter() {
        let unsupported = || TransportError::UnsupportedQueryParameterValue {
            name: name.to_string(),
            value: value.clone(),
        };
        match value {
            Value::Array(items) => {
                for item in items {
                    pairs.push((name, scalar_to_string(item).ok_or_else(unsupported)?));
                }
            }
            _ => pairs.push((name, scalar_to_string(value).ok_or_else(unsupported)?)),
        }
    }
    Ok(pairs)
}
