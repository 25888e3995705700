//! Request description handed to the transport

use serde::Serialize;
use serde_json::Value;

use kalshi_types::{HttpMethod, KalshiError, API_PREFIX};

use crate::error::{encode_error, RestResult};

/// Method, path, query and optional JSON body of one REST call
///
/// `path` is relative to the API prefix (e.g. `/markets`). The query string is
/// already encoded and only contains the filters the caller supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct RestRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: String,
    pub body: Option<Value>,
}

impl RestRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: String::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Encode `params` as the query string; unset optional fields are dropped
    pub fn with_query<P: Serialize + ?Sized>(mut self, params: &P) -> RestResult<Self> {
        self.query = serde_urlencoded::to_string(params).map_err(encode_error)?;
        Ok(self)
    }

    /// Attach a JSON body (any verb, including DELETE)
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> RestResult<Self> {
        let value = serde_json::to_value(body).map_err(|e| KalshiError::InvalidJson {
            message: e.to_string(),
            raw: None,
        })?;
        self.body = Some(value);
        Ok(self)
    }

    /// Path that gets signed: API prefix plus path, never the query
    pub fn signed_path(&self) -> String {
        format!("{API_PREFIX}{}", self.path)
    }

    /// Path and query as sent on the wire
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.signed_path()
        } else {
            format!("{}?{}", self.signed_path(), self.query)
        }
    }
}
