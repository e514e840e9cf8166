//! HTTP request building for OData endpoints.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::Result;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl RequestMethod {
    /// Convert to reqwest::Method.
    pub fn to_reqwest(&self) -> reqwest::Method {
        match self {
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Post => reqwest::Method::POST,
            RequestMethod::Patch => reqwest::Method::PATCH,
            RequestMethod::Put => reqwest::Method::PUT,
            RequestMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// An OData request: method plus a URL relative to the connection base,
/// with optional query parameters, headers and a JSON body.
#[derive(Debug)]
pub struct ODataRequest {
    pub(crate) method: RequestMethod,
    pub(crate) relative_url: String,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) query_params: Vec<(String, String)>,
    pub(crate) body: Option<serde_json::Value>,
}

impl ODataRequest {
    /// Create a new request.
    pub fn new(method: RequestMethod, relative_url: impl Into<String>) -> Self {
        Self {
            method,
            relative_url: relative_url.into(),
            headers: HashMap::new(),
            query_params: Vec::new(),
            body: None,
        }
    }

    /// Create a GET request.
    pub fn get(relative_url: impl Into<String>) -> Self {
        Self::new(RequestMethod::Get, relative_url)
    }

    /// Create a POST request.
    pub fn post(relative_url: impl Into<String>) -> Self {
        Self::new(RequestMethod::Post, relative_url)
    }

    /// Create a PATCH request.
    pub fn patch(relative_url: impl Into<String>) -> Self {
        Self::new(RequestMethod::Patch, relative_url)
    }

    /// Create a DELETE request.
    pub fn delete(relative_url: impl Into<String>) -> Self {
        Self::new(RequestMethod::Delete, relative_url)
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add a query parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((name.into(), value.into()));
        self
    }

    /// Add several query parameters.
    pub fn query_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in params {
            self.query_params.push((name.into(), value.into()));
        }
        self
    }

    /// Set JSON body.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body)?;
        self.body = Some(value);
        Ok(self)
    }

    /// Set raw JSON body.
    pub fn json_value(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Request an XML response (the $metadata document).
    pub fn accept_xml(self) -> Self {
        self.header("Accept", "application/xml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let req = ODataRequest::get("zup-demo/odata/standard.odata/Catalog_Items")
            .header("X-Custom", "value")
            .query("$top", "3");

        assert_eq!(req.method, RequestMethod::Get);
        assert_eq!(req.relative_url, "zup-demo/odata/standard.odata/Catalog_Items");
        assert_eq!(req.headers.get("X-Custom"), Some(&"value".to_string()));
        assert_eq!(req.query_params, vec![("$top".to_string(), "3".to_string())]);
    }

    #[test]
    fn test_json_body() {
        let data = serde_json::json!({"Description": "Test"});
        let req = ODataRequest::post("entity").json(&data).unwrap();
        assert_eq!(req.body, Some(data));
    }

    #[test]
    fn test_accept_xml() {
        let req = ODataRequest::get("$metadata").accept_xml();
        assert_eq!(
            req.headers.get("Accept"),
            Some(&"application/xml".to_string())
        );
    }

    #[test]
    fn test_query_params_extend() {
        let req = ODataRequest::get("entity")
            .query_params([("$top", "3"), ("$skip", "6")]);
        assert_eq!(req.query_params.len(), 2);
    }
}
