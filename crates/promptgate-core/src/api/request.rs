use reqwest::Method;
use serde_json::Value;

/// A single API request, assembled per call and never persisted.
///
/// Named builder methods replace ad-hoc parameter merging: caller-supplied
/// query parameters, body, and headers pass through untouched, while the
/// gateway injects the credential headers itself. Those two fields always
/// hold the gateway's current values regardless of what the caller set.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
    headers: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Add a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set the JSON body.
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a header. Credential headers set here are replaced by the
    /// gateway's current values.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    pub(crate) fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub(crate) fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_all_parts() {
        let request = ApiRequest::post("/api/v1/session/create")
            .query("verbose", "true")
            .header("X-Request-Source", "tests")
            .json(serde_json::json!({ "sessionName": "X" }));

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.path(), "/api/v1/session/create");
        assert_eq!(
            request.query_params().to_vec(),
            vec![("verbose".to_string(), "true".to_string())]
        );
        assert_eq!(
            request.headers().to_vec(),
            vec![("X-Request-Source".to_string(), "tests".to_string())]
        );
        assert_eq!(
            request.body(),
            Some(&serde_json::json!({ "sessionName": "X" }))
        );
    }

    #[test]
    fn get_requests_start_bare() {
        let request = ApiRequest::get("/api/v1/models");
        assert_eq!(request.method(), &Method::GET);
        assert!(request.query_params().is_empty());
        assert!(request.body().is_none());
        assert!(request.headers().is_empty());
    }
}
