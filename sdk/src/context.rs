use std::collections::BTreeMap;

pub const PACKAGE_NAME: &str = "package_name";
pub const SERVICE_NAME: &str = "service_name";
pub const REQUEST: &str = "request";
pub const HTTP_METHOD: &str = "http_method";
pub const URL: &str = "url";
pub const CONTENT_TYPE: &str = "content-type";
pub const ENDPOINT: &str = "endpoint";
pub const RESPONSE: &str = "response";
pub const STATUS_CODE: &str = "status_code";
pub const EXCEPTION: &str = "exception";

/// Key/value facts gathered while a single request is handled.
///
/// Every hook sees it, and every error body carries all of it in `meta`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    values: BTreeMap<String, String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: &str, value: impl ToString) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
