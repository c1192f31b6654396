use serde::{Deserialize, Serialize};

use crate::{FILE_SERVICE_FIELD, SERVICE_METHOD_FIELD};

/// Comments `protoc` attached to a single source location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comments {
    #[serde(default)]
    pub leading:          Option<String>,
    #[serde(default)]
    pub trailing:         Option<String>,
    #[serde(default)]
    pub leading_detached: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub path:     Vec<i32>,
    pub comments: Comments,
}

/// Source comments keyed by descriptor location path.
///
/// Paths follow `SourceCodeInfo.Location.path`: the `n`th service of a file
/// is `[6, n]` and its `m`th method is `[6, n, 2, m]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentTable {
    locations: Vec<Location>,
}

impl CommentTable {
    pub fn new(locations: Vec<Location>) -> Self {
        Self { locations }
    }

    pub fn insert(&mut self, path: Vec<i32>, comments: Comments) {
        self.locations.push(Location { path, comments });
    }

    /// First location recorded for `path`.
    pub fn get(&self, path: &[i32]) -> Option<&Comments> {
        self.locations
            .iter()
            .find(|loc| loc.path == path)
            .map(|loc| &loc.comments)
    }

    pub fn leading(&self, path: &[i32]) -> Option<&str> {
        self.get(path).and_then(|c| c.leading.as_deref())
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

pub fn service_path(service: usize) -> Vec<i32> {
    vec![FILE_SERVICE_FIELD, service as i32]
}

pub fn method_path(service: usize, method: usize) -> Vec<i32> {
    vec![FILE_SERVICE_FIELD, service as i32, SERVICE_METHOD_FIELD, method as i32]
}
