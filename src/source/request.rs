//! Namespaces and query requests handed to a document source

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A database/collection pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Namespace {
    pub db: String,
    pub collection: String,
}

impl Namespace {
    pub fn new(db: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            db: db.into(),
            collection: collection.into(),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.db, self.collection)
    }
}

/// Kind of query being diagnosed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    /// Point lookup / find
    Find,
    Count,
    Aggregate,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Find => "find",
            QueryType::Count => "count",
            QueryType::Aggregate => "aggregate",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A query whose execution plan should be explained
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "queryType", rename_all = "lowercase")]
pub enum QueryRequest {
    Find {
        #[serde(default)]
        filter: Map<String, Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sort: Option<Map<String, Value>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        projection: Option<Map<String, Value>>,
    },
    Count {
        #[serde(default)]
        filter: Map<String, Value>,
    },
    Aggregate {
        pipeline: Vec<Value>,
    },
}

impl QueryRequest {
    /// A find request with only a filter
    pub fn find(filter: Map<String, Value>) -> Self {
        QueryRequest::Find {
            filter,
            sort: None,
            limit: None,
            projection: None,
        }
    }

    pub fn count(filter: Map<String, Value>) -> Self {
        QueryRequest::Count { filter }
    }

    pub fn aggregate(pipeline: Vec<Value>) -> Self {
        QueryRequest::Aggregate { pipeline }
    }

    /// Returns the kind of query
    pub fn query_type(&self) -> QueryType {
        match self {
            QueryRequest::Find { .. } => QueryType::Find,
            QueryRequest::Count { .. } => QueryType::Count,
            QueryRequest::Aggregate { .. } => QueryType::Aggregate,
        }
    }

    /// Projection relevant to index coverage. Only find queries carry one.
    pub fn projection(&self) -> Option<&Map<String, Value>> {
        match self {
            QueryRequest::Find { projection, .. } => projection.as_ref(),
            _ => None,
        }
    }

    /// Renders the explain command a driver-backed source sends for this
    /// request, always at `executionStats` verbosity.
    pub fn explain_command(&self, collection: &str) -> Value {
        let command = match self {
            QueryRequest::Find {
                filter,
                sort,
                limit,
                projection,
            } => {
                let mut find = Map::new();
                find.insert("find".into(), json!(collection));
                find.insert("filter".into(), Value::Object(filter.clone()));
                if let Some(sort) = sort {
                    find.insert("sort".into(), Value::Object(sort.clone()));
                }
                if let Some(limit) = limit {
                    find.insert("limit".into(), json!(limit));
                }
                if let Some(projection) = projection {
                    find.insert("projection".into(), Value::Object(projection.clone()));
                }
                Value::Object(find)
            }
            QueryRequest::Count { filter } => json!({
                "count": collection,
                "query": filter,
            }),
            QueryRequest::Aggregate { pipeline } => json!({
                "aggregate": collection,
                "pipeline": pipeline,
                "cursor": {},
            }),
        };

        json!({
            "explain": command,
            "verbosity": "executionStats",
        })
    }
}

/// A bounded document fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchRequest {
    #[serde(default)]
    pub filter: Map<String, Value>,
    pub limit: u64,
    #[serde(default)]
    pub skip: u64,
}

impl FetchRequest {
    pub fn new(filter: Map<String, Value>, limit: u64, skip: u64) -> Self {
        Self {
            filter,
            limit,
            skip,
        }
    }
}
