//! Application-level hash join
//!
//! Merges right-side documents into left-side documents on a local field
//! path and a top-level foreign field. Copied right fields are prefixed
//! with `<rightName>_`; the identity field is never copied.
//!
//! Two branches, chosen per left document:
//!
//! - nested array: the local path's parent resolves to an array. Each
//!   element is looked up by the leaf key. Unmatched elements are dropped,
//!   matched elements fan out to one copy per matching right document. The
//!   left document survives only if the rebuilt array is non-empty.
//! - scalar: the full local path is looked up directly. Every match is
//!   merged onto the left document, later matches overwriting earlier ones.
//!   The left document always survives, matched or not.

use serde_json::{Map, Value};

use super::errors::{JoinError, JoinResult};
use super::index::JoinIndex;
use super::path::FieldPath;
use crate::config::JoinConfig;
use crate::observability::{log_event_with_fields, Event};

/// Validated join parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSpec {
    local_field: FieldPath,
    foreign_field: String,
    right_name: String,
}

impl JoinSpec {
    /// Validates the local path and foreign field
    pub fn new(local_field: &str, foreign_field: &str, right_name: &str) -> JoinResult<Self> {
        if foreign_field.is_empty() {
            return Err(JoinError::InvalidFieldPath {
                path: foreign_field.to_string(),
                reason: "foreign field is empty",
            });
        }

        Ok(Self {
            local_field: FieldPath::parse(local_field)?,
            foreign_field: foreign_field.to_string(),
            right_name: right_name.to_string(),
        })
    }

    pub fn local_field(&self) -> &FieldPath {
        &self.local_field
    }

    pub fn foreign_field(&self) -> &str {
        &self.foreign_field
    }

    pub fn right_name(&self) -> &str {
        &self.right_name
    }
}

/// Stateless join engine
#[derive(Debug, Clone)]
pub struct JoinEngine {
    identity_field: String,
    copy_join_key: bool,
}

impl Default for JoinEngine {
    fn default() -> Self {
        Self::new(&JoinConfig::default())
    }
}

impl JoinEngine {
    pub fn new(config: &JoinConfig) -> Self {
        Self {
            identity_field: config.identity_field.clone(),
            copy_join_key: config.copy_join_key,
        }
    }

    /// Joins `left` with `right`. Left documents are consumed and returned
    /// (possibly rewritten); right documents are only read.
    pub fn join(&self, left: Vec<Value>, right: &[Value], spec: &JoinSpec) -> Vec<Value> {
        let index = JoinIndex::build(right, &spec.foreign_field);
        log_event_with_fields(
            Event::JoinIndexBuilt,
            &[
                ("foreign_field", &spec.foreign_field),
                ("keys", &index.key_count().to_string()),
                ("documents", &index.indexed_documents().to_string()),
            ],
        );

        let (parent, leaf) = spec.local_field.split_last();
        let left_count = left.len();
        let mut merged = Vec::with_capacity(left_count);

        for mut document in left {
            let rebuilt = parent.as_ref().and_then(|parent| match parent.resolve(&document) {
                Some(Value::Array(elements)) => {
                    Some((parent, self.rebuild_elements(elements, leaf, &index, spec)))
                }
                _ => None,
            });

            match rebuilt {
                Some((parent, elements)) => {
                    if !elements.is_empty() && parent.replace(&mut document, Value::Array(elements)) {
                        merged.push(document);
                    }
                }
                None => {
                    if let Some(matches) = spec
                        .local_field
                        .resolve(&document)
                        .and_then(|key| index.lookup(key))
                    {
                        if let Some(target) = document.as_object_mut() {
                            for right_document in matches {
                                self.merge_into(target, right_document, spec);
                            }
                        }
                    }
                    merged.push(document);
                }
            }
        }

        log_event_with_fields(
            Event::JoinComplete,
            &[
                ("right_name", &spec.right_name),
                ("left_documents", &left_count.to_string()),
                ("merged_documents", &merged.len().to_string()),
            ],
        );

        merged
    }

    /// Rebuilds a nested array: unmatched or non-mapping elements are
    /// dropped, matched elements fan out once per matching right document.
    fn rebuild_elements(
        &self,
        elements: &[Value],
        leaf: &str,
        index: &JoinIndex<'_>,
        spec: &JoinSpec,
    ) -> Vec<Value> {
        let mut rebuilt = Vec::new();

        for element in elements.iter().filter_map(Value::as_object) {
            let Some(matches) = element.get(leaf).and_then(|key| index.lookup(key)) else {
                continue;
            };

            for right_document in matches {
                let mut copy = element.clone();
                self.merge_into(&mut copy, right_document, spec);
                rebuilt.push(Value::Object(copy));
            }
        }

        rebuilt
    }

    fn merge_into(
        &self,
        target: &mut Map<String, Value>,
        right_document: &Map<String, Value>,
        spec: &JoinSpec,
    ) {
        for (field, value) in right_document {
            if *field == self.identity_field {
                continue;
            }
            if !self.copy_join_key && *field == spec.foreign_field {
                continue;
            }
            target.insert(format!("{}_{}", spec.right_name, field), value.clone());
        }
    }
}

/// Joins with default settings
pub fn join_documents(
    left: Vec<Value>,
    right: &[Value],
    local_field: &str,
    foreign_field: &str,
    right_name: &str,
) -> JoinResult<Vec<Value>> {
    let spec = JoinSpec::new(local_field, foreign_field, right_name)?;
    Ok(JoinEngine::default().join(left, right, &spec))
}
