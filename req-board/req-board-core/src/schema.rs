//! Client-side field schemas. They drive form generation only and are never
//! sent to or checked by the server.

use crate::record::{CollectionName, Fields};
use serde_json::Value;
use std::collections::BTreeMap;

/// Values collected from a submitted form, keyed by field name.
pub type FormValues = BTreeMap<String, String>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaField {
    /// Logical field name, used as the record key and the input `name`.
    pub name: String,
    /// Id of the input element rendered for this field.
    pub element_id: String,
}

/// Ordered mapping of field name to input element id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<SchemaField>,
}

impl Schema {
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let fields = pairs
            .into_iter()
            .map(|(name, element_id)| SchemaField {
                name: name.into(),
                element_id: element_id.into(),
            })
            .collect();
        Self { fields }
    }

    pub fn actors() -> Self {
        Self::new([("name", "actorName"), ("type", "typeName")])
    }

    pub fn requirements() -> Self {
        Self::new([("name", "requirementText"), ("type", "requirementType")])
    }

    pub fn acceptance_criteria() -> Self {
        Self::new([
            ("name", "acceptanceCriteriaText"),
            ("type", "acceptanceCriteriaType"),
        ])
    }

    /// Default schema used by the front end for `collection`.
    pub fn for_collection(collection: CollectionName) -> Self {
        match collection {
            CollectionName::Actors => Self::actors(),
            CollectionName::Requirements => Self::requirements(),
            CollectionName::AcceptanceCriteria => Self::acceptance_criteria(),
        }
    }

    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Collect submitted values into record fields, one per schema field in
    /// schema order. Fields the form did not carry become empty strings;
    /// values for names outside the schema are dropped, as a form only
    /// submits its own inputs.
    pub fn collect(&self, values: &FormValues) -> Fields {
        self.fields
            .iter()
            .map(|f| {
                let value = values.get(&f.name).cloned().unwrap_or_default();
                (f.name.clone(), Value::String(value))
            })
            .collect()
    }
}
