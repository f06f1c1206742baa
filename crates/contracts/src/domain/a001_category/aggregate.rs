use crate::domain::common::{AggregateId, LocalizedText};
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// ID Type
// ============================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CategoryId(pub i64);

impl CategoryId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for CategoryId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl AggregateId for CategoryId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        <i64 as AggregateId>::from_string(s).map(CategoryId::new)
    }
}

/// The API sends ids either as JSON numbers or as numeric strings
#[derive(Deserialize)]
#[serde(untagged)]
enum IdWire {
    Number(i64),
    Text(String),
}

impl IdWire {
    fn into_id<E: serde::de::Error>(self) -> Result<CategoryId, E> {
        match self {
            IdWire::Number(n) => Ok(CategoryId(n)),
            IdWire::Text(s) => CategoryId::from_string(&s).map_err(E::custom),
        }
    }
}

impl<'de> Deserialize<'de> for CategoryId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        IdWire::deserialize(deserializer)?.into_id()
    }
}

/// `null`, an empty string and `0` all mean "no parent"
fn deserialize_parent_id<'de, D>(deserializer: D) -> Result<Option<CategoryId>, D::Error>
where
    D: Deserializer<'de>,
{
    let wire = Option::<IdWire>::deserialize(deserializer)?;
    match wire {
        None => Ok(None),
        Some(IdWire::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(wire) => {
            let id = wire.into_id::<D::Error>()?;
            Ok(if id.0 == 0 { None } else { Some(id) })
        }
    }
}

// ============================================================================
// Record
// ============================================================================
/// Flat category row as returned by the catalog API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: CategoryId,

    #[serde(
        rename = "parentId",
        alias = "parent_id",
        default,
        deserialize_with = "deserialize_parent_id"
    )]
    pub parent_id: Option<CategoryId>,

    pub name: LocalizedText,

    #[serde(
        rename = "productCount",
        alias = "products_count",
        alias = "product_count",
        default
    )]
    pub product_count: Option<i64>,
}

impl CategoryRecord {
    pub fn new(id: i64, parent_id: Option<i64>, name: LocalizedText) -> Self {
        Self {
            id: CategoryId(id),
            parent_id: parent_id.map(CategoryId),
            name,
            product_count: None,
        }
    }

    pub fn with_product_count(mut self, count: i64) -> Self {
        self.product_count = Some(count);
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_camel_case_record() {
        let record: CategoryRecord = serde_json::from_str(
            r#"{"id": 2, "parentId": 1, "name": {"ar": "رجال", "en": "Men"}, "productCount": 14}"#,
        )
        .unwrap();
        assert_eq!(record.id, CategoryId(2));
        assert_eq!(record.parent_id, Some(CategoryId(1)));
        assert_eq!(record.name.secondary.as_deref(), Some("Men"));
        assert_eq!(record.product_count, Some(14));
    }

    #[test]
    fn test_parse_snake_case_and_string_ids() {
        let record: CategoryRecord = serde_json::from_str(
            r#"{"id": "7", "parent_id": "3", "name": "Shoes", "products_count": null}"#,
        )
        .unwrap();
        assert_eq!(record.id, CategoryId(7));
        assert_eq!(record.parent_id, Some(CategoryId(3)));
        assert_eq!(record.product_count, None);
    }

    #[test]
    fn test_zero_null_and_missing_parent_mean_root() {
        for json in [
            r#"{"id": 1, "parentId": 0, "name": "A"}"#,
            r#"{"id": 1, "parentId": null, "name": "A"}"#,
            r#"{"id": 1, "name": "A"}"#,
            r#"{"id": 1, "parentId": "", "name": "A"}"#,
        ] {
            let record: CategoryRecord = serde_json::from_str(json).unwrap();
            assert!(record.is_root(), "{json}");
        }
    }

    #[test]
    fn test_non_numeric_id_is_rejected() {
        let record: Result<CategoryRecord, _> =
            serde_json::from_str(r#"{"id": "abc", "name": "A"}"#);
        assert!(record.is_err());
    }

    #[test]
    fn test_serializes_id_as_number() {
        let record = CategoryRecord::new(4, None, LocalizedText::new("Electronics"));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], serde_json::json!(4));
        assert_eq!(json["parentId"], serde_json::Value::Null);
    }
}
