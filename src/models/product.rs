use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ---------------------------------------------------------------------------
// ProductId — opaque identifier, integer or string on the wire
// ---------------------------------------------------------------------------

/// Server-assigned product identifier.
///
/// Backends disagree on the primitive type (the local REST server hands out
/// integers, the document store strings), so the id is kept as an opaque
/// string. It is converted back to an integer on serialization only when the
/// string is a canonical integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn as_integer(&self) -> Option<i64> {
        self.0
            .parse::<i64>()
            .ok()
            .filter(|n| n.to_string() == self.0)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<i64> for ProductId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl Serialize for ProductId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_integer() {
            Some(n) => serializer.serialize_i64(n),
            None => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Self::from(n),
            Raw::Str(s) => Self(s),
        })
    }
}

// ---------------------------------------------------------------------------
// Product — a catalog line item as returned by the server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub price: f64,
    pub stock: u32,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub last_updated: String,
}

impl Product {
    /// Overlay the four editable fields onto this record and stamp `today`.
    ///
    /// Id, stock, image and rating are carried over untouched.
    pub fn merged_with(&self, edit: &ProductEdit, today: &str) -> Product {
        Product {
            name: edit.name.clone(),
            description: edit.description.clone(),
            price: edit.price,
            category: edit.category.clone(),
            last_updated: today.to_string(),
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Create body: a product without an id. The server assigns one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub stock: u32,
    pub image: String,
    pub rating: f64,
    pub last_updated: String,
}

/// Partial-update body carrying only the stock change.
///
/// `id` is only set for backends that address the record in the body rather
/// than in the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockPatch {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ProductId>,
    pub stock: u32,
    pub last_updated: String,
}

/// The fields a user may change through the edit flow.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductEdit {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
}
