use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::RegistryError;

/// Identifier handed out by a registry. The first id of every registry is 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    pub const FIRST: EntityId = EntityId(1);

    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> EntityId {
        EntityId(self.0 + 1)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A closed family of creation strategies keyed by a tag.
///
/// Each variant validates its own required attributes in `build`. The
/// registry calls `build` before it touches the counter, so a rejected
/// record never consumes an id.
pub trait EntityKind:
    Copy + Eq + fmt::Debug + fmt::Display + Serialize + Send + Sync + 'static
{
    type Record: Clone + fmt::Debug + Send + Sync + Serialize + 'static;

    /// Family label used in errors and logs, e.g. "employee".
    const FAMILY: &'static str;

    /// Resolve a caller-supplied tag to a strategy.
    fn from_tag(tag: &str) -> Option<Self>;

    /// Every tag `from_tag` accepts, in canonical spelling.
    fn tags() -> &'static [&'static str];

    fn build(&self, attrs: &Attributes) -> Result<Self::Record, RegistryError>;
}

/// An entity created and owned by a [`Registry`](super::Registry).
///
/// Fields are private and there is no public constructor: the only way to
/// obtain one is through a registry's `create`.
#[derive(Clone, Debug, Serialize)]
pub struct Entity<K: EntityKind> {
    id: EntityId,
    kind: K,
    record: K::Record,
    created_at: DateTime<Utc>,
}

impl<K: EntityKind> Entity<K> {
    pub(crate) fn new(id: EntityId, kind: K, record: K::Record) -> Arc<Self> {
        Arc::new(Self {
            id,
            kind,
            record,
            created_at: Utc::now(),
        })
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> K {
        self.kind
    }

    #[inline]
    pub fn record(&self) -> &K::Record {
        &self.record
    }

    /// UTC time at which the registry accepted this entity.
    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Serialize the entity for export, e.g. a JSON snapshot of a registry.
    pub fn to_json(&self) -> Result<Value, RegistryError> {
        serde_json::to_value(self)
            .map_err(|e| RegistryError::Internal(format!("entity {} not serializable: {}", self.id, e)))
    }
}

/// Attribute name to value mapping passed to `create`.
///
/// Accessors validate as they read and report failures as
/// `RegistryError::InvalidAttributes` tagged with the kind being built.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    inner: BTreeMap<String, Value>,
}

impl Attributes {
    pub fn new() -> Self {
        Self {
            inner: BTreeMap::new(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.inner.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.inner.get(name)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// A present, non-blank string, returned exactly as supplied.
    pub fn required_str(&self, kind: &dyn fmt::Display, name: &str) -> Result<String, RegistryError> {
        match self.optional_str(kind, name)? {
            Some(s) => Ok(s),
            None => Err(RegistryError::invalid(kind, format!("missing required attribute '{name}'"))),
        }
    }

    /// `None` when absent or null; an error when present but not a string
    /// or blank.
    pub fn optional_str(&self, kind: &dyn fmt::Display, name: &str) -> Result<Option<String>, RegistryError> {
        match self.inner.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => {
                Err(RegistryError::invalid(kind, format!("attribute '{name}' must not be empty")))
            }
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(RegistryError::invalid(
                kind,
                format!("attribute '{name}' must be a string, got {other}"),
            )),
        }
    }

    /// A present, finite, non-negative number.
    pub fn required_amount(&self, kind: &dyn fmt::Display, name: &str) -> Result<f64, RegistryError> {
        match self.optional_amount(kind, name)? {
            Some(v) => Ok(v),
            None => Err(RegistryError::invalid(kind, format!("missing required attribute '{name}'"))),
        }
    }

    pub fn optional_amount(&self, kind: &dyn fmt::Display, name: &str) -> Result<Option<f64>, RegistryError> {
        let value = match self.inner.get(name) {
            None | Some(Value::Null) => return Ok(None),
            Some(v) => v,
        };

        let amount = value.as_f64().ok_or_else(|| {
            RegistryError::invalid(kind, format!("attribute '{name}' must be a number, got {value}"))
        })?;

        if !amount.is_finite() || amount < 0.0 {
            return Err(RegistryError::invalid(
                kind,
                format!("attribute '{name}' must be a non-negative amount, got {amount}"),
            ));
        }

        Ok(Some(amount))
    }
}

impl<N: Into<String>, V: Into<Value>> FromIterator<(N, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (name, value) in iter {
            attrs.insert(name, value);
        }
        attrs
    }
}
