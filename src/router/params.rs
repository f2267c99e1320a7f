//! Parameter maps shared by recognition and URL generation.

use serde_json::Value;
use std::collections::BTreeMap;

/// Route parameters keyed by segment / option name (without the leading colon).
///
/// A `BTreeMap` keeps iteration sorted, which is what URL generation compares
/// against when it checks a parameter set against a route's key set.
pub type Params = BTreeMap<String, String>;

/// Build a [`Params`] map from `key => value` pairs.
///
/// Values go through `ToString`, so numeric ids can be passed directly:
///
/// ```
/// use switchyard::params;
///
/// let p = params! { "controller" => "users", "action" => "edit", "id" => 42 };
/// assert_eq!(p["id"], "42");
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::router::Params::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::router::Params::new();
        $(
            map.insert(::std::string::ToString::to_string(&$key), ::std::string::ToString::to_string(&$value));
        )+
        map
    }};
}

/// Anything that can stand in for a model record when generating a named URL.
///
/// `router.url_for_named("video_path", NamedParams::from_model(&video))`
/// fills `:id` from the record.
pub trait Identifiable {
    /// Identifier used for the `:id` segment.
    fn id(&self) -> String;
}

/// Second argument of named URL generation, normalized to a parameter map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NamedParams(pub Params);

impl NamedParams {
    /// Parameters taken from a model record (`{id: model.id()}`).
    #[must_use]
    pub fn from_model<M: Identifiable + ?Sized>(model: &M) -> Self {
        Self::id(model.id())
    }

    /// Just an `id`.
    #[must_use]
    pub fn id(id: impl ToString) -> Self {
        let mut params = Params::new();
        params.insert("id".to_string(), id.to_string());
        Self(params)
    }

    #[must_use]
    pub fn into_params(self) -> Params {
        self.0
    }
}

impl From<Params> for NamedParams {
    fn from(params: Params) -> Self {
        Self(params)
    }
}

impl From<u64> for NamedParams {
    fn from(id: u64) -> Self {
        Self::id(id)
    }
}

impl From<i64> for NamedParams {
    fn from(id: i64) -> Self {
        Self::id(id)
    }
}

impl From<u32> for NamedParams {
    fn from(id: u32) -> Self {
        Self::id(id)
    }
}

impl From<i32> for NamedParams {
    fn from(id: i32) -> Self {
        Self::id(id)
    }
}

impl From<&Value> for NamedParams {
    /// Numbers become `{id}`, `{"data": {"id": ..}}` records become `{id}`,
    /// other objects contribute their scalar fields. Anything else is empty.
    fn from(value: &Value) -> Self {
        match value {
            Value::Number(n) => Self::id(n),
            Value::Object(map) => {
                if let Some(id) = map.get("data").and_then(|data| data.get("id")) {
                    if let Some(id) = scalar_to_string(id) {
                        return Self::id(id);
                    }
                }
                Self(
                    map.iter()
                        .filter_map(|(k, v)| scalar_to_string(v).map(|s| (k.clone(), s)))
                        .collect(),
                )
            }
            _ => Self::default(),
        }
    }
}

impl From<Value> for NamedParams {
    fn from(value: Value) -> Self {
        Self::from(&value)
    }
}

/// String form of a JSON scalar; `None` for arrays, objects and null.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
