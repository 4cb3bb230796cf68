use std::collections::BTreeMap;
use std::fmt::Display;

use derive_more::Deref;
use derive_more::DerefMut;
use float_cmp::approx_eq;
use serde::Deserialize;
use serde::Serialize;

/// A value bound in a [`Scope`] or produced by an expression.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
	#[default]
	Null,
	Bool(bool),
	Number(f64),
	String(String),
	List(Vec<Value>),
	Map(BTreeMap<String, Value>),
}

impl Value {
	/// The name of this value's type as it appears in diagnostics.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool(_) => "boolean",
			Self::Number(_) => "number",
			Self::String(_) => "string",
			Self::List(_) => "list",
			Self::Map(_) => "map",
		}
	}

	/// `null`, `false`, `0`, `NaN` and the empty string are falsy. Everything
	/// else is truthy, including empty lists and maps.
	pub fn is_truthy(&self) -> bool {
		match self {
			Self::Null => false,
			Self::Bool(value) => *value,
			Self::Number(value) => !(*value == 0.0 || value.is_nan()),
			Self::String(value) => !value.is_empty(),
			Self::List(_) | Self::Map(_) => true,
		}
	}

	/// The elements visited by `foreach`. Lists yield their items and strings
	/// yield one single-character string per character.
	pub fn iter_elements(&self) -> Option<Vec<Value>> {
		match self {
			Self::List(items) => Some(items.clone()),
			Self::String(text) => Some(text.chars().map(|ch| Self::String(ch.to_string())).collect()),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(value) => Some(value),
			_ => None,
		}
	}

	pub fn as_number(&self) -> Option<f64> {
		match self {
			Self::Number(value) => Some(*value),
			_ => None,
		}
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Null, Self::Null) => true,
			(Self::Bool(value), Self::Bool(other_value)) => value == other_value,
			(Self::Number(value), Self::Number(other_value)) => {
				approx_eq!(f64, *value, *other_value, ulps = 2)
			}
			(Self::String(value), Self::String(other_value)) => value == other_value,
			(Self::List(value), Self::List(other_value)) => value == other_value,
			(Self::Map(value), Self::Map(other_value)) => value == other_value,
			_ => false,
		}
	}
}

/// Format a number the way it reads in a document: integral values have no
/// fractional part.
fn fmt_number(f: &mut std::fmt::Formatter<'_>, number: f64) -> std::fmt::Result {
	if number.is_nan() {
		write!(f, "NaN")
	} else if number.is_infinite() {
		let sign = if number.is_sign_negative() { "-" } else { "" };
		write!(f, "{sign}Infinity")
	} else if number.fract() == 0.0 && number.abs() < 1e21 {
		// `-0.0` prints as `0`.
		write!(f, "{}", number as i128)
	} else {
		write!(f, "{number}")
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Null => Ok(()),
			Self::Bool(value) => write!(f, "{value}"),
			Self::Number(value) => fmt_number(f, *value),
			Self::String(value) => write!(f, "{value}"),
			Self::List(items) => {
				for (index, item) in items.iter().enumerate() {
					if index > 0 {
						write!(f, ",")?;
					}
					write!(f, "{item}")?;
				}
				Ok(())
			}
			Self::Map(_) => {
				let json = serde_json::Value::from(self.clone());
				write!(f, "{json}")
			}
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::Number(value)
	}
}

macro_rules! impl_from_integer {
	($($ty:ty),*) => {
		$(
			impl From<$ty> for Value {
				fn from(value: $ty) -> Self {
					Self::Number(value as f64)
				}
			}
		)*
	};
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(value.to_string())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl<T: Into<Value>> From<Vec<T>> for Value {
	fn from(items: Vec<T>) -> Self {
		Self::List(items.into_iter().map(Into::into).collect())
	}
}

impl From<Scope> for Value {
	fn from(scope: Scope) -> Self {
		Self::Map(scope.0)
	}
}

impl From<serde_json::Value> for Value {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => Self::Null,
			serde_json::Value::Bool(value) => Self::Bool(value),
			serde_json::Value::Number(number) => Self::Number(number.as_f64().unwrap_or(f64::NAN)),
			serde_json::Value::String(value) => Self::String(value),
			serde_json::Value::Array(items) => Self::List(items.into_iter().map(Into::into).collect()),
			serde_json::Value::Object(map) => {
				Self::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
			}
		}
	}
}

impl From<Value> for serde_json::Value {
	fn from(value: Value) -> Self {
		match value {
			Value::Null => Self::Null,
			Value::Bool(value) => Self::Bool(value),
			Value::Number(number) if number.fract() == 0.0 && number.abs() < 9_007_199_254_740_992.0 => {
				Self::Number(serde_json::Number::from(number as i64))
			}
			Value::Number(number) => serde_json::Number::from_f64(number).map_or(Self::Null, Self::Number),
			Value::String(value) => Self::String(value),
			Value::List(items) => Self::Array(items.into_iter().map(Into::into).collect()),
			Value::Map(map) => Self::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect()),
		}
	}
}

/// The variables visible to a render: a mapping from name to [`Value`].
///
/// Scopes nest by copying. [`Scope::overlay`] returns a new scope so a child
/// never writes through to its parent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Deref, DerefMut)]
#[serde(transparent)]
pub struct Scope(
	#[deref]
	#[deref_mut]
	BTreeMap<String, Value>,
);

impl Scope {
	pub fn new() -> Self {
		Self::default()
	}

	/// Bind `name` to `value`, replacing any previous binding.
	pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
		self.0.insert(name.into(), value.into());
	}

	/// Builder form of [`Scope::set`].
	#[must_use]
	pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.set(name, value);
		self
	}

	/// A copy of `self` with every binding of `child` layered on top.
	#[must_use]
	pub fn overlay(&self, child: &Scope) -> Scope {
		let mut merged = self.clone();
		merged.extend(child.iter().map(|(k, v)| (k.clone(), v.clone())));
		merged
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Scope {
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}

impl IntoIterator for Scope {
	type IntoIter = std::collections::btree_map::IntoIter<String, Value>;
	type Item = (String, Value);

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}
