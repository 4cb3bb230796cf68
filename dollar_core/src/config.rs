use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::DollarError;
use crate::DollarResult;
use crate::Scope;
use crate::Value;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["dollar.toml", ".dollar.toml", ".config/dollar.toml"];

/// Data source entry for a `[data]` namespace.
///
/// The format is taken from the file extension unless given explicitly:
///
/// ```toml
/// [data]
/// users = "data/users.json"
/// site = { path = "site.conf", format = "toml" }
/// ```
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
#[non_exhaustive]
pub enum DataSource {
	Path(PathBuf),
	Typed(TypedDataSource),
}

impl DataSource {
	pub fn path(&self) -> &Path {
		match self {
			Self::Path(path) => path.as_path(),
			Self::Typed(typed) => typed.path.as_path(),
		}
	}

	/// The explicit format, or the lowercased file extension.
	pub fn format(&self) -> String {
		match self {
			Self::Path(path) => {
				path.extension()
					.and_then(|e| e.to_str())
					.unwrap_or("")
					.to_ascii_lowercase()
			}
			Self::Typed(typed) => typed.format.trim().to_ascii_lowercase(),
		}
	}
}

/// Typed data source configuration for `[data]` entries.
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
pub struct TypedDataSource {
	pub path: PathBuf,
	pub format: String,
}

/// Configuration loaded from a `dollar.toml` file.
///
/// ```toml
/// globals = "content/globals.html"
///
/// [data]
/// users = "data/users.json"
///
/// [scope]
/// title = "Home"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct DollarConfig {
	/// Document whose `declare` statements populate the global scope.
	#[serde(default)]
	pub globals: Option<PathBuf>,
	/// Map of scope variable name to a data file providing its value.
	#[serde(default)]
	pub data: BTreeMap<String, DataSource>,
	/// Inline scope values. These win over `[data]` entries with the same
	/// name.
	#[serde(default)]
	pub scope: BTreeMap<String, toml::Value>,
}

impl DollarConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if the file does not exist.
	pub fn load(root: &Path) -> DollarResult<Option<DollarConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: DollarConfig =
			toml::from_str(&content).map_err(|e| DollarError::ConfigParse(e.to_string()))?;

		Ok(Some(config))
	}

	/// Read the globals document, if one is configured.
	pub fn globals_document(&self, root: &Path) -> DollarResult<Option<String>> {
		let Some(path) = &self.globals else {
			return Ok(None);
		};

		Ok(Some(std::fs::read_to_string(root.join(path))?))
	}

	/// Build the render scope from every `[data]` file followed by the inline
	/// `[scope]` values.
	pub fn load_scope(&self, root: &Path) -> DollarResult<Scope> {
		let mut scope = Scope::new();

		for (name, source) in &self.data {
			let rel_path = source.path();
			let path_display = rel_path.display().to_string();
			let content =
				std::fs::read_to_string(root.join(rel_path)).map_err(|e| DollarError::DataFile {
					path: path_display.clone(),
					reason: e.to_string(),
				})?;
			let value = parse_data_file(&content, &source.format(), &path_display)?;
			scope.set(name.as_str(), value);
		}

		for (name, value) in &self.scope {
			scope.set(name.as_str(), toml_to_value(value.clone()));
		}

		Ok(scope)
	}
}

/// Parse the contents of a data file into a [`Value`].
pub fn parse_data_file(content: &str, format: &str, path_display: &str) -> DollarResult<Value> {
	let data_error = |reason: String| {
		DollarError::DataFile {
			path: path_display.to_string(),
			reason,
		}
	};

	match format {
		"text" | "string" | "raw" | "txt" => Ok(Value::String(content.to_string())),
		"json" => {
			serde_json::from_str::<serde_json::Value>(content)
				.map(Value::from)
				.map_err(|e| data_error(e.to_string()))
		}
		"toml" => {
			toml::from_str::<toml::Table>(content)
				.map(|table| toml_to_value(toml::Value::Table(table)))
				.map_err(|e| data_error(e.to_string()))
		}
		"yaml" | "yml" => {
			serde_yaml_ng::from_str::<serde_json::Value>(content)
				.map(Value::from)
				.map_err(|e| data_error(e.to_string()))
		}
		other => Err(DollarError::UnsupportedDataFormat(other.to_string())),
	}
}

/// Convert a `toml::Value` to a [`Value`]. Datetimes become their string
/// form.
fn toml_to_value(value: toml::Value) -> Value {
	match value {
		toml::Value::String(s) => Value::String(s),
		toml::Value::Integer(i) => Value::Number(i as f64),
		toml::Value::Float(f) => Value::Number(f),
		toml::Value::Boolean(b) => Value::Bool(b),
		toml::Value::Datetime(dt) => Value::String(dt.to_string()),
		toml::Value::Array(arr) => Value::List(arr.into_iter().map(toml_to_value).collect()),
		toml::Value::Table(table) => {
			Value::Map(table.into_iter().map(|(k, v)| (k, toml_to_value(v))).collect())
		}
	}
}
