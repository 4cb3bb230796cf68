use miette::Diagnostic;
use thiserror::Error;

/// Errors surfaced to the host. Rendering itself never returns one of these;
/// they come from loading configuration, data files and documents.
#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum DollarError {
	#[error(transparent)]
	#[diagnostic(code(dollar::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(dollar::config_parse),
		help("check that dollar.toml is valid TOML with `globals`, [data] and/or [scope] entries")
	)]
	ConfigParse(String),

	#[error("failed to load data file `{path}`: {reason}")]
	#[diagnostic(code(dollar::data_file))]
	DataFile { path: String, reason: String },

	#[error("unsupported data file format: `{0}`")]
	#[diagnostic(
		code(dollar::unsupported_format),
		help("supported formats: text, json, toml, yaml, yml")
	)]
	UnsupportedDataFormat(String),

	#[error("rendering `{file}` produced {count} error(s)")]
	#[diagnostic(
		code(dollar::render),
		help("fix the statements reported above; run with `--verbose` for more detail")
	)]
	Render { file: String, count: usize },
}

/// A statement that could not be delimited. The `Display` text of each
/// variant is the exact message written to the diagnostic channel.
#[derive(Debug, Clone, Diagnostic, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SyntaxError {
	#[error("Missing {{ to match $")]
	#[diagnostic(code(dollar::missing_opening_brace))]
	MissingOpeningBrace,

	#[error("Missing }}")]
	#[diagnostic(code(dollar::missing_closing_brace))]
	MissingClosingBrace,

	#[error("Missing )")]
	#[diagnostic(code(dollar::missing_closing_paren))]
	MissingClosingParen,

	#[error("Invalid connective after if statement {0}")]
	#[diagnostic(
		code(dollar::invalid_connective),
		help("attach the else body directly to the closing brace: `}}else{{`")
	)]
	InvalidConnective(String),

	#[error("Lone escape sequence $${{ found at index {0}")]
	#[diagnostic(
		code(dollar::lone_escape),
		help("close the literal escape with `}}$$`")
	)]
	LoneEscape(usize),
}

impl SyntaxError {
	/// The offset a syntax error is reported at, given the statement's
	/// marker. A detached `else` is reported at the keyword, like the errors
	/// raised while executing a statement. Everything else points at the
	/// marker.
	pub fn reported_at(&self, marker: usize) -> usize {
		match self {
			Self::InvalidConnective(_) => marker + 1,
			_ => marker,
		}
	}
}

/// A failure while executing a statement or evaluating an expression. These
/// are recovered from by substituting empty text.
#[derive(Debug, Clone, Diagnostic, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
	#[error("Error evaluating expression: {0}")]
	#[diagnostic(code(dollar::expression))]
	Expression(String),

	#[error("Unknown statement \"{0}\"")]
	#[diagnostic(
		code(dollar::unknown_statement),
		help("available statements: escape, eval, if, foreach, declare")
	)]
	UnknownStatement(String),

	#[error("Cannot iterate type {0}")]
	#[diagnostic(code(dollar::not_iterable))]
	NotIterable(&'static str),

	#[error("Invalid foreach parameters \"{0}\"")]
	#[diagnostic(
		code(dollar::invalid_foreach),
		help("use the form `$foreach(name in expression){{...}}`")
	)]
	InvalidForeach(String),

	#[error("Invalid declare parameters")]
	#[diagnostic(
		code(dollar::invalid_declare),
		help("name the variable: `$declare(name){{value}}`")
	)]
	InvalidDeclare,
}

pub type DollarResult<T> = Result<T, DollarError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
