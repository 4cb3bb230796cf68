use std::fmt::Display;

use crate::Diagnostic;
use crate::EvalError;
use crate::Scope;
use crate::Statement;
use crate::Value;
use crate::engine::Pass;
use crate::evaluate::evaluate;

/// The built-in statements. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
	/// `${expr}`: insert the value as final text.
	Escape,
	/// `$eval{expr}`: insert the value and scan it again.
	Eval,
	/// `$if(cond){then}else{otherwise}`
	If,
	/// `$foreach(name in expr){body}`
	Foreach,
	/// `$declare(name){raw text}`
	Declare,
}

impl Keyword {
	/// Resolve a statement keyword. The empty keyword is `escape`.
	pub fn parse(keyword: &str) -> Option<Self> {
		match keyword {
			"" | "escape" => Some(Self::Escape),
			"eval" => Some(Self::Eval),
			"if" => Some(Self::If),
			"foreach" => Some(Self::Foreach),
			"declare" => Some(Self::Declare),
			_ => None,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Escape => "escape",
			Self::Eval => "eval",
			Self::If => "if",
			Self::Foreach => "foreach",
			Self::Declare => "declare",
		}
	}
}

impl Display for Keyword {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// The text a statement is replaced with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
	pub text: String,
	/// How many bytes of `text` the scanner must step over without looking
	/// for markers.
	pub skip: Option<usize>,
}

impl Outcome {
	fn text(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			skip: None,
		}
	}

	fn literal(text: String) -> Self {
		Self {
			skip: Some(text.len()),
			text,
		}
	}
}

/// Run `statement` against `scope`. Failures are reported to `pass` and
/// produce empty text.
pub(crate) fn execute(statement: &Statement, scope: &mut Scope, pass: &mut Pass) -> Outcome {
	let Some(keyword) = Keyword::parse(&statement.keyword) else {
		pass.report(Diagnostic::error(
			EvalError::UnknownStatement(statement.keyword.clone()),
			Some(statement.start),
		));
		return Outcome::default();
	};

	tracing::trace!(%keyword, start = statement.start, "executing statement");

	match keyword {
		Keyword::Escape => escape(statement, scope, pass),
		Keyword::Eval => eval(statement, scope, pass),
		Keyword::If => branch(statement, scope, pass),
		Keyword::Foreach => foreach(statement, scope, pass),
		Keyword::Declare => declare(statement, scope, pass),
	}
}

/// Evaluate `code`, reporting a failure and substituting an empty string.
fn evaluate_or_report(code: &str, scope: &Scope, pass: &mut Pass) -> Value {
	evaluate(code, scope).unwrap_or_else(|error| {
		pass.report(Diagnostic::error(error, None));
		Value::String(String::new())
	})
}

fn escape(statement: &Statement, scope: &Scope, pass: &mut Pass) -> Outcome {
	let value = evaluate_or_report(&statement.block, scope, pass);
	Outcome::literal(value.to_string())
}

fn eval(statement: &Statement, scope: &Scope, pass: &mut Pass) -> Outcome {
	let value = evaluate_or_report(&statement.block, scope, pass);
	Outcome::text(value.to_string())
}

/// The chosen branch is returned unrendered. Statements inside it are picked
/// up by the enclosing scan with the enclosing scope.
fn branch(statement: &Statement, scope: &Scope, pass: &mut Pass) -> Outcome {
	let condition = evaluate_or_report(statement.parameters.as_deref().unwrap_or_default(), scope, pass);

	if condition.is_truthy() {
		Outcome::text(statement.block.as_str())
	} else {
		Outcome::text(statement.else_block.clone().unwrap_or_default())
	}
}

/// Each iteration renders the body immediately in its own child scope.
fn foreach(statement: &Statement, scope: &Scope, pass: &mut Pass) -> Outcome {
	let parameters = statement.parameters.as_deref().unwrap_or_default();
	let Some((name, expression)) = parameters.split_once(" in ") else {
		pass.report(Diagnostic::error(
			EvalError::InvalidForeach(parameters.to_string()),
			Some(statement.start),
		));
		return Outcome::default();
	};

	let collection = evaluate_or_report(expression, scope, pass);
	let Some(elements) = collection.iter_elements() else {
		pass.report(Diagnostic::error(
			EvalError::NotIterable(collection.kind()),
			Some(statement.start),
		));
		return Outcome::default();
	};

	let name = name.trim();
	let mut rendered = String::new();
	for element in elements {
		let mut child = scope.clone();
		child.set(name, element);
		rendered.push_str(&pass.render(&statement.block, &mut child));
	}

	Outcome::text(rendered)
}

/// Declared values are the raw, unevaluated body text.
fn declare(statement: &Statement, scope: &mut Scope, pass: &mut Pass) -> Outcome {
	let name = statement.parameters.as_deref().map(str::trim).unwrap_or_default();
	if name.is_empty() {
		pass.report(Diagnostic::error(EvalError::InvalidDeclare, Some(statement.start)));
		return Outcome::default();
	}

	scope.set(name, statement.block.as_str());
	Outcome::default()
}
