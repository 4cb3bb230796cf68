use crate::Diagnostic;
use crate::Scope;
use crate::executor::execute;
use crate::parser::parse_statement;
use crate::scanner::LITERAL_OPEN;
use crate::scanner::find_marker;
use crate::scanner::is_literal_escape;
use crate::scanner::unwrap_literal_escape;

/// The output of a render together with every diagnostic it raised.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rendered {
	pub content: String,
	pub diagnostics: Vec<Diagnostic>,
}

impl Rendered {
	/// Returns true if any statement failed to parse or evaluate.
	pub fn has_errors(&self) -> bool {
		self.diagnostics.iter().any(Diagnostic::is_error)
	}
}

/// The bindings collected from a declarations document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Declarations {
	pub scope: Scope,
	pub diagnostics: Vec<Diagnostic>,
}

/// Renders documents against a caller scope layered over a global scope.
///
/// The global scope is written through `&mut self` ([`Engine::load_globals`])
/// and only read by renders, which take `&self`. An engine that has finished
/// loading can be shared freely between threads.
#[derive(Debug, Clone, Default)]
pub struct Engine {
	globals: Scope,
}

impl Engine {
	pub fn new() -> Self {
		Self::default()
	}

	/// An engine whose global scope is `globals`.
	pub fn with_globals(globals: Scope) -> Self {
		Self { globals }
	}

	pub fn globals(&self) -> &Scope {
		&self.globals
	}

	/// Render `document` with `scope` layered over the global scope.
	///
	/// Malformed statements never fail the render. They are reported through
	/// `tracing` and replaced with empty or partial text.
	pub fn render(&self, document: &str, scope: &Scope) -> String {
		self.render_with_diagnostics(document, scope).content
	}

	/// Like [`Engine::render`], also returning the diagnostics.
	pub fn render_with_diagnostics(&self, document: &str, scope: &Scope) -> Rendered {
		tracing::debug!(length = document.len(), "rendering document");
		let mut active = self.globals.overlay(scope);
		let mut pass = Pass::new();
		let content = pass.render(document, &mut active);

		Rendered {
			content,
			diagnostics: pass.diagnostics,
		}
	}

	/// Render `document` starting from an empty scope, without the global
	/// scope, and return the bindings its `declare` statements produced. All
	/// other output is discarded.
	pub fn collect_declarations(&self, document: &str) -> Declarations {
		tracing::debug!(length = document.len(), "collecting declarations");
		let mut scope = Scope::new();
		let mut pass = Pass::new();
		pass.render(document, &mut scope);

		Declarations {
			scope,
			diagnostics: pass.diagnostics,
		}
	}

	/// Replace the global scope with the declarations in `document`.
	///
	/// The returned diagnostics end with a log entry counting the loaded
	/// declarations.
	pub fn load_globals(&mut self, document: &str) -> Vec<Diagnostic> {
		let Declarations {
			scope,
			mut diagnostics,
		} = self.collect_declarations(document);
		tracing::debug!(count = scope.len(), "loaded global declarations");

		let loaded = Diagnostic::log(
			format!("Loaded {} global declaration(s)", scope.len()),
			None,
		);
		loaded.emit();
		diagnostics.push(loaded);

		self.globals = scope;
		diagnostics
	}
}

/// State shared by one top-level render and the nested renders it triggers.
pub(crate) struct Pass {
	diagnostics: Vec<Diagnostic>,
}

impl Pass {
	fn new() -> Self {
		Self {
			diagnostics: vec![],
		}
	}

	pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
		diagnostic.emit();
		self.diagnostics.push(diagnostic);
	}

	/// Scan `document` for markers until none remain, splicing each
	/// statement's result back into the text. `declare` statements write
	/// into `scope`.
	pub(crate) fn render(&mut self, document: &str, scope: &mut Scope) -> String {
		let mut content = document.to_string();
		let mut cursor = 0;

		while let Some(index) = find_marker(&content, cursor) {
			if is_literal_escape(&content, index) {
				match unwrap_literal_escape(&content, index) {
					Ok(unwrapped) => {
						content = unwrapped.document;
						cursor = index + unwrapped.length;
					}
					Err(error) => {
						self.report(Diagnostic::error(error, None));
						cursor = index + LITERAL_OPEN.len();
					}
				}
				continue;
			}

			match parse_statement(&content, index + 1) {
				Ok(statement) => {
					let outcome = execute(&statement, scope, self);
					content.replace_range(index..statement.end, &outcome.text);
					cursor = index + outcome.skip.unwrap_or(0);
				}
				Err(error) => {
					let at = error.reported_at(index);
					self.report(Diagnostic::error(error, Some(at)));
					cursor = index + 1;
				}
			}
		}

		content
	}
}
