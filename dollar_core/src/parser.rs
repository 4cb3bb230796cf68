use crate::SyntaxError;
use crate::matcher::BRACES;
use crate::matcher::PARENS;
use crate::matcher::find_region_end;

const ELSE: &str = "else";

/// A statement delimited in the document but not yet executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
	/// The text between the marker and the parameters or body. Empty for
	/// the default `escape` statement.
	pub keyword: String,
	/// The raw text between the parentheses, if any.
	pub parameters: Option<String>,
	/// The raw text between the body braces.
	pub block: String,
	/// The raw text of a trailing `else{...}` body.
	pub else_block: Option<String>,
	/// Offset of the marker.
	pub marker: usize,
	/// Offset just past the marker, where parsing began.
	pub start: usize,
	/// Offset just past the last closing brace.
	pub end: usize,
}

/// Parse the statement whose marker sits immediately before `start`.
///
/// Only delimits raw text. Nothing is evaluated and nested statements inside
/// the body are left for a later pass.
pub fn parse_statement(document: &str, start: usize) -> Result<Statement, SyntaxError> {
	let first_brace = find_from(document, start, '{').ok_or(SyntaxError::MissingOpeningBrace)?;
	let first_paren = find_from(document, start, '(').filter(|paren| *paren < first_brace);

	let (keyword, parameters, brace) = match first_paren {
		Some(paren) => {
			let params_end =
				find_region_end(document, PARENS, paren).ok_or(SyntaxError::MissingClosingParen)?;
			let brace =
				find_from(document, params_end, '{').ok_or(SyntaxError::MissingOpeningBrace)?;
			(
				&document[start..paren],
				Some(document[paren + 1..params_end - 1].to_string()),
				brace,
			)
		}
		None => (&document[start..first_brace], None, first_brace),
	};

	let block_end =
		find_region_end(document, BRACES, brace).ok_or(SyntaxError::MissingClosingBrace)?;
	let block = document[brace + 1..block_end - 1].to_string();
	let trailing = &document[block_end..];

	let (else_block, end) = if trailing.starts_with("else{") {
		let else_brace = block_end + ELSE.len();
		let else_end = find_region_end(document, BRACES, else_brace)
			.ok_or(SyntaxError::MissingClosingBrace)?;
		(Some(document[else_brace + 1..else_end - 1].to_string()), else_end)
	} else {
		if keyword == "if" && is_detached_else(trailing) {
			return Err(SyntaxError::InvalidConnective(
				parameters.unwrap_or_default(),
			));
		}
		(None, block_end)
	};

	Ok(Statement {
		keyword: keyword.to_string(),
		parameters,
		block,
		else_block,
		marker: start.saturating_sub(1),
		start,
		end,
	})
}

fn find_from(document: &str, from: usize, needle: char) -> Option<usize> {
	document
		.get(from..)
		.and_then(|rest| rest.find(needle))
		.map(|offset| from + offset)
}

/// An `else` body separated from the `if` body by whitespace, e.g.
/// `} else {`. Only called when the text does not start with `else{`.
fn is_detached_else(trailing: &str) -> bool {
	trailing
		.trim_start()
		.strip_prefix(ELSE)
		.is_some_and(|rest| rest.trim_start().starts_with('{'))
}
