//! Locating markers and unwrapping literal escapes.

use crate::SyntaxError;

/// The sentinel that introduces every statement.
pub const MARKER: char = '$';
/// Opens a literal escape. Everything up to the closer is copied verbatim.
pub const LITERAL_OPEN: &str = "$${";
/// Closes a literal escape.
pub const LITERAL_CLOSE: &str = "}$$";

/// Byte offset of the next marker at or after `cursor`.
pub fn find_marker(document: &str, cursor: usize) -> Option<usize> {
	document
		.get(cursor..)
		.and_then(|rest| rest.find(MARKER))
		.map(|offset| cursor + offset)
}

/// Whether a literal escape opener starts at `index`.
pub fn is_literal_escape(document: &str, index: usize) -> bool {
	document
		.get(index..)
		.is_some_and(|rest| rest.starts_with(LITERAL_OPEN))
}

/// An unwrapped literal escape: the new document and the length of the
/// interior text now sitting at the opener's offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unwrapped {
	pub document: String,
	pub length: usize,
}

/// Remove the literal escape wrapper whose opener is at `index`.
///
/// The closer is found with a plain substring search, so braces inside the
/// escape are not counted and the first `}$$` wins.
pub fn unwrap_literal_escape(document: &str, index: usize) -> Result<Unwrapped, SyntaxError> {
	let interior_start = index + LITERAL_OPEN.len();
	let Some(close) = document
		.get(interior_start..)
		.and_then(|rest| rest.find(LITERAL_CLOSE))
		.map(|offset| interior_start + offset)
	else {
		return Err(SyntaxError::LoneEscape(index));
	};

	let interior = &document[interior_start..close];
	let mut unwrapped = String::with_capacity(document.len() - LITERAL_OPEN.len() - LITERAL_CLOSE.len());
	unwrapped.push_str(&document[..index]);
	unwrapped.push_str(interior);
	unwrapped.push_str(&document[close + LITERAL_CLOSE.len()..]);

	Ok(Unwrapped {
		length: interior.len(),
		document: unwrapped,
	})
}
