use std::ops::Range;

use logos::Logos;
use snailquote::unescape;

/// Tokens of the expression language used inside statement bodies and
/// parameters.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
	#[token("(")]
	ParenOpen,
	#[token(")")]
	ParenClose,
	#[token("[")]
	BracketOpen,
	#[token("]")]
	BracketClose,
	#[token(",")]
	Comma,
	#[token(".")]
	Dot,
	#[token("?")]
	Question,
	#[token(":")]
	Colon,
	#[token("!")]
	Bang,
	#[token("+")]
	Plus,
	#[token("-")]
	Minus,
	#[token("*")]
	Star,
	#[token("/")]
	Slash,
	#[token("%")]
	Percent,
	#[token("<")]
	Less,
	#[token("<=")]
	LessEqual,
	#[token(">")]
	Greater,
	#[token(">=")]
	GreaterEqual,
	#[token("==")]
	#[token("===")]
	Equal,
	#[token("!=")]
	#[token("!==")]
	NotEqual,
	#[token("&&")]
	And,
	#[token("||")]
	Or,
	#[token("true")]
	True,
	#[token("false")]
	False,
	#[token("null")]
	#[token("undefined")]
	Null,
	#[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
	Ident(String),
	#[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
	Number(f64),
	#[regex(r#""([^"\\]|\\.)*""#, |lex| unquote(lex.slice()))]
	#[regex(r"'([^'\\]|\\.)*'", |lex| unquote(lex.slice()))]
	String(String),
}

/// Strip the quotes from a string literal and resolve its backslash escapes.
fn unquote(slice: &str) -> Option<String> {
	let inner = &slice[1..slice.len() - 1];
	if !inner.contains('\\') {
		return Some(inner.to_string());
	}

	// Normalize to a double-quoted literal so both quote styles share the same
	// escape rules.
	let mut normalized = String::with_capacity(inner.len() + 2);
	normalized.push('"');
	let mut chars = inner.chars();
	while let Some(ch) = chars.next() {
		match ch {
			'\\' => {
				match chars.next() {
					Some('\'') => normalized.push('\''),
					Some(escaped) => {
						normalized.push('\\');
						normalized.push(escaped);
					}
					None => return None,
				}
			}
			'"' => normalized.push_str("\\\""),
			other => normalized.push(other),
		}
	}
	normalized.push('"');

	unescape(&normalized).ok()
}

/// Split an expression into tokens paired with their byte spans. Returns the
/// span of the first unrecognized input on failure.
pub fn tokenize(source: &str) -> Result<Vec<(Token, Range<usize>)>, Range<usize>> {
	Token::lexer(source)
		.spanned()
		.map(|(token, span)| token.map(|token| (token, span.clone())).map_err(|()| span))
		.collect()
}
