//! Recursive-descent parser for the expression language.
//!
//! Precedence, lowest first: conditional (`a ? b : c`), `||`, `&&`,
//! equality, comparison, additive, multiplicative, unary, postfix member and
//! index access, primary.

use std::ops::Range;

use crate::lexer::Token;
use crate::lexer::tokenize;

/// The deepest expression tree the parser builds. Every nested group,
/// operand chain link, unary operator and member access counts one level,
/// so evaluating or dropping a parsed tree stays within this bound too.
pub const MAX_DEPTH: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
	Not,
	Negate,
	Plus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
	Add,
	Subtract,
	Multiply,
	Divide,
	Remainder,
	Less,
	LessEqual,
	Greater,
	GreaterEqual,
	Equal,
	NotEqual,
}

/// Short-circuiting operators. They yield the operand that decided the
/// result rather than a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
	And,
	Or,
}

/// A parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
	Null,
	Bool(bool),
	Number(f64),
	String(String),
	List(Vec<Expr>),
	Ident(String),
	Member(Box<Expr>, String),
	Index(Box<Expr>, Box<Expr>),
	Unary(UnaryOp, Box<Expr>),
	Binary(BinaryOp, Box<Expr>, Box<Expr>),
	Logical(LogicalOp, Box<Expr>, Box<Expr>),
	Conditional(Box<Expr>, Box<Expr>, Box<Expr>),
}

/// Why an expression failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
	/// Input the lexer did not recognize.
	Unrecognized(Range<usize>),
	/// A token in a position the grammar does not allow.
	Unexpected(Range<usize>),
	/// The expression ended early.
	UnexpectedEnd,
	/// The expression nests deeper than [`MAX_DEPTH`].
	TooDeep,
}

/// Parse a complete expression. An empty (or whitespace-only) source parses
/// to `None`.
pub fn parse_expression(source: &str) -> Result<Option<Expr>, ParseFailure> {
	let tokens = tokenize(source).map_err(ParseFailure::Unrecognized)?;
	if tokens.is_empty() {
		return Ok(None);
	}

	let mut parser = ExprParser {
		tokens,
		cursor: 0,
		depth: 0,
	};
	let expr = parser.conditional()?;
	match parser.tokens.get(parser.cursor) {
		Some((_, span)) => Err(ParseFailure::Unexpected(span.clone())),
		None => Ok(Some(expr)),
	}
}

struct ExprParser {
	tokens: Vec<(Token, Range<usize>)>,
	cursor: usize,
	depth: usize,
}

impl ExprParser {
	/// Go one level deeper. Callers restore `depth` once the level is built.
	fn descend(&mut self) -> Result<(), ParseFailure> {
		self.depth += 1;
		if self.depth > MAX_DEPTH {
			return Err(ParseFailure::TooDeep);
		}
		Ok(())
	}

	fn peek(&self) -> Option<&Token> {
		self.tokens.get(self.cursor).map(|(token, _)| token)
	}

	fn next(&mut self) -> Result<Token, ParseFailure> {
		let (token, _) = self
			.tokens
			.get(self.cursor)
			.cloned()
			.ok_or(ParseFailure::UnexpectedEnd)?;
		self.cursor += 1;
		Ok(token)
	}

	/// Consume the next token if it equals `expected`.
	fn eat(&mut self, expected: &Token) -> bool {
		if self.peek() == Some(expected) {
			self.cursor += 1;
			true
		} else {
			false
		}
	}

	fn expect(&mut self, expected: &Token) -> Result<(), ParseFailure> {
		if self.eat(expected) {
			return Ok(());
		}

		Err(self.unexpected())
	}

	fn unexpected(&self) -> ParseFailure {
		match self.tokens.get(self.cursor) {
			Some((_, span)) => ParseFailure::Unexpected(span.clone()),
			None => ParseFailure::UnexpectedEnd,
		}
	}

	fn conditional(&mut self) -> Result<Expr, ParseFailure> {
		let depth = self.depth;
		self.descend()?;

		let condition = self.or()?;
		let expr = if self.eat(&Token::Question) {
			let then = self.conditional()?;
			self.expect(&Token::Colon)?;
			let otherwise = self.conditional()?;
			Expr::Conditional(Box::new(condition), Box::new(then), Box::new(otherwise))
		} else {
			condition
		};

		self.depth = depth;
		Ok(expr)
	}

	fn or(&mut self) -> Result<Expr, ParseFailure> {
		let depth = self.depth;
		let mut left = self.and()?;
		while self.eat(&Token::Or) {
			self.descend()?;
			let right = self.and()?;
			left = Expr::Logical(LogicalOp::Or, Box::new(left), Box::new(right));
		}
		self.depth = depth;
		Ok(left)
	}

	fn and(&mut self) -> Result<Expr, ParseFailure> {
		let depth = self.depth;
		let mut left = self.equality()?;
		while self.eat(&Token::And) {
			self.descend()?;
			let right = self.equality()?;
			left = Expr::Logical(LogicalOp::And, Box::new(left), Box::new(right));
		}
		self.depth = depth;
		Ok(left)
	}

	fn equality(&mut self) -> Result<Expr, ParseFailure> {
		let depth = self.depth;
		let mut left = self.comparison()?;
		loop {
			let op = match self.peek() {
				Some(Token::Equal) => BinaryOp::Equal,
				Some(Token::NotEqual) => BinaryOp::NotEqual,
				_ => {
					self.depth = depth;
					return Ok(left);
				}
			};
			self.cursor += 1;
			self.descend()?;
			let right = self.comparison()?;
			left = Expr::Binary(op, Box::new(left), Box::new(right));
		}
	}

	fn comparison(&mut self) -> Result<Expr, ParseFailure> {
		let depth = self.depth;
		let mut left = self.additive()?;
		loop {
			let op = match self.peek() {
				Some(Token::Less) => BinaryOp::Less,
				Some(Token::LessEqual) => BinaryOp::LessEqual,
				Some(Token::Greater) => BinaryOp::Greater,
				Some(Token::GreaterEqual) => BinaryOp::GreaterEqual,
				_ => {
					self.depth = depth;
					return Ok(left);
				}
			};
			self.cursor += 1;
			self.descend()?;
			let right = self.additive()?;
			left = Expr::Binary(op, Box::new(left), Box::new(right));
		}
	}

	fn additive(&mut self) -> Result<Expr, ParseFailure> {
		let depth = self.depth;
		let mut left = self.multiplicative()?;
		loop {
			let op = match self.peek() {
				Some(Token::Plus) => BinaryOp::Add,
				Some(Token::Minus) => BinaryOp::Subtract,
				_ => {
					self.depth = depth;
					return Ok(left);
				}
			};
			self.cursor += 1;
			self.descend()?;
			let right = self.multiplicative()?;
			left = Expr::Binary(op, Box::new(left), Box::new(right));
		}
	}

	fn multiplicative(&mut self) -> Result<Expr, ParseFailure> {
		let depth = self.depth;
		let mut left = self.unary()?;
		loop {
			let op = match self.peek() {
				Some(Token::Star) => BinaryOp::Multiply,
				Some(Token::Slash) => BinaryOp::Divide,
				Some(Token::Percent) => BinaryOp::Remainder,
				_ => {
					self.depth = depth;
					return Ok(left);
				}
			};
			self.cursor += 1;
			self.descend()?;
			let right = self.unary()?;
			left = Expr::Binary(op, Box::new(left), Box::new(right));
		}
	}

	fn unary(&mut self) -> Result<Expr, ParseFailure> {
		let op = match self.peek() {
			Some(Token::Bang) => UnaryOp::Not,
			Some(Token::Minus) => UnaryOp::Negate,
			Some(Token::Plus) => UnaryOp::Plus,
			_ => return self.postfix(),
		};
		self.cursor += 1;
		let depth = self.depth;
		self.descend()?;
		let operand = self.unary()?;
		self.depth = depth;
		Ok(Expr::Unary(op, Box::new(operand)))
	}

	fn postfix(&mut self) -> Result<Expr, ParseFailure> {
		let depth = self.depth;
		let mut expr = self.primary()?;
		loop {
			if self.eat(&Token::Dot) {
				self.descend()?;
				let Token::Ident(name) = self.next()? else {
					self.cursor -= 1;
					return Err(self.unexpected());
				};
				expr = Expr::Member(Box::new(expr), name);
			} else if self.eat(&Token::BracketOpen) {
				self.descend()?;
				let index = self.conditional()?;
				self.expect(&Token::BracketClose)?;
				expr = Expr::Index(Box::new(expr), Box::new(index));
			} else {
				self.depth = depth;
				return Ok(expr);
			}
		}
	}

	fn primary(&mut self) -> Result<Expr, ParseFailure> {
		let expr = match self.next()? {
			Token::Null => Expr::Null,
			Token::True => Expr::Bool(true),
			Token::False => Expr::Bool(false),
			Token::Number(number) => Expr::Number(number),
			Token::String(value) => Expr::String(value),
			Token::Ident(name) => Expr::Ident(name),
			Token::ParenOpen => {
				let inner = self.conditional()?;
				self.expect(&Token::ParenClose)?;
				inner
			}
			Token::BracketOpen => {
				let mut items = vec![];
				if !self.eat(&Token::BracketClose) {
					loop {
						items.push(self.conditional()?);
						if self.eat(&Token::BracketClose) {
							break;
						}
						self.expect(&Token::Comma)?;
						// Allow a trailing comma.
						if self.eat(&Token::BracketClose) {
							break;
						}
					}
				}
				Expr::List(items)
			}
			_ => {
				self.cursor -= 1;
				return Err(self.unexpected());
			}
		};

		Ok(expr)
	}
}
