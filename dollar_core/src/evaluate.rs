use std::cmp::Ordering;

use crate::EvalError;
use crate::Scope;
use crate::Value;
use crate::expression::BinaryOp;
use crate::expression::Expr;
use crate::expression::LogicalOp;
use crate::expression::UnaryOp;
use crate::expression::parse_expression;

/// A runtime failure inside an expression. Only used to decide that the
/// whole expression failed; the reported message is always the
/// "Error evaluating expression" form.
#[derive(Debug)]
struct Fault;

type Evaluated = Result<Value, Fault>;

/// Evaluate `code` with the bindings of `scope` as the only visible names.
///
/// Whitespace-only code evaluates to [`Value::Null`].
pub fn evaluate(code: &str, scope: &Scope) -> Result<Value, EvalError> {
	let failed = || EvalError::Expression(code.to_string());
	let Some(expr) = parse_expression(code).map_err(|_| failed())? else {
		return Ok(Value::Null);
	};

	eval(&expr, scope).map_err(|Fault| failed())
}

fn eval(expr: &Expr, scope: &Scope) -> Evaluated {
	let value = match expr {
		Expr::Null => Value::Null,
		Expr::Bool(value) => Value::Bool(*value),
		Expr::Number(value) => Value::Number(*value),
		Expr::String(value) => Value::String(value.clone()),
		Expr::List(items) => {
			Value::List(items.iter().map(|item| eval(item, scope)).collect::<Result<_, _>>()?)
		}
		Expr::Ident(name) => scope.get(name).cloned().ok_or(Fault)?,
		Expr::Member(target, name) => member(&eval(target, scope)?, name)?,
		Expr::Index(target, index) => {
			let target = eval(target, scope)?;
			let index = eval(index, scope)?;
			lookup(&target, &index)?
		}
		Expr::Unary(op, operand) => unary(*op, &eval(operand, scope)?)?,
		Expr::Logical(op, left, right) => {
			let left = eval(left, scope)?;
			match (op, left.is_truthy()) {
				(LogicalOp::And, true) | (LogicalOp::Or, false) => eval(right, scope)?,
				_ => left,
			}
		}
		Expr::Binary(op, left, right) => binary(*op, &eval(left, scope)?, &eval(right, scope)?)?,
		Expr::Conditional(condition, then, otherwise) => {
			if eval(condition, scope)?.is_truthy() {
				eval(then, scope)?
			} else {
				eval(otherwise, scope)?
			}
		}
	};

	Ok(value)
}

fn member(target: &Value, name: &str) -> Evaluated {
	match (target, name) {
		(Value::Null, _) => Err(Fault),
		(Value::String(text), "length") => Ok(Value::from(text.chars().count())),
		(Value::List(items), "length") => Ok(Value::from(items.len())),
		(Value::Map(map), _) => Ok(map.get(name).cloned().unwrap_or_default()),
		_ => Ok(Value::Null),
	}
}

fn lookup(target: &Value, index: &Value) -> Evaluated {
	match (target, index) {
		(Value::Null, _) => Err(Fault),
		(Value::List(items), Value::Number(number)) => {
			Ok(position(*number).and_then(|i| items.get(i).cloned()).unwrap_or_default())
		}
		(Value::String(text), Value::Number(number)) => Ok(position(*number)
			.and_then(|i| text.chars().nth(i))
			.map(|ch| Value::String(ch.to_string()))
			.unwrap_or_default()),
		(_, Value::String(name)) => member(target, name),
		_ => Ok(Value::Null),
	}
}

/// A non-negative integral number as a list position.
fn position(number: f64) -> Option<usize> {
	(number >= 0.0 && number.fract() == 0.0).then_some(number as usize)
}

fn unary(op: UnaryOp, operand: &Value) -> Evaluated {
	match op {
		UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
		UnaryOp::Negate => Ok(Value::Number(-to_number(operand)?)),
		UnaryOp::Plus => Ok(Value::Number(to_number(operand)?)),
	}
}

fn binary(op: BinaryOp, left: &Value, right: &Value) -> Evaluated {
	let value = match op {
		BinaryOp::Add => {
			if is_textual(left) || is_textual(right) {
				Value::String(format!("{left}{right}"))
			} else {
				Value::Number(to_number(left)? + to_number(right)?)
			}
		}
		BinaryOp::Subtract => Value::Number(to_number(left)? - to_number(right)?),
		BinaryOp::Multiply => Value::Number(to_number(left)? * to_number(right)?),
		BinaryOp::Divide => Value::Number(to_number(left)? / to_number(right)?),
		BinaryOp::Remainder => Value::Number(to_number(left)? % to_number(right)?),
		BinaryOp::Less => Value::Bool(compare(left, right)? == Some(Ordering::Less)),
		BinaryOp::LessEqual => {
			Value::Bool(matches!(compare(left, right)?, Some(Ordering::Less | Ordering::Equal)))
		}
		BinaryOp::Greater => Value::Bool(compare(left, right)? == Some(Ordering::Greater)),
		BinaryOp::GreaterEqual => {
			Value::Bool(matches!(compare(left, right)?, Some(Ordering::Greater | Ordering::Equal)))
		}
		BinaryOp::Equal => Value::Bool(left == right),
		BinaryOp::NotEqual => Value::Bool(left != right),
	};

	Ok(value)
}

/// Strings, lists and maps turn `+` into text concatenation.
fn is_textual(value: &Value) -> bool {
	matches!(value, Value::String(_) | Value::List(_) | Value::Map(_))
}

fn compare(left: &Value, right: &Value) -> Result<Option<Ordering>, Fault> {
	match (left, right) {
		(Value::String(left), Value::String(right)) => Ok(Some(left.cmp(right))),
		_ => Ok(to_number(left)?.partial_cmp(&to_number(right)?)),
	}
}

fn to_number(value: &Value) -> Result<f64, Fault> {
	match value {
		Value::Null => Ok(0.0),
		Value::Bool(value) => Ok(f64::from(u8::from(*value))),
		Value::Number(value) => Ok(*value),
		Value::String(text) => {
			let trimmed = text.trim();
			if trimmed.is_empty() {
				Ok(0.0)
			} else {
				trimmed.parse().map_err(|_| Fault)
			}
		}
		Value::List(_) | Value::Map(_) => Err(Fault),
	}
}
