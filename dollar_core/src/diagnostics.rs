use std::fmt::Display;

/// Severity of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
	/// Informational output.
	Log,
	/// A statement that failed to parse or evaluate.
	Error,
}

/// A message raised while rendering. Diagnostics never abort a render; they
/// are reported through `tracing` and returned alongside the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
	pub level: DiagnosticLevel,
	pub message: String,
	/// Byte offset in the document being rendered, when one is known.
	pub index: Option<usize>,
}

impl Diagnostic {
	pub fn error(message: impl Display, index: Option<usize>) -> Self {
		Self {
			level: DiagnosticLevel::Error,
			message: message.to_string(),
			index,
		}
	}

	pub fn log(message: impl Display, index: Option<usize>) -> Self {
		Self {
			level: DiagnosticLevel::Log,
			message: message.to_string(),
			index,
		}
	}

	pub fn is_error(&self) -> bool {
		self.level == DiagnosticLevel::Error
	}

	/// The discrete console lines for this diagnostic: a header, the message,
	/// an optional `at index N` line and a terminal color reset.
	pub fn log_lines(&self) -> Vec<String> {
		self.lines(true)
	}

	/// [`Diagnostic::log_lines`] without the ANSI color codes. The header
	/// loses its color prefix and the reset line is left out.
	pub fn plain_log_lines(&self) -> Vec<String> {
		self.lines(false)
	}

	fn lines(&self, color: bool) -> Vec<String> {
		let mut lines = Vec::with_capacity(4);
		match (self.level, color) {
			(DiagnosticLevel::Error, true) => lines.push("\x1b[31mTemplating error:".to_string()),
			(DiagnosticLevel::Error, false) => lines.push("Templating error:".to_string()),
			(DiagnosticLevel::Log, _) => lines.push("Templating log:".to_string()),
		}
		lines.push(self.message.clone());
		if let Some(index) = self.index {
			lines.push(format!("at index {index}"));
		}
		if color {
			lines.push("\x1b[0m".to_string());
		}
		lines
	}

	/// Forward this diagnostic to the active `tracing` subscriber.
	pub(crate) fn emit(&self) {
		match (self.level, self.index) {
			(DiagnosticLevel::Error, Some(index)) => {
				tracing::error!(index, "{}", self.message);
			}
			(DiagnosticLevel::Error, None) => tracing::error!("{}", self.message),
			(DiagnosticLevel::Log, Some(index)) => tracing::info!(index, "{}", self.message),
			(DiagnosticLevel::Log, None) => tracing::info!("{}", self.message),
		}
	}
}

impl Display for Diagnostic {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.message)?;
		if let Some(index) = self.index {
			write!(f, " (at index {index})")?;
		}
		Ok(())
	}
}
