use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Render documents containing `$` statements.",
	long_about = "dollar renders text documents containing `$`-introduced statements against a \
	              variable scope built from `dollar.toml`.\n\nQuick start:\n  dollar render \
	              page.html   Render a document to stdout\n  dollar check *.html       Fail \
	              when any statement is malformed\n  dollar globals            Print the \
	              global declarations"
)]
pub struct DollarCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory. `dollar.toml` and relative
	/// document paths are resolved from here.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,

	/// Document whose `declare` statements populate the global scope.
	/// Overrides the `globals` entry of `dollar.toml`.
	#[arg(long, short, global = true)]
	pub globals: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Render a document and print the result.
	///
	/// The document is rendered against the global declarations layered under
	/// the scope built from the `[data]` and `[scope]` tables of
	/// `dollar.toml`. Malformed statements are reported on stderr and never
	/// stop the render.
	Render {
		/// The document to render.
		file: PathBuf,

		/// Write the rendered document to this file instead of stdout.
		#[arg(long, short)]
		output: Option<PathBuf>,
	},
	/// Render documents and fail if any statement reported an error.
	///
	/// Nothing is written. Exits with a non-zero status code when at least
	/// one document produced an error diagnostic.
	Check {
		/// The documents to check.
		#[arg(required = true)]
		files: Vec<PathBuf>,
	},
	/// Print the global scope collected from the globals document.
	Globals {
		/// Output format. Use `text` for `name = value` lines or `json` for
		/// programmatic consumption.
		#[arg(long, value_enum, default_value_t = GlobalsFormat::Text)]
		format: GlobalsFormat,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GlobalsFormat {
	/// One `name = value` line per binding.
	Text,
	/// A JSON object of every binding.
	Json,
}
