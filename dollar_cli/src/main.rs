use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use dollar_cli::Commands;
use dollar_cli::DollarCli;
use dollar_cli::GlobalsFormat;
use dollar_core::Diagnostic;
use dollar_core::DollarConfig;
use dollar_core::DollarError;
use dollar_core::DollarResult;
use dollar_core::Engine;
use dollar_core::Scope;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = DollarCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	let result = match &args.command {
		Some(Commands::Render { file, output }) => run_render(&args, file, output.as_deref()),
		Some(Commands::Check { files }) => run_check(&args, files),
		Some(Commands::Globals { format }) => run_globals(&args, *format),
		None => {
			eprintln!("No subcommand specified. Run `dollar --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		match e.downcast::<DollarError>() {
			Ok(dollar_err) => {
				let report: miette::Report = (*dollar_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Engine events are silent unless `--verbose` or `RUST_LOG` asks for them.
/// Diagnostics are printed by the commands themselves.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_directive = if verbose { "dollar_core=debug" } else { "off" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.without_time()
		.try_init()
		.ok();
}

fn resolve_root(args: &DollarCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn read_document(path: &Path) -> DollarResult<String> {
	Ok(std::fs::read_to_string(path)?)
}

/// An engine with its globals loaded and the scope every document renders
/// against.
struct Project {
	root: PathBuf,
	engine: Engine,
	scope: Scope,
}

fn load_project(args: &DollarCli) -> Result<Project, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = DollarConfig::load(&root)?;

	let scope = match &config {
		Some(config) => config.load_scope(&root)?,
		None => Scope::new(),
	};

	let globals = match (&args.globals, &config) {
		(Some(path), _) => Some((path.clone(), read_document(&root.join(path))?)),
		(None, Some(config)) => {
			config
				.globals_document(&root)?
				.zip(config.globals.clone())
				.map(|(document, path)| (path, document))
		}
		(None, None) => None,
	};

	let mut engine = Engine::new();
	if let Some((path, document)) = globals {
		let diagnostics = engine.load_globals(&document);
		print_diagnostics(&path.display().to_string(), &diagnostics, args.verbose);
	}

	if args.verbose {
		let mut names: Vec<_> = scope.keys().map(String::as_str).collect();
		names.sort_unstable();
		eprintln!("Scope variables: {}", names.join(", "));
	}

	Ok(Project {
		root,
		engine,
		scope,
	})
}

/// Write each diagnostic as its console lines under a `<label>:` line. Log
/// entries are only shown with `--verbose`.
fn print_diagnostics(label: &str, diagnostics: &[Diagnostic], verbose: bool) {
	let mut stderr = std::io::stderr().lock();

	for diagnostic in diagnostics {
		if !diagnostic.is_error() && !verbose {
			continue;
		}

		let lines = if color_enabled() {
			diagnostic.log_lines()
		} else {
			diagnostic.plain_log_lines()
		};

		let _ = writeln!(stderr, "{label}:");
		for line in lines {
			let _ = writeln!(stderr, "{line}");
		}
	}
}

fn run_render(
	args: &DollarCli,
	file: &Path,
	output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
	let project = load_project(args)?;
	let document = read_document(&project.root.join(file))?;
	let rendered = project
		.engine
		.render_with_diagnostics(&document, &project.scope);

	print_diagnostics(
		&file.display().to_string(),
		&rendered.diagnostics,
		args.verbose,
	);

	match output {
		Some(output) => {
			std::fs::write(project.root.join(output), &rendered.content)?;
			if args.verbose {
				eprintln!("Wrote {}", output.display());
			}
		}
		None => {
			let mut stdout = std::io::stdout().lock();
			stdout.write_all(rendered.content.as_bytes())?;
			stdout.flush()?;
		}
	}

	Ok(())
}

fn run_check(args: &DollarCli, files: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
	let project = load_project(args)?;
	let mut failed = 0;

	for file in files {
		let label = file.display().to_string();
		let document = read_document(&project.root.join(file))?;
		let rendered = project
			.engine
			.render_with_diagnostics(&document, &project.scope);

		print_diagnostics(&label, &rendered.diagnostics, args.verbose);

		let count = rendered
			.diagnostics
			.iter()
			.filter(|diagnostic| diagnostic.is_error())
			.count();
		if count > 0 {
			let report: miette::Report = DollarError::Render { file: label, count }.into();
			eprintln!("{report:?}");
			failed += 1;
		} else if args.verbose {
			println!("{} {label}", colored!("ok", green));
		}
	}

	if failed > 0 {
		eprintln!(
			"Check failed: {failed} of {} document(s) reported errors.",
			files.len()
		);
		process::exit(1);
	}

	println!(
		"Check passed: {} document(s) rendered without errors.",
		files.len()
	);

	Ok(())
}

fn run_globals(args: &DollarCli, format: GlobalsFormat) -> Result<(), Box<dyn std::error::Error>> {
	let project = load_project(args)?;
	let globals = project.engine.globals();

	match format {
		GlobalsFormat::Text => {
			if globals.is_empty() {
				println!("No global declarations.");
			}
			for (name, value) in globals.iter() {
				println!("{name} = {value}");
			}
		}
		GlobalsFormat::Json => {
			println!("{}", serde_json::to_string_pretty(globals)?);
		}
	}

	Ok(())
}
