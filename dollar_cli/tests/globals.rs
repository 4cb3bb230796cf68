mod common;

use dollar_core::AnyEmptyResult;
use serde_json::Value;

#[test]
fn globals_prints_declarations_as_text() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("dollar.toml"), "globals = \"globals.html\"\n")?;
	std::fs::write(
		tmp.path().join("globals.html"),
		"<p>$declare(site){Example}$declare(owner){Ada}</p>",
	)?;

	common::dollar_cmd()
		.arg("globals")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("owner = Ada\nsite = Example\n");

	Ok(())
}

#[test]
fn globals_prints_declarations_as_json() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("globals.html"), "$declare(greeting){Hello ${name}}")?;

	let output = common::dollar_cmd()
		.arg("globals")
		.arg("--format")
		.arg("json")
		.arg("--globals")
		.arg("globals.html")
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());

	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json, serde_json::json!({ "greeting": "Hello ${name}" }));

	Ok(())
}

#[test]
fn globals_without_a_globals_document_is_empty() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::dollar_cmd()
		.arg("globals")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("No global declarations.\n");

	Ok(())
}

#[test]
fn globals_resolves_dot_config_dollar_toml() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join(".config"))?;
	std::fs::write(
		tmp.path().join(".config/dollar.toml"),
		"globals = \"g.html\"\n",
	)?;
	std::fs::write(tmp.path().join("g.html"), "$declare(found){yes}")?;

	common::dollar_cmd()
		.arg("globals")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("found = yes\n");

	Ok(())
}

#[test]
fn verbose_logs_engine_events() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("g.html"), "$declare(a){1}")?;

	common::dollar_cmd()
		.arg("globals")
		.arg("--verbose")
		.arg("--globals")
		.arg("g.html")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("loaded global declarations"));

	Ok(())
}
