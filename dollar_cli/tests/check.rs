mod common;

use dollar_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;
use rstest::rstest;

#[test]
fn check_passes_for_well_formed_documents() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("dollar.toml"), "[scope]\nshow = true\n")?;
	std::fs::write(tmp.path().join("a.html"), "$if(show){yes}else{no}")?;
	std::fs::write(tmp.path().join("b.html"), "$${ $literal }$$")?;

	common::dollar_cmd()
		.arg("check")
		.arg("a.html")
		.arg("b.html")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Check passed: 2 document(s) rendered without errors.",
		));

	Ok(())
}

#[rstest]
#[case::missing_brace("$abc", "Missing { to match $")]
#[case::missing_close("${abc", "Missing }")]
#[case::unknown_statement("$bogus{x}", "Unknown statement \"bogus\"")]
#[case::invalid_foreach("$foreach(x){a}", "Invalid foreach parameters \"x\"")]
#[case::lone_escape("$${abc", "Lone escape sequence $${ found at index 0")]
fn check_fails_for_malformed_statements(
	#[case] document: &str,
	#[case] message: &str,
) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("page.html"), document)?;

	common::dollar_cmd()
		.arg("check")
		.arg("page.html")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(
			predicates::str::contains(message)
				.and(predicates::str::contains("rendering `page.html` produced 1 error(s)")),
		);

	Ok(())
}

#[test]
fn check_prints_diagnostics_as_console_lines() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("page.html"), "$${abc $if(x){a} else {b}")?;

	common::dollar_cmd()
		.arg("check")
		.arg("page.html")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::starts_with(
			"page.html:\nTemplating error:\nLone escape sequence $${ found at index \
			 0\npage.html:\nTemplating error:\nInvalid connective after if statement x\nat index 8\n",
		));

	Ok(())
}

#[test]
fn check_counts_failing_documents() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("good.html"), "plain")?;
	std::fs::write(tmp.path().join("bad.html"), "${undefined_name}")?;

	common::dollar_cmd()
		.arg("check")
		.arg("good.html")
		.arg("bad.html")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains(
			"Check failed: 1 of 2 document(s) reported errors.",
		));

	Ok(())
}

#[test]
fn check_requires_at_least_one_file() {
	common::dollar_cmd().arg("check").assert().failure();
}
