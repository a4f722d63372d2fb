mod common;

use csvmerge_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;
use serde_json::Value;

const SINGLE_ROW: &str = "SenderName,RecipientName,GroupName
sender@example.com,recipient@example.com,group name
";

const SINGLE_ROW_RESULT: &str = "Hello, recipient@example.com

Welcome to group name.

Thank you,
sender@example.com
";

#[test]
fn render_prints_exact_document() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("letter.txt"), common::LETTER)?;
	std::fs::write(tmp.path().join("one.csv"), SINGLE_ROW)?;

	common::csvmerge_cmd()
		.arg("render")
		.arg("--path")
		.arg(tmp.path())
		.arg("--data")
		.arg("one.csv")
		.arg("--template")
		.arg("letter.txt")
		.assert()
		.success()
		.stdout(SINGLE_ROW_RESULT);

	Ok(())
}

#[test]
fn render_separates_documents_in_row_order() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	let output = common::csvmerge_cmd()
		.arg("render")
		.arg("--path")
		.arg(tmp.path())
		.arg("--data")
		.arg("recipients.csv")
		.arg("--template")
		.arg("letter.txt")
		.output()?;

	assert!(output.status.success());
	let stdout = String::from_utf8(output.stdout)?;
	let documents: Vec<&str> = stdout.split("\u{c}\n").collect();
	assert_eq!(documents.len(), 2);
	assert!(documents[0].starts_with("Hello, ada@example.com\n"));
	assert!(documents[0].contains("Welcome to rustaceans."));
	assert!(documents[1].starts_with("Hello, grace@example.com\n"));
	assert!(documents[1].contains("Welcome to compilers."));

	Ok(())
}

#[test]
fn render_json_includes_rows() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	let output = common::csvmerge_cmd()
		.arg("render")
		.arg("--path")
		.arg(tmp.path())
		.arg("--data")
		.arg("recipients.csv")
		.arg("--template")
		.arg("letter.txt")
		.arg("--format")
		.arg("json")
		.output()?;

	assert!(output.status.success());
	let json: Value = serde_json::from_slice(&output.stdout)?;
	let documents = json.as_array().ok_or("expected a json array")?;
	assert_eq!(documents.len(), 2);
	assert_eq!(documents[1]["row"][1], "grace@example.com");
	assert_eq!(documents[1]["row"][2], "compilers");
	assert!(
		documents[0]["output"]
			.as_str()
			.is_some_and(|text| text.starts_with("Hello, ada@example.com"))
	);

	Ok(())
}

#[test]
fn render_writes_numbered_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	common::csvmerge_cmd()
		.arg("render")
		.arg("--path")
		.arg(tmp.path())
		.arg("--data")
		.arg("recipients.csv")
		.arg("--template")
		.arg("letter.txt")
		.arg("--out")
		.arg("letters")
		.assert()
		.success()
		.stdout(predicates::str::contains("Wrote 2 file(s)"));

	let first = std::fs::read_to_string(tmp.path().join("letters/1.txt"))?;
	let second = std::fs::read_to_string(tmp.path().join("letters/2.txt"))?;
	assert!(first.starts_with("Hello, ada@example.com"));
	assert!(second.starts_with("Hello, grace@example.com"));

	Ok(())
}

#[test]
fn render_uses_config_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;
	std::fs::write(
		tmp.path().join("csvmerge.toml"),
		"data = \"recipients.csv\"\ntemplate = \"letter.txt\"\n\n[output]\ndirectory = \
		 \"out\"\nextension = \"md\"\nname_column = \"RecipientName\"\n",
	)?;

	common::csvmerge_cmd()
		.arg("render")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert!(tmp.path().join("out/ada@example.com.md").is_file());
	assert!(tmp.path().join("out/grace@example.com.md").is_file());

	Ok(())
}

#[test]
fn render_dry_run_writes_nothing() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	common::csvmerge_cmd()
		.arg("render")
		.arg("--path")
		.arg(tmp.path())
		.arg("--data")
		.arg("recipients.csv")
		.arg("--template")
		.arg("letter.txt")
		.arg("--out")
		.arg("letters")
		.arg("--dry-run")
		.assert()
		.success()
		.stdout(predicates::str::contains("Dry run: would write 2 file(s)"))
		.stdout(predicates::str::contains("1.txt").and(predicates::str::contains("2.txt")));

	assert!(!tmp.path().join("letters").exists());

	Ok(())
}

#[test]
fn render_rejects_unknown_column() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;
	std::fs::write(tmp.path().join("letter.txt"), "Dear {{ Nobody }}\n")?;

	common::csvmerge_cmd()
		.arg("render")
		.arg("--path")
		.arg(tmp.path())
		.arg("--data")
		.arg("recipients.csv")
		.arg("--template")
		.arg("letter.txt")
		.assert()
		.code(2)
		.stdout("")
		.stderr(predicates::str::contains("Nobody"))
		.stderr(predicates::str::contains("not found in csv header"));

	Ok(())
}

#[test]
fn render_rejects_unterminated_action() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;
	std::fs::write(tmp.path().join("letter.txt"), "Hello, {{ RecipientName")?;

	common::csvmerge_cmd()
		.arg("render")
		.arg("--path")
		.arg(tmp.path())
		.arg("--data")
		.arg("recipients.csv")
		.arg("--template")
		.arg("letter.txt")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("no action end found"));

	Ok(())
}

#[test]
fn render_rejects_ragged_csv() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;
	std::fs::write(tmp.path().join("recipients.csv"), "a,b,c\n1,2\n")?;

	common::csvmerge_cmd()
		.arg("render")
		.arg("--path")
		.arg(tmp.path())
		.arg("--data")
		.arg("recipients.csv")
		.arg("--template")
		.arg("letter.txt")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("header indicates 3"));

	Ok(())
}

#[test]
fn render_requires_data() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::csvmerge_cmd()
		.arg("render")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("no csv file given"));

	Ok(())
}

#[test]
fn render_keeps_free_text_braces() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;
	std::fs::write(
		tmp.path().join("letter.txt"),
		"Ticket {#42 for {{ RecipientName }}: save 10{% now.\n",
	)?;

	let output = common::csvmerge_cmd()
		.arg("render")
		.arg("--path")
		.arg(tmp.path())
		.arg("--data")
		.arg("recipients.csv")
		.arg("--template")
		.arg("letter.txt")
		.output()?;

	assert!(output.status.success());
	let stdout = String::from_utf8(output.stdout)?.replace('\u{c}', "<form feed>");
	insta::assert_snapshot!(stdout, @r"
	Ticket {#42 for ada@example.com: save 10{% now.
	<form feed>
	Ticket {#42 for grace@example.com: save 10{% now.
	");

	Ok(())
}
