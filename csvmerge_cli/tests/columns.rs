mod common;

use csvmerge_core::AnyEmptyResult;
use rstest::rstest;
use similar_asserts::assert_eq;

#[rstest]
#[case::long_flag("--data")]
#[case::short_flag("-d")]
fn columns_lists_header_positions(#[case] flag: &str) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	let output = common::csvmerge_cmd()
		.arg("columns")
		.arg("--path")
		.arg(tmp.path())
		.arg(flag)
		.arg("recipients.csv")
		.output()?;

	assert!(output.status.success());
	assert_eq!(
		String::from_utf8(output.stdout)?,
		"recipients.csv\n    0  SenderName\n    1  RecipientName\n    2  GroupName\n"
	);

	Ok(())
}

#[test]
fn columns_rejects_empty_csv() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("empty.csv"), "")?;

	common::csvmerge_cmd()
		.arg("columns")
		.arg("--path")
		.arg(tmp.path())
		.arg("--data")
		.arg("empty.csv")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("no header row"));

	Ok(())
}

#[test]
fn adapt_matches_core_adaptation() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	let table =
		csvmerge_core::Table::new("recipients.csv", "text/csv", common::RECIPIENTS.as_bytes())?;
	let template =
		csvmerge_core::Template::new("letter.txt", "text/plain", common::LETTER.as_bytes(), &table)?;

	let output = common::csvmerge_cmd()
		.arg("adapt")
		.arg("--path")
		.arg(tmp.path())
		.arg("-d")
		.arg("recipients.csv")
		.arg("-t")
		.arg("letter.txt")
		.output()?;

	assert!(output.status.success());
	assert_eq!(String::from_utf8(output.stdout)?, template.adapted_source());

	Ok(())
}
