use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub const LETTER: &str =
	"Hello, {{ RecipientName }}\n\nWelcome to {{ GroupName }}.\n\nThank you,\n{{ SenderName }}\n";

pub const RECIPIENTS: &str = "SenderName,RecipientName,GroupName
sender@example.com,ada@example.com,rustaceans
sender@example.com,grace@example.com,compilers
";

pub fn csvmerge_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("csvmerge"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

/// Write the sample letter and recipients into `root`.
#[allow(dead_code)]
pub fn write_project(root: &Path) -> std::io::Result<()> {
	std::fs::write(root.join("letter.txt"), LETTER)?;
	std::fs::write(root.join("recipients.csv"), RECIPIENTS)
}
