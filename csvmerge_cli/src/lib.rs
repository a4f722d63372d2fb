use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Render one document per csv row from a template with named placeholders.",
	long_about = "csvmerge is a mail-merge tool. It reads a csv file with a header row and a \
	              template whose `{{ placeholders }}` name header columns, and renders the \
	              template once for every row.\n\nQuick start:\n  csvmerge init     Create a \
	              sample project\n  csvmerge render   Render every row\n  csvmerge check    \
	              Verify rendered files are up to date\n  csvmerge adapt    Show the adapted \
	              template\n  csvmerge columns  List the csv header"
)]
pub struct MergeCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

/// Input files shared by every command that needs a table.
#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
	/// The csv file providing one row per document. Defaults to `data` in
	/// `csvmerge.toml`.
	#[arg(long, short)]
	pub data: Option<PathBuf>,
}

/// Input files shared by every command that needs a template.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
	#[command(flatten)]
	pub data: DataArgs,

	/// The template rendered once per row. Defaults to `template` in
	/// `csvmerge.toml`.
	#[arg(long, short)]
	pub template: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a sample `csvmerge.toml`, csv file and template.
	///
	/// Existing files are left untouched.
	Init,
	/// Render the template once for every csv row.
	///
	/// With an output directory (`--out` or `[output] directory` in
	/// `csvmerge.toml`) one file is written per row. Without one, documents
	/// are printed to stdout.
	Render {
		#[command(flatten)]
		input: InputArgs,

		/// Directory receiving one file per row.
		#[arg(long, short)]
		out: Option<PathBuf>,

		/// Show which files would be written without writing them.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Output format when printing to stdout.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Print the template with every placeholder rewritten to a positional
	/// row lookup.
	Adapt {
		#[command(flatten)]
		input: InputArgs,
	},
	/// Verify that every rendered file in the output directory is current.
	///
	/// Exits with a non-zero status when any file is missing or stale.
	Check {
		#[command(flatten)]
		input: InputArgs,

		/// Directory holding the rendered files.
		#[arg(long, short)]
		out: Option<PathBuf>,

		/// Show a unified diff for each stale file.
		#[arg(long, default_value_t = false)]
		diff: bool,
	},
	/// List the csv header columns with their positions.
	Columns {
		#[command(flatten)]
		data: DataArgs,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Rendered documents separated by a form feed line.
	Text,
	/// A JSON array of `{ "row": [...], "output": "..." }` objects.
	Json,
}
