use std::borrow::Cow;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use csvmerge_cli::Commands;
use csvmerge_cli::DataArgs;
use csvmerge_cli::InputArgs;
use csvmerge_cli::MergeCli;
use csvmerge_cli::OutputFormat;
use csvmerge_core::MergeConfig;
use csvmerge_core::NamedFile;
use csvmerge_core::OutputOptions;
use csvmerge_core::Row;
use csvmerge_core::Table;
use csvmerge_core::Template;
use csvmerge_core::check_outputs;
use csvmerge_core::plan_outputs;
use csvmerge_core::write_outputs;
use owo_colors::OwoColorize;
use serde::Serialize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

/// Separates documents printed to stdout in text format.
const DOCUMENT_SEPARATOR: &str = "\u{c}\n";

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
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
	let args = MergeCli::parse();

	// Respect NO_COLOR env var, --no-color flag and terminal support.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stderr).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args).map(|()| true),
		Some(Commands::Render {
			input,
			out,
			dry_run,
			format,
		}) => run_render(&args, input, out.as_deref(), *dry_run, *format).map(|()| true),
		Some(Commands::Adapt { input }) => run_adapt(&args, input).map(|()| true),
		Some(Commands::Check { input, out, diff }) => {
			run_check(&args, input, out.as_deref(), *diff)
		}
		Some(Commands::Columns { data }) => run_columns(&args, data).map(|()| true),
		None => {
			eprintln!("No subcommand specified. Run `csvmerge --help` for usage.");
			process::exit(1);
		}
	};

	match result {
		Ok(true) => {}
		Ok(false) => process::exit(1),
		Err(e) => {
			// Try to render through miette for rich diagnostics with help text
			// and error codes.
			match e.downcast::<csvmerge_core::MergeError>() {
				Ok(merge_err) => {
					let report: miette::Report = (*merge_err).into();
					eprintln!("{report:?}");
				}
				Err(e) => {
					eprintln!("{} {e}", colored!("error:", red));
				}
			}
			process::exit(2);
		}
	}
}

fn init_tracing(verbose: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(color_enabled())
		.without_time()
		.try_init()
		.ok();
}

fn resolve_root(args: &MergeCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// The project root and its configuration. Every relative path, whether
/// from a flag or from `csvmerge.toml`, is resolved against the root.
struct Session {
	root: PathBuf,
	config: MergeConfig,
}

impl Session {
	fn load(args: &MergeCli) -> CliResult<Self> {
		let root = resolve_root(args);
		let config = MergeConfig::load(&root)?.unwrap_or_default();

		if args.verbose {
			match MergeConfig::resolve_path(&root) {
				Some(path) => eprintln!("Using config: {}", path.display()),
				None => eprintln!("No config file found in {}", root.display()),
			}
		}

		Ok(Self { root, config })
	}

	fn data_path(&self, data: &DataArgs) -> CliResult<PathBuf> {
		data.data
			.as_deref()
			.or(self.config.data.as_deref())
			.map(|path| self.root.join(path))
			.ok_or_else(|| "no csv file given; pass --data or set `data` in csvmerge.toml".into())
	}

	fn template_path(&self, input: &InputArgs) -> CliResult<PathBuf> {
		input
			.template
			.as_deref()
			.or(self.config.template.as_deref())
			.map(|path| self.root.join(path))
			.ok_or_else(|| {
				"no template given; pass --template or set `template` in csvmerge.toml".into()
			})
	}

	fn output_options(&self, out: Option<&Path>) -> Option<OutputOptions> {
		self.config.output_options(&self.root, out)
	}

	fn load_table(&self, data: &DataArgs) -> CliResult<Table> {
		let path = self.data_path(data)?;
		Ok(Table::parse(NamedFile::read(&path)?)?)
	}

	fn load_template<'a>(&self, input: &InputArgs, table: &'a Table) -> CliResult<Template<'a>> {
		let path = self.template_path(input)?;
		Ok(Template::from_file(NamedFile::read(&path)?, table)?)
	}
}

fn run_init(args: &MergeCli) -> CliResult<()> {
	let root = resolve_root(args);
	let files = [
		(
			"csvmerge.toml",
			"# csvmerge configuration\n\ndata = \"recipients.csv\"\ntemplate = \
			 \"letter.txt\"\n\n# Write one file per row instead of printing to stdout.\n# \
			 [output]\n# directory = \"out\"\n# extension = \"txt\"\n# name_column = \
			 \"RecipientName\"\n",
		),
		(
			"recipients.csv",
			"SenderName,RecipientName,GroupName\nsender@example.com,recipient@example.com,group \
			 name\n",
		),
		(
			"letter.txt",
			"Hello, {{ RecipientName }}\n\nWelcome to {{ GroupName }}.\n\nThank you,\n{{ \
			 SenderName }}\n",
		),
	];

	let mut created = 0;
	for (name, content) in files {
		let path = root.join(name);
		if path.exists() {
			println!("File already exists: {}", path.display());
			continue;
		}

		std::fs::write(&path, content)?;
		println!("Created {}", path.display());
		created += 1;
	}

	if created > 0 {
		println!();
		println!("Next steps:");
		println!("  1. Replace recipients.csv with your own data");
		println!("  2. Edit letter.txt, naming csv columns as {{{{ ColumnName }}}}");
		println!("  3. Run `csvmerge render` to render one letter per row");
	}

	Ok(())
}

#[derive(Serialize)]
struct JsonDocument<'a> {
	row: &'a Row,
	output: Cow<'a, str>,
}

fn run_render(
	args: &MergeCli,
	input: &InputArgs,
	out: Option<&Path>,
	dry_run: bool,
	format: OutputFormat,
) -> CliResult<()> {
	let session = Session::load(args)?;
	let table = session.load_table(&input.data)?;
	let mut template = session.load_template(input, &table)?;

	if let Some(options) = session.output_options(out) {
		let plan = plan_outputs(&mut template, &options)?;
		let dir = make_relative(&plan.directory, &session.root);

		if dry_run {
			println!(
				"Dry run: would write {} file(s) to {dir}:",
				plan.outputs.len()
			);
			for output in &plan.outputs {
				println!("  {}", make_relative(&output.path, &session.root));
			}
		} else {
			let written = write_outputs(&plan)?;
			println!("Wrote {written} file(s) to {dir}.");

			if args.verbose {
				for output in &plan.outputs {
					println!("  {}", make_relative(&output.path, &session.root));
				}
			}
		}

		return Ok(());
	}

	match format {
		OutputFormat::Json => {
			let documents = template.render_all().into_result()?;
			let json: Vec<JsonDocument<'_>> = documents
				.iter()
				.map(|document| {
					JsonDocument {
						row: &document.row,
						output: document.text(),
					}
				})
				.collect();
			println!("{}", serde_json::to_string_pretty(&json)?);
		}
		OutputFormat::Text => {
			let mut stdout = std::io::stdout().lock();
			for (index, document) in template.enumerate() {
				let document = document?;
				if index > 0 {
					stdout.write_all(DOCUMENT_SEPARATOR.as_bytes())?;
				}
				stdout.write_all(&document.output)?;
			}
			stdout.flush()?;
		}
	}

	Ok(())
}

fn run_adapt(args: &MergeCli, input: &InputArgs) -> CliResult<()> {
	let session = Session::load(args)?;
	let table = session.load_table(&input.data)?;
	let template = session.load_template(input, &table)?;

	print!("{}", template.adapted_source());
	std::io::stdout().flush()?;

	Ok(())
}

/// Run a check and return whether every output file is current.
fn run_check(
	args: &MergeCli,
	input: &InputArgs,
	out: Option<&Path>,
	show_diff: bool,
) -> CliResult<bool> {
	let session = Session::load(args)?;
	let table = session.load_table(&input.data)?;
	let mut template = session.load_template(input, &table)?;
	let Some(options) = session.output_options(out) else {
		return Err(
			"no output directory to check; pass --out or set [output] directory in csvmerge.toml"
				.into(),
		);
	};

	let plan = plan_outputs(&mut template, &options)?;
	let result = check_outputs(&plan)?;

	if result.is_ok() {
		println!(
			"Check passed: all {} rendered file(s) are up to date.",
			result.checked
		);
		return Ok(true);
	}

	eprintln!("Check failed.");
	eprintln!("  missing files: {}", result.missing());
	eprintln!("  stale files: {}", result.stale.len() - result.missing());
	eprintln!();

	for stale in &result.stale {
		let rel = make_relative(&stale.path, &session.root);
		match &stale.current {
			None => eprintln!("{} {rel} is missing", colored!("missing:", yellow)),
			Some(current) => {
				eprintln!("{} {rel} is out of date", colored!("stale:", yellow));
				if show_diff {
					print_diff(current, &stale.expected);
				}
			}
		}
	}

	eprintln!();
	eprintln!("Run `csvmerge render` to rewrite the output files.");

	Ok(false)
}

fn run_columns(args: &MergeCli, data: &DataArgs) -> CliResult<()> {
	let session = Session::load(args)?;
	let table = session.load_table(data)?;

	println!("{}", colored!(table.file().name(), bold));
	for (position, name) in table.header().names().iter().enumerate() {
		println!("  {position:>3}  {name}");
	}

	if args.verbose {
		println!();
		println!("{} row(s)", table.len());
	}

	Ok(())
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
