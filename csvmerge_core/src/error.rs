use miette::Diagnostic;
use thiserror::Error;

/// The broad category of a [`MergeError`].
///
/// Callers that only care about which stage rejected their input match on
/// this instead of on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
	/// Malformed file metadata (empty name or mimetype).
	InvalidFile,
	/// Malformed tabular input.
	InvalidTable,
	/// Malformed template source.
	InvalidTemplate,
	/// Failure reported by the template engine while compiling or rendering.
	Template,
	/// Failure reading or writing the filesystem.
	Io,
	/// Invalid configuration or output naming.
	Config,
}

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum MergeError {
	#[error(transparent)]
	#[diagnostic(code(csvmerge::io_error))]
	Io(#[from] std::io::Error),

	#[error("invalid file: {0}")]
	#[diagnostic(
		code(csvmerge::invalid_file),
		help("files need a non-empty name and mimetype")
	)]
	InvalidFile(String),

	#[error("invalid csv: error reading header row: {0}")]
	#[diagnostic(code(csvmerge::invalid_table_header))]
	InvalidTableHeader(String),

	#[error("invalid csv: error reading body: {0}")]
	#[diagnostic(code(csvmerge::invalid_table_body))]
	InvalidTableBody(String),

	#[error("invalid csv: line {line} has {got} fields; header indicates {expected}")]
	#[diagnostic(
		code(csvmerge::row_width),
		help("every row must have exactly as many fields as the header row")
	)]
	RowWidth {
		line: u64,
		got: usize,
		expected: usize,
	},

	#[error("invalid template: no action end found after opening `{{{{` at byte {offset}")]
	#[diagnostic(
		code(csvmerge::unterminated_action),
		help("close the placeholder with `}}}}`")
	)]
	UnterminatedAction { offset: usize },

	#[error("invalid template: action opened at byte {offset} is not valid UTF-8")]
	#[diagnostic(code(csvmerge::invalid_action_encoding))]
	InvalidActionEncoding { offset: usize },

	#[error("invalid template: key `{key}` not found in csv header")]
	#[diagnostic(
		code(csvmerge::unknown_column),
		help("placeholder names must match a header column exactly, including case")
	)]
	UnknownColumn { key: String },

	#[error("failed to compile adapted template: {0}")]
	#[diagnostic(code(csvmerge::template_compile))]
	TemplateCompile(String),

	#[error("template rendering failed: {0}")]
	#[diagnostic(code(csvmerge::template_render))]
	TemplateRender(String),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(csvmerge::config_parse),
		help("check that csvmerge.toml is valid TOML with optional `data`, `template` and [output] keys")
	)]
	ConfigParse(String),

	#[error("cannot name output file: {0}")]
	#[diagnostic(
		code(csvmerge::output_name),
		help("`name_column` must name a header column whose values are unique and non-empty")
	)]
	OutputName(String),
}

impl MergeError {
	/// The category this error belongs to.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Io(_) => ErrorKind::Io,
			Self::InvalidFile(_) => ErrorKind::InvalidFile,
			Self::InvalidTableHeader(_) | Self::InvalidTableBody(_) | Self::RowWidth { .. } => {
				ErrorKind::InvalidTable
			}
			Self::UnterminatedAction { .. }
			| Self::InvalidActionEncoding { .. }
			| Self::UnknownColumn { .. } => ErrorKind::InvalidTemplate,
			Self::TemplateCompile(_) | Self::TemplateRender(_) => ErrorKind::Template,
			Self::ConfigParse(_) | Self::OutputName(_) => ErrorKind::Config,
		}
	}
}

pub type MergeResult<T> = Result<T, MergeError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
