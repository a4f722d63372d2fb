use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::MergeError;
use crate::MergeResult;
use crate::OutputOptions;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["csvmerge.toml", ".csvmerge.toml", ".config/csvmerge.toml"];

/// Extension used for output files when none is configured.
pub const DEFAULT_OUTPUT_EXTENSION: &str = "txt";

/// Configuration loaded from a `csvmerge.toml` file.
///
/// ```toml
/// data = "recipients.csv"
/// template = "letter.txt"
///
/// [output]
/// directory = "out"
/// extension = "txt"
/// name_column = "RecipientName"
/// ```
///
/// Relative paths are resolved against the project root.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeConfig {
	/// Path to the csv file providing the rows.
	#[serde(default)]
	pub data: Option<PathBuf>,
	/// Path to the template rendered once per row.
	#[serde(default)]
	pub template: Option<PathBuf>,
	/// Where rendered documents are written.
	#[serde(default)]
	pub output: OutputConfig,
}

/// The `[output]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
	/// Directory receiving one file per row. Documents go to stdout when
	/// neither this nor `--out` is set.
	#[serde(default)]
	pub directory: Option<PathBuf>,
	/// File extension for rendered documents. Defaults to `txt`.
	#[serde(default)]
	pub extension: Option<String>,
	/// Header column whose values name the output files.
	#[serde(default)]
	pub name_column: Option<String>,
}

impl MergeConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> MergeResult<Option<MergeConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	pub fn parse(content: &str) -> MergeResult<MergeConfig> {
		toml::from_str(content).map_err(|e| MergeError::ConfigParse(e.to_string()))
	}

	/// Build [`OutputOptions`] rooted at `root`, letting `directory` override
	/// the configured output directory. Returns `None` when no directory is
	/// known.
	pub fn output_options(&self, root: &Path, directory: Option<&Path>) -> Option<OutputOptions> {
		let directory = directory.or(self.output.directory.as_deref())?;

		Some(OutputOptions {
			directory: root.join(directory),
			extension: Some(
				self.output
					.extension
					.clone()
					.unwrap_or_else(|| DEFAULT_OUTPUT_EXTENSION.to_string()),
			),
			name_column: self.output.name_column.clone(),
		})
	}
}
