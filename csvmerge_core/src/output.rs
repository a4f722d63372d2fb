use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use crate::Document;
use crate::MergeError;
use crate::MergeResult;
use crate::Template;

/// Where and how rendered documents are written.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
	/// Directory receiving one file per row.
	pub directory: PathBuf,
	/// Extension appended to every file name, without the leading dot.
	pub extension: Option<String>,
	/// Header column whose value names each file. Rows are numbered when
	/// absent.
	pub name_column: Option<String>,
}

/// A rendered document paired with the file it belongs in.
#[derive(Debug, Clone)]
pub struct PlannedOutput {
	pub path: PathBuf,
	pub document: Document,
}

/// Every document of a template, mapped to its output file.
#[derive(Debug, Clone)]
pub struct RenderPlan {
	pub directory: PathBuf,
	pub outputs: Vec<PlannedOutput>,
}

/// A planned output whose file on disk is missing or differs.
#[derive(Debug, Clone)]
pub struct StaleOutput {
	pub path: PathBuf,
	/// Current file content, `None` when the file does not exist.
	pub current: Option<String>,
	pub expected: String,
}

/// Result of comparing a [`RenderPlan`] with the files on disk.
#[derive(Debug, Default)]
pub struct CheckResult {
	pub stale: Vec<StaleOutput>,
	/// Number of planned files that were compared.
	pub checked: usize,
}

impl CheckResult {
	/// Returns true if every planned file is present and current.
	pub fn is_ok(&self) -> bool {
		self.stale.is_empty()
	}

	/// Number of stale outputs whose file does not exist yet.
	pub fn missing(&self) -> usize {
		self.stale.iter().filter(|s| s.current.is_none()).count()
	}
}

/// Render every remaining row of `template` and assign each document a path
/// inside `options.directory`.
///
/// The first render error aborts the plan.
pub fn plan_outputs(template: &mut Template<'_>, options: &OutputOptions) -> MergeResult<RenderPlan> {
	let table = template.table();
	let name_position = match &options.name_column {
		Some(column) => {
			let position = table.header().find_position(column).ok_or_else(|| {
				MergeError::OutputName(format!("column `{column}` not found in csv header"))
			})?;
			Some(position)
		}
		None => None,
	};
	let width = table.len().max(1).to_string().len();
	let first_row = template.cursor();

	let documents = template.render_all().into_result()?;
	let mut seen = HashSet::new();
	let mut outputs = Vec::with_capacity(documents.len());

	for (offset, document) in documents.into_iter().enumerate() {
		let number = first_row + offset + 1;
		let stem = match name_position {
			Some(position) => {
				let stem = sanitize_file_stem(&document.row[position]);
				if stem.is_empty() {
					return Err(MergeError::OutputName(format!(
						"row {number} has no usable value in the name column"
					)));
				}
				stem
			}
			None => format!("{number:0width$}"),
		};

		let file_name = match options.extension.as_deref().map(|e| e.trim_start_matches('.')) {
			Some(extension) if !extension.is_empty() => format!("{stem}.{extension}"),
			_ => stem,
		};

		if !seen.insert(file_name.clone()) {
			return Err(MergeError::OutputName(format!(
				"row {number} produces duplicate file name `{file_name}`"
			)));
		}

		outputs.push(PlannedOutput {
			path: options.directory.join(file_name),
			document,
		});
	}

	Ok(RenderPlan {
		directory: options.directory.clone(),
		outputs,
	})
}

/// Compare each planned document with the file already on disk.
pub fn check_outputs(plan: &RenderPlan) -> MergeResult<CheckResult> {
	let mut result = CheckResult::default();

	for output in &plan.outputs {
		result.checked += 1;
		let current = read_existing(&output.path)?;

		if current.as_deref() != Some(output.document.output.as_slice()) {
			result.stale.push(StaleOutput {
				path: output.path.clone(),
				current: current.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()),
				expected: output.document.text().into_owned(),
			});
		}
	}

	Ok(result)
}

/// Write every planned document, creating the output directory if needed.
/// Returns the number of files written.
pub fn write_outputs(plan: &RenderPlan) -> MergeResult<usize> {
	std::fs::create_dir_all(&plan.directory)?;

	for output in &plan.outputs {
		std::fs::write(&output.path, &output.document.output)?;
	}

	tracing::debug!(
		directory = %plan.directory.display(),
		files = plan.outputs.len(),
		"wrote outputs"
	);
	Ok(plan.outputs.len())
}

fn read_existing(path: &Path) -> MergeResult<Option<Vec<u8>>> {
	match std::fs::read(path) {
		Ok(bytes) => Ok(Some(bytes)),
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
		Err(e) => Err(e.into()),
	}
}

/// Replace anything that is unsafe in a file name with `_` and strip
/// leading and trailing dots.
fn sanitize_file_stem(value: &str) -> String {
	let stem: String = value
		.trim()
		.chars()
		.map(|c| {
			if c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '@') {
				c
			} else {
				'_'
			}
		})
		.collect();

	stem.trim_matches('.').to_string()
}
