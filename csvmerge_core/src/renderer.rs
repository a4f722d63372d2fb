use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::MergeError;
use crate::MergeResult;
use crate::NamedFile;
use crate::Row;
use crate::Table;
use crate::adapter::ROW_VARIABLE;
use crate::adapter::adapt_file;

/// A rendered document and the row that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
	/// The rendered bytes.
	pub output: Vec<u8>,
	/// A copy of the row the document was rendered from.
	pub row: Row,
}

impl Document {
	/// The rendered output as text.
	pub fn text(&self) -> Cow<'_, str> {
		String::from_utf8_lossy(&self.output)
	}
}

/// The result of asking a [`Template`] for its next document.
#[derive(Debug)]
pub enum Step {
	/// The next row was rendered.
	Rendered(Document),
	/// Every row has been rendered. This is the normal end of the sequence.
	Exhausted,
}

/// Whether a [`Template`] still has rows to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererState {
	Active,
	Exhausted,
}

/// Everything [`Template::render_all`] produced before it stopped.
#[derive(Debug, Default)]
pub struct RenderAll {
	/// Documents rendered in row order.
	pub documents: Vec<Document>,
	/// The error that stopped rendering, if any. Whether the documents
	/// produced before it are usable is up to the caller.
	pub error: Option<MergeError>,
}

impl RenderAll {
	/// Returns true if every row rendered.
	pub fn is_ok(&self) -> bool {
		self.error.is_none()
	}

	pub fn outputs(&self) -> impl Iterator<Item = &[u8]> {
		self.documents.iter().map(|document| document.output.as_slice())
	}

	pub fn rows(&self) -> impl Iterator<Item = &Row> {
		self.documents.iter().map(|document| &document.row)
	}

	/// Discard partial output when an error occurred.
	pub fn into_result(self) -> MergeResult<Vec<Document>> {
		match self.error {
			Some(error) => Err(error),
			None => Ok(self.documents),
		}
	}
}

/// A template adapted to a table's header, rendered one row at a time.
///
/// The adapted source is compiled once at construction. A cursor walks the
/// table's rows in order; it only moves forward and cannot be rewound.
#[derive(Debug)]
pub struct Template<'a> {
	raw: NamedFile,
	table: &'a Table,
	adapted_source: String,
	env: minijinja::Environment<'static>,
	cursor: usize,
}

impl<'a> Template<'a> {
	/// Build the template file, adapt it to `table` and compile it.
	pub fn new(name: &str, mimetype: &str, content: &[u8], table: &'a Table) -> MergeResult<Self> {
		Self::from_file(NamedFile::new(name, mimetype, content)?, table)
	}

	pub fn from_file(raw: NamedFile, table: &'a Table) -> MergeResult<Self> {
		let adapted = adapt_file(table, &raw)?;
		let adapted_source = String::from_utf8(adapted)
			.map_err(|e| MergeError::TemplateCompile(format!("template is not valid UTF-8: {e}")))?;

		let mut env = minijinja::Environment::new();
		env.set_keep_trailing_newline(true);
		env.set_auto_escape_callback(|_| minijinja::AutoEscape::None);
		env.set_undefined_behavior(minijinja::UndefinedBehavior::Strict);
		env.add_template_owned(raw.name().to_string(), adapted_source.clone())
			.map_err(|e| MergeError::TemplateCompile(e.to_string()))?;

		Ok(Self {
			raw,
			table,
			adapted_source,
			env,
			cursor: 0,
		})
	}

	/// The template file as it was given.
	pub fn raw(&self) -> &NamedFile {
		&self.raw
	}

	/// The template source with every placeholder rewritten to a positional
	/// lookup.
	pub fn adapted_source(&self) -> &str {
		&self.adapted_source
	}

	pub fn table(&self) -> &'a Table {
		self.table
	}

	/// Index of the next row to render.
	pub fn cursor(&self) -> usize {
		self.cursor
	}

	/// Number of rows not yet rendered.
	pub fn remaining(&self) -> usize {
		self.table.len() - self.cursor
	}

	pub fn state(&self) -> RendererState {
		if self.cursor < self.table.len() {
			RendererState::Active
		} else {
			RendererState::Exhausted
		}
	}

	/// Render the row under the cursor and advance past it.
	///
	/// Returns [`Step::Exhausted`] once every row has been rendered, and keeps
	/// returning it on every later call.
	pub fn next_document(&mut self) -> MergeResult<Step> {
		let Some(row) = self.table.rows().get(self.cursor) else {
			return Ok(Step::Exhausted);
		};
		let row = row.clone();
		self.cursor += 1;

		let template = self
			.env
			.get_template(self.raw.name())
			.map_err(|e| MergeError::TemplateRender(e.to_string()))?;
		let context = BTreeMap::from([(ROW_VARIABLE, &row)]);
		let output = template
			.render(context)
			.map_err(|e| MergeError::TemplateRender(e.to_string()))?;

		tracing::trace!(row = self.cursor, bytes = output.len(), "rendered row");

		Ok(Step::Rendered(Document {
			output: output.into_bytes(),
			row,
		}))
	}

	/// Render every remaining row, stopping at the first error.
	pub fn render_all(&mut self) -> RenderAll {
		let mut result = RenderAll::default();

		loop {
			match self.next_document() {
				Ok(Step::Rendered(document)) => result.documents.push(document),
				Ok(Step::Exhausted) => break,
				Err(error) => {
					result.error = Some(error);
					break;
				}
			}
		}

		result
	}
}

impl Iterator for Template<'_> {
	type Item = MergeResult<Document>;

	fn next(&mut self) -> Option<Self::Item> {
		match self.next_document() {
			Ok(Step::Rendered(document)) => Some(Ok(document)),
			Ok(Step::Exhausted) => None,
			Err(error) => Some(Err(error)),
		}
	}
}
