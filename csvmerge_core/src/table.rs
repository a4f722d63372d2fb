use derive_more::Deref;
use serde::Serialize;

use crate::Header;
use crate::MergeError;
use crate::MergeResult;
use crate::NamedFile;

/// One body row of a [`Table`]. Always exactly as wide as the header.
#[derive(Debug, Clone, PartialEq, Eq, Deref, Serialize)]
#[serde(transparent)]
pub struct Row(Vec<String>);

impl Row {
	pub fn into_inner(self) -> Vec<String> {
		self.0
	}
}

impl From<Vec<String>> for Row {
	fn from(fields: Vec<String>) -> Self {
		Self(fields)
	}
}

/// A parsed csv file: a header row followed by fixed-width body rows.
///
/// Construction either validates every row or fails as a whole; there is no
/// partially built table.
#[derive(Debug, Clone)]
pub struct Table {
	file: NamedFile,
	header: Header,
	rows: Vec<Row>,
}

impl Table {
	/// Build the backing [`NamedFile`] and parse it.
	pub fn new(name: &str, mimetype: &str, content: &[u8]) -> MergeResult<Self> {
		Self::parse(NamedFile::new(name, mimetype, content)?)
	}

	/// Parse a csv file whose first record is the header.
	pub fn parse(file: NamedFile) -> MergeResult<Self> {
		let mut reader = csv::ReaderBuilder::new()
			.has_headers(false)
			.flexible(true)
			.from_reader(file.content());
		let mut records = reader.records();

		let header = match records.next() {
			Some(Ok(record)) => Header::new(record.iter().map(str::to_string).collect()),
			Some(Err(e)) => return Err(MergeError::InvalidTableHeader(e.to_string())),
			None => return Err(MergeError::InvalidTableHeader("no header row".to_string())),
		};

		let expected = header.len();
		let mut rows = Vec::new();
		for record in records {
			let record = record.map_err(|e| MergeError::InvalidTableBody(e.to_string()))?;

			if record.len() != expected {
				return Err(MergeError::RowWidth {
					line: record.position().map_or(0, csv::Position::line),
					got: record.len(),
					expected,
				});
			}

			rows.push(Row(record.iter().map(str::to_string).collect()));
		}

		tracing::debug!(
			file = file.name(),
			columns = expected,
			rows = rows.len(),
			"parsed table"
		);

		Ok(Self { file, header, rows })
	}

	pub fn file(&self) -> &NamedFile {
		&self.file
	}

	pub fn header(&self) -> &Header {
		&self.header
	}

	pub fn rows(&self) -> &[Row] {
		&self.rows
	}

	/// Number of body rows.
	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}
}
