use std::path::Path;

use crate::MergeError;
use crate::MergeResult;

/// An immutable named blob of bytes with its mimetype.
///
/// Both tables and templates start life as a [`NamedFile`]. The content is
/// copied on construction, so the caller keeps ownership of its buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedFile {
	name: String,
	mimetype: String,
	content: Vec<u8>,
}

impl NamedFile {
	/// Build a file from its parts. `name` and `mimetype` are trimmed and must
	/// not be empty afterwards.
	pub fn new(name: &str, mimetype: &str, content: &[u8]) -> MergeResult<Self> {
		let name = name.trim();
		if name.is_empty() {
			return Err(MergeError::InvalidFile("empty filename".to_string()));
		}

		let mimetype = mimetype.trim();
		if mimetype.is_empty() {
			return Err(MergeError::InvalidFile("empty mimetype".to_string()));
		}

		Ok(Self {
			name: name.to_string(),
			mimetype: mimetype.to_string(),
			content: content.to_vec(),
		})
	}

	/// Read a file from disk. The final path component becomes the name and
	/// the mimetype is guessed from the extension.
	pub fn read(path: &Path) -> MergeResult<Self> {
		let content = std::fs::read(path)?;
		let name = path
			.file_name()
			.map_or_else(|| path.to_string_lossy(), |name| name.to_string_lossy());

		Self::new(&name, guess_mimetype(path), &content)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn mimetype(&self) -> &str {
		&self.mimetype
	}

	pub fn content(&self) -> &[u8] {
		&self.content
	}
}

/// Guess a mimetype from a path's extension, falling back to `text/plain`.
pub fn guess_mimetype(path: &Path) -> &'static str {
	let extension = path
		.extension()
		.map(|ext| ext.to_string_lossy().to_ascii_lowercase());

	match extension.as_deref() {
		Some("csv") => "text/csv",
		Some("html" | "htm") => "text/html",
		Some("md" | "markdown") => "text/markdown",
		_ => "text/plain",
	}
}
