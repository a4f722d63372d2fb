use std::sync::OnceLock;

/// A header name paired with its position in the original header row.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HeaderField {
	name: String,
	position: usize,
}

/// The header row of a [`Table`](crate::Table) together with a lazily built
/// name index.
///
/// The first call to [`Header::find_position`] copies the header into
/// `(name, position)` pairs sorted by name. Every later lookup is a binary
/// search over that index. The build happens at most once, even when several
/// threads race on first use.
#[derive(Debug, Clone, Default)]
pub struct Header {
	names: Vec<String>,
	sorted: OnceLock<Vec<HeaderField>>,
}

impl Header {
	pub fn new(names: Vec<String>) -> Self {
		Self {
			names,
			sorted: OnceLock::new(),
		}
	}

	/// Number of header fields.
	pub fn len(&self) -> usize {
		self.names.len()
	}

	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}

	/// Header names in their original order.
	pub fn names(&self) -> &[String] {
		&self.names
	}

	/// Whether the sorted name index has been built yet.
	pub fn is_built(&self) -> bool {
		self.sorted.get().is_some()
	}

	/// Resolve `name` to its zero-based column position.
	///
	/// Matching is exact and case-sensitive. When the header holds the same
	/// name more than once the first occurrence wins: the sort is stable and
	/// the search returns the lower bound.
	pub fn find_position(&self, name: &str) -> Option<usize> {
		let sorted = self.sorted.get_or_init(|| self.build_index());
		let index = sorted.partition_point(|field| field.name.as_str() < name);

		sorted
			.get(index)
			.filter(|field| field.name == name)
			.map(|field| field.position)
	}

	fn build_index(&self) -> Vec<HeaderField> {
		let mut sorted: Vec<HeaderField> = self
			.names
			.iter()
			.enumerate()
			.map(|(position, name)| {
				HeaderField {
					name: name.clone(),
					position,
				}
			})
			.collect();
		sorted.sort_by(|a, b| a.name.cmp(&b.name));

		tracing::debug!(fields = sorted.len(), "built header index");
		sorted
	}
}

impl PartialEq for Header {
	fn eq(&self, other: &Self) -> bool {
		self.names == other.names
	}
}

impl Eq for Header {}
