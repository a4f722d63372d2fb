use std::io::BufReader;
use std::io::Bytes;
use std::io::Read;

/// Opens a placeholder action.
pub const OPEN: [u8; 2] = *b"{{";
/// Closes a placeholder action.
pub const CLOSE: [u8; 2] = *b"}}";

/// Characters stripped from both ends of an action before it is treated as a
/// column name: whitespace plus the field-access punctuation of the template
/// language.
const ACTION_TRIM: &[u8] = b" \t\n.}";

/// The outcome of scanning for a delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
	/// The delimiter was found and consumed.
	Found,
	/// The input ended before the delimiter appeared.
	Exhausted,
}

/// The last two bytes read, compared against a delimiter after each byte.
#[derive(Debug, Default, Clone, Copy)]
struct Window {
	bytes: [u8; 2],
	filled: usize,
}

impl Window {
	fn push(&mut self, byte: u8) {
		self.bytes = [self.bytes[1], byte];
		self.filled = (self.filled + 1).min(2);
	}

	fn matches(&self, delimiter: [u8; 2]) -> bool {
		self.filled == 2 && self.bytes == delimiter
	}
}

/// A forward-only, byte-at-a-time scanner for placeholder delimiters.
///
/// Each search starts with an empty window, so a delimiter never straddles
/// the boundary between two searches.
pub struct Scanner<R> {
	bytes: Bytes<BufReader<R>>,
	offset: usize,
}

impl<R: Read> Scanner<R> {
	pub fn new(reader: R) -> Self {
		Self {
			bytes: BufReader::new(reader).bytes(),
			offset: 0,
		}
	}

	/// Number of bytes consumed so far.
	pub fn offset(&self) -> usize {
		self.offset
	}

	/// Copy bytes into `out` up to and including the next [`OPEN`] delimiter.
	pub fn read_until_open(&mut self, out: &mut Vec<u8>) -> std::io::Result<Scan> {
		self.read_until(OPEN, out)
	}

	/// Copy bytes into `out` up to the next [`CLOSE`] delimiter. The delimiter
	/// is consumed but not left in `out`.
	pub fn read_until_close(&mut self, out: &mut Vec<u8>) -> std::io::Result<Scan> {
		let scan = self.read_until(CLOSE, out)?;
		if scan == Scan::Found {
			out.truncate(out.len() - CLOSE.len());
		}

		Ok(scan)
	}

	fn read_until(&mut self, delimiter: [u8; 2], out: &mut Vec<u8>) -> std::io::Result<Scan> {
		let mut window = Window::default();

		for byte in self.bytes.by_ref() {
			let byte = byte?;
			self.offset += 1;
			out.push(byte);
			window.push(byte);

			if window.matches(delimiter) {
				return Ok(Scan::Found);
			}
		}

		Ok(Scan::Exhausted)
	}
}

/// Strip whitespace and field-access punctuation from both ends of an action.
pub fn trim_action(action: &[u8]) -> &[u8] {
	let start = action
		.iter()
		.position(|byte| !ACTION_TRIM.contains(byte))
		.unwrap_or(action.len());
	let end = action
		.iter()
		.rposition(|byte| !ACTION_TRIM.contains(byte))
		.map_or(start, |index| index + 1);

	&action[start..end]
}
