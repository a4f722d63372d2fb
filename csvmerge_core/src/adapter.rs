use std::io::Read;

use crate::Header;
use crate::MergeError;
use crate::MergeResult;
use crate::NamedFile;
use crate::Table;
use crate::scanner::OPEN;
use crate::scanner::Scan;
use crate::scanner::Scanner;
use crate::scanner::trim_action;

/// The context variable adapted templates index into.
pub const ROW_VARIABLE: &str = "row";

/// Block and comment openers that would otherwise be read as engine syntax
/// when they appear in free text.
const ENGINE_OPENERS: [&[u8]; 2] = [b"{%", b"{#"];

/// Rewrite every named placeholder in `source` into a positional lookup
/// against `header`.
///
/// `{{ RecipientName }}` becomes `{{ row[1] }}` when `RecipientName` is the
/// second header column. Text outside placeholders renders verbatim: any
/// `{%` or `{#` in it is emitted as a string literal expression. Any
/// unterminated action or unknown column name fails the whole adaptation.
pub fn adapt(header: &Header, source: impl Read) -> MergeResult<Vec<u8>> {
	let mut scanner = Scanner::new(source);
	let mut adapted = Vec::new();
	let mut text = Vec::new();
	let mut action = Vec::new();
	let mut placeholders = 0_usize;

	loop {
		text.clear();
		let scan = scanner.read_until_open(&mut text)?;
		if scan == Scan::Exhausted {
			push_free_text(&mut adapted, &text);
			break;
		}

		push_free_text(&mut adapted, &text[..text.len() - OPEN.len()]);
		adapted.extend_from_slice(&OPEN);

		let opened_at = scanner.offset() - OPEN.len();
		action.clear();
		if scanner.read_until_close(&mut action)? == Scan::Exhausted {
			return Err(MergeError::UnterminatedAction { offset: opened_at });
		}

		let key = std::str::from_utf8(trim_action(&action))
			.map_err(|_| MergeError::InvalidActionEncoding { offset: opened_at })?;
		let Some(position) = header.find_position(key) else {
			return Err(MergeError::UnknownColumn {
				key: key.to_string(),
			});
		};

		adapted.extend_from_slice(format!(" {ROW_VARIABLE}[{position}] }}}}").as_bytes());
		placeholders += 1;
	}

	tracing::debug!(placeholders, bytes = adapted.len(), "adapted template");
	Ok(adapted)
}

/// Copy free text into `adapted`, wrapping engine openers in string literals.
fn push_free_text(adapted: &mut Vec<u8>, text: &[u8]) {
	let mut start = 0;
	let mut index = 0;

	while index + 1 < text.len() {
		let pair = &text[index..index + 2];
		if ENGINE_OPENERS.contains(&pair) {
			adapted.extend_from_slice(&text[start..index]);
			adapted.extend_from_slice(b"{{ \"");
			adapted.extend_from_slice(pair);
			adapted.extend_from_slice(b"\" }}");
			index += 2;
			start = index;
		} else {
			index += 1;
		}
	}

	adapted.extend_from_slice(&text[start..]);
}

/// Adapt a template file against the header of `table`.
pub fn adapt_file(table: &Table, file: &NamedFile) -> MergeResult<Vec<u8>> {
	adapt(table.header(), file.content())
}
