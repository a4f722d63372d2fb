//! `csvmerge_core` is the core library for the
//! [csvmerge](https://github.com/ifiokjr/csvmerge) mail-merge tool. It turns a
//! csv file and a template with named placeholders into one rendered document
//! per csv row.
//!
//! ## Processing Pipeline
//!
//! ```text
//! csv bytes
//!   → Table (header + fixed-width rows)
//! template bytes + Table header
//!   → Scanner (finds `{{ ... }}` actions, byte at a time)
//!   → Adapter (resolves names through the header index, rewrites to `{{ row[i] }}`)
//!   → Template (compiles once, renders row after row)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from `csvmerge.toml`.
//! - [`output`]: Mapping rendered documents to files, checking and writing
//!   them.
//! - [`scanner`]: The placeholder delimiter scanner.
//!
//! ## Key Types
//!
//! - [`NamedFile`]: An immutable name, mimetype and content triple.
//! - [`Table`]: A parsed csv file with its [`Header`] and [`Row`]s.
//! - [`Header`]: The header row with a lazily built name index.
//! - [`Template`]: A template adapted to a table and rendered row by row.
//! - [`MergeError`]: Every failure, grouped by [`ErrorKind`].
//!
//! ## Quick Start
//!
//! ```rust
//! use csvmerge_core::Table;
//! use csvmerge_core::Template;
//!
//! let table = Table::new(
//! 	"people.csv",
//! 	"text/csv",
//! 	b"Name,City\nAda,London\nGrace,Arlington\n",
//! )?;
//! let mut template = Template::new(
//! 	"greeting.txt",
//! 	"text/plain",
//! 	b"Hi {{ Name }} from {{ City }}!",
//! 	&table,
//! )?;
//!
//! assert_eq!(template.adapted_source(), "Hi {{ row[0] }} from {{ row[1] }}!");
//!
//! let documents = template.render_all().into_result()?;
//! assert_eq!(documents[0].text(), "Hi Ada from London!");
//! assert_eq!(documents[1].text(), "Hi Grace from Arlington!");
//! # Ok::<(), csvmerge_core::MergeError>(())
//! ```

pub use adapter::*;
pub use config::*;
pub use error::*;
pub use file::*;
pub use header::*;
pub use output::*;
pub use renderer::*;
pub use table::*;

mod adapter;
pub mod config;
#[allow(unused_assignments)]
mod error;
mod file;
mod header;
pub mod output;
mod renderer;
pub mod scanner;
mod table;

#[cfg(test)]
mod __fixtures;
