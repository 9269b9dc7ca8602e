use derive_more::Display;

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct Span {
	pub file_id: usize,
	pub start: usize,
	pub end: usize,
}

impl Span {
	#[must_use]
	pub fn range(&self) -> std::ops::Range<usize> {
		self.start..self.end
	}

	/// Resolves the start of this span against the source it was lexed from.
	#[must_use]
	pub fn position(&self, source: &str) -> Position {
		Position::of(source, self.start)
	}
}

impl std::ops::Add for Span {
	type Output = Span;

	fn add(self, rhs: Self) -> Self::Output {
		assert!(self.file_id == rhs.file_id);
		Self {
			file_id: self.file_id,
			start: self.start.min(rhs.start),
			end: self.end.max(rhs.end),
		}
	}
}

impl std::fmt::Display for Span {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_fmt(format_args!(
			"file id {} @ {}..{}",
			self.file_id, self.start, self.end
		))
	}
}

impl chumsky::Span for Span {
	type Context = usize; // file id
	type Offset = usize; // byte offset

	fn new(context: Self::Context, range: std::ops::Range<Self::Offset>) -> Self {
		Self {
			file_id: context,
			start: range.start,
			end: range.end,
		}
	}

	fn context(&self) -> Self::Context {
		self.file_id
	}

	fn start(&self) -> Self::Offset {
		self.start
	}

	fn end(&self) -> Self::Offset {
		self.end
	}
}

/// A human-facing location: `offset` counts characters from the start of the
/// source, `line` and `column` are 1-based.
#[derive(Debug, Display, Clone, Copy, Hash, PartialEq, Eq)]
#[display(fmt = "line {line} column {column}")]
pub struct Position {
	pub offset: usize,
	pub line: usize,
	pub column: usize,
}

impl Position {
	/// `byte` is clamped to the source length and to the nearest preceding
	/// char boundary.
	#[must_use]
	pub fn of(source: &str, byte: usize) -> Self {
		let mut byte = byte.min(source.len());
		while !source.is_char_boundary(byte) {
			byte -= 1;
		}
		let before = &source[..byte];
		let line_start = before.rfind('\n').map_or(0, |x| x + 1);
		Self {
			offset: before.chars().count(),
			line: before.matches('\n').count() + 1,
			column: before[line_start..].chars().count() + 1,
		}
	}
}

pub type SpannedRaw<T> = (T, Span);

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct Spanned<T> {
	pub span: Span,
	pub value: T,
}

impl<T: std::fmt::Display> std::fmt::Display for Spanned<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_fmt(format_args!("{}", self.value))
	}
}

pub trait AddSpan<T>: Sized {
	fn add_span(self, span: Span) -> Spanned<Self> {
		Spanned { value: self, span }
	}
}

impl<T> AddSpan<T> for T {}
