//! # Compiled Patterns

use core::{fmt, ops::Range};
use std::sync::Arc;

use crate::{
    engine::{RegexEngine, RegexPattern},
    names::NameTable,
    options::CompileOptions,
};

/// Default capacity of an [`ErrorBuffer`].
pub const DEFAULT_ERROR_CAPACITY: usize = 256;

/// A fixed-capacity sink for a human-readable error message.
///
/// Messages longer than the capacity are truncated on a char boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBuffer {
    capacity: usize,
    message: String,
}

impl Default for ErrorBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_ERROR_CAPACITY)
    }
}

impl ErrorBuffer {
    /// Create an empty buffer of the given byte capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            message: String::new(),
        }
    }

    /// Replace the message, truncating it to fit.
    pub fn write(
        &mut self,
        message: &str,
    ) {
        let mut end = message.len().min(self.capacity);
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        self.message.clear();
        self.message.push_str(&message[..end]);
    }

    /// The byte capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The current message.
    pub fn as_str(&self) -> &str {
        &self.message
    }

    /// The current message length.
    pub fn len(&self) -> usize {
        self.message.len()
    }

    /// Is the buffer empty?
    pub fn is_empty(&self) -> bool {
        self.message.is_empty()
    }
}

/// Input to [`RegexCompiler::compile`](crate::compiler::RegexCompiler::compile).
#[derive(Debug, Clone, PartialEq)]
pub struct CompileRequest {
    /// The pattern source.
    pub pattern: RegexPattern,

    /// Engine option bits.
    pub options: CompileOptions,

    /// Receives the failure message, if any.
    pub err: ErrorBuffer,
}

impl CompileRequest {
    /// A request with no options and a default error buffer.
    pub fn new<P>(pattern: P) -> Self
    where
        P: Into<RegexPattern>,
    {
        Self {
            pattern: pattern.into(),
            options: CompileOptions::empty(),
            err: ErrorBuffer::default(),
        }
    }

    /// Set the option bits.
    pub fn with_options(
        self,
        options: CompileOptions,
    ) -> Self {
        Self { options, ..self }
    }

    /// Set the error buffer capacity.
    pub fn with_error_capacity(
        self,
        capacity: usize,
    ) -> Self {
        Self {
            err: ErrorBuffer::with_capacity(capacity),
            ..self
        }
    }
}

/// A compiled pattern and its capture metadata.
///
/// Immutable once built; the engine's compiled form is released when the
/// last handle is dropped.
pub struct CompiledPattern<E: RegexEngine> {
    engine: Arc<E>,
    code: E::Code,
    source: Arc<str>,
    captures: usize,
    named_captures: usize,
    name_size: usize,
    names: Option<NameTable>,
}

impl<E: RegexEngine> fmt::Debug for CompiledPattern<E> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("CompiledPattern")
            .field("source", &self.source)
            .field("captures", &self.captures)
            .field("named_captures", &self.named_captures)
            .finish()
    }
}

impl<E: RegexEngine> CompiledPattern<E> {
    pub(crate) fn new(
        engine: Arc<E>,
        code: E::Code,
        source: Arc<str>,
        captures: usize,
        names: Option<NameTable>,
    ) -> Self {
        Self {
            engine,
            code,
            source,
            captures,
            named_captures: names.as_ref().map_or(0, NameTable::len),
            name_size: names.as_ref().map_or(0, NameTable::entry_size),
            names,
        }
    }

    /// The engine which compiled this pattern.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The engine's compiled form.
    pub fn code(&self) -> &E::Code {
        &self.code
    }

    /// The pattern source, for diagnostics.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn source_handle(&self) -> Arc<str> {
        self.source.clone()
    }

    /// Number of capture groups, excluding the whole match.
    pub fn captures(&self) -> usize {
        self.captures
    }

    /// Number of named capture groups.
    pub fn named_captures(&self) -> usize {
        self.named_captures
    }

    /// Size of one name-table entry; 0 without named groups.
    pub fn name_size(&self) -> usize {
        self.name_size
    }

    /// The name table; `None` without named groups.
    pub fn names(&self) -> Option<&NameTable> {
        self.names.as_ref()
    }

    /// Look up a named group's number.
    pub fn capture_index(
        &self,
        name: &str,
    ) -> Option<usize> {
        self.names.as_ref().and_then(|names| names.group(name))
    }

    /// Group names by group number; index 0 is the whole match.
    pub fn capture_names(&self) -> Vec<Option<&str>> {
        let mut out = vec![None; self.captures + 1];
        if let Some(names) = &self.names {
            for (name, group) in names.entries() {
                if let Some(slot) = out.get_mut(group) {
                    *slot = Some(name);
                }
            }
        }
        out
    }

    /// A capture buffer sized for every group of this pattern.
    pub fn capture_buffer(&self) -> Captures {
        Captures::new(self.captures + 1)
    }
}

/// Caller-owned capture slots; slot 0 is the whole match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captures {
    slots: Vec<Option<Range<usize>>>,
    set: usize,
}

impl Captures {
    /// Slots for at most `max` groups, counting the whole match.
    pub fn new(max: usize) -> Self {
        Self {
            slots: vec![None; max],
            set: 0,
        }
    }

    pub(crate) fn prepare(&mut self) -> &mut [Option<Range<usize>>] {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.set = 0;
        &mut self.slots
    }

    pub(crate) fn set_len(
        &mut self,
        set: usize,
    ) {
        self.set = set.min(self.slots.len());
    }

    /// Capacity, in groups.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots written by the last match.
    pub fn len(&self) -> usize {
        self.set
    }

    /// Did the last match write no slots?
    pub fn is_empty(&self) -> bool {
        self.set == 0
    }

    /// The range of group `i`, if it participated.
    pub fn get(
        &self,
        i: usize,
    ) -> Option<Range<usize>> {
        self.slots[..self.set].get(i).cloned().flatten()
    }

    /// The text of group `i` within `input`.
    pub fn text<'h>(
        &self,
        input: &'h str,
        i: usize,
    ) -> Option<&'h str> {
        self.get(i).and_then(|r| input.get(r))
    }

    /// Iterate every written slot.
    pub fn iter(&self) -> impl Iterator<Item = Option<Range<usize>>> + '_ {
        self.slots[..self.set].iter().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_buffer_truncation() {
        let mut err = ErrorBuffer::with_capacity(8);
        err.write("short");
        assert_eq!(err.as_str(), "short");

        err.write("a much longer message");
        assert_eq!(err.as_str(), "a much l");
        assert_eq!(err.len(), 8);

        // 'é' is two bytes; never split it.
        err.write("abcdefg\u{e9}");
        assert_eq!(err.as_str(), "abcdefg");

        let mut err = ErrorBuffer::with_capacity(0);
        err.write("anything");
        assert!(err.is_empty());
    }

    #[test]
    fn test_request_builder() {
        let rc = CompileRequest::new("^a")
            .with_options(CompileOptions::CASELESS)
            .with_error_capacity(16);
        assert_eq!(rc.pattern.as_str(), "^a");
        assert_eq!(rc.options, CompileOptions::CASELESS);
        assert_eq!(rc.err.capacity(), 16);
    }

    #[test]
    fn test_captures() {
        let mut caps = Captures::new(3);
        assert_eq!(caps.capacity(), 3);
        assert!(caps.is_empty());

        let slots = caps.prepare();
        slots[0] = Some(0..5);
        slots[2] = Some(3..5);
        caps.set_len(3);

        assert_eq!(caps.len(), 3);
        assert_eq!(caps.get(0), Some(0..5));
        assert_eq!(caps.get(1), None);
        assert_eq!(caps.text("hello", 2), Some("lo"));
        assert_eq!(caps.get(7), None);

        caps.prepare();
        assert_eq!(caps.get(0), None);
    }
}
