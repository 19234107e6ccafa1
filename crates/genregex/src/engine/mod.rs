//! # Regex Engines
//!
//! All of the real matching machinery lives behind the [`RegexEngine`] trait;
//! this crate only keeps books around it.
//!
//! * Labeling Patterns - [`RegexPattern`]
//!   * [`RegexPattern::Basic`] - a pattern which was written for basic regular expressions.
//!   * [`RegexPattern::Fancy`] - a pattern which was written for regex extensions.
//!   * [`RegexPattern::Adaptive`] - unknown target, try basic; then fall-up to fancy.
//! * Compiling, querying, executing and JIT-optimizing - [`RegexEngine`]
//!   * [`StandardEngine`] - backed by [`regex`], [`fancy_regex`] and [`regex_automata`].
//!
//! Releasing a compiled form is the `Drop` of [`RegexEngine::Code`].

use core::{fmt, ops::Range};

use crate::options::CompileOptions;

mod regex_pattern;
mod standard;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

#[doc(inline)]
pub use regex_pattern::*;
#[doc(inline)]
pub use standard::*;

/// A compile failure reported by an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCompileError {
    /// Engine error text.
    pub message: String,

    /// Byte offset into the pattern where compilation failed.
    pub offset: usize,
}

/// Post-compile metadata queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoQuery {
    /// Number of capture groups, excluding the whole match.
    CaptureCount,

    /// Number of named capture groups.
    NameCount,

    /// Size in bytes of one name-table entry.
    NameEntrySize,

    /// The raw name table.
    NameTable,
}

impl fmt::Display for InfoQuery {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(match self {
            Self::CaptureCount => "CAPTURECOUNT",
            Self::NameCount => "NAMECOUNT",
            Self::NameEntrySize => "NAMEENTRYSIZE",
            Self::NameTable => "NAMETABLE",
        })
    }
}

/// A failed metadata query; carries the engine's numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoError(pub i32);

/// Info failure code: a named group number does not fit a name table entry.
pub const INFO_GROUP_OVERFLOW: i32 = -3;

/// An engine failure during matching; never a plain no-match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecFailure {
    /// Engine failure code; always negative.
    pub code: i32,

    /// Engine failure text.
    pub message: String,
}

/// The engine declined to JIT-optimize a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JitUnsupported {
    /// Why.
    pub reason: String,
}

/// A regular expression engine.
///
/// Compiled forms are shared read-only across worker threads; `exec` must be
/// reentrant for concurrent use of one `Code`. Engines are owned by the
/// generation scope's cleanups, hence `'static`.
pub trait RegexEngine: Send + Sync + 'static {
    /// The opaque compiled form.
    type Code: Send + Sync;

    /// Compile a pattern.
    fn compile(
        &self,
        pattern: &RegexPattern,
        options: CompileOptions,
    ) -> Result<Self::Code, EngineCompileError>;

    /// Number of capture groups, excluding group 0.
    fn capture_count(
        &self,
        code: &Self::Code,
    ) -> Result<usize, InfoError>;

    /// Number of named capture groups.
    fn name_count(
        &self,
        code: &Self::Code,
    ) -> Result<usize, InfoError>;

    /// Size of one entry in the name table.
    fn name_entry_size(
        &self,
        code: &Self::Code,
    ) -> Result<usize, InfoError>;

    /// The name table; see [`NameTable`](crate::names::NameTable) for the layout.
    fn name_table(
        &self,
        code: &Self::Code,
    ) -> Result<Vec<u8>, InfoError>;

    /// Run a match.
    ///
    /// ## Arguments
    /// * `code` - the compiled form.
    /// * `input` - the haystack.
    /// * `slots` - capture slots to fill; slot 0 is the whole match.
    ///   May be empty, in which case only a match decision is made.
    ///
    /// ## Returns
    /// * `Ok(Some(n))` - matched; `n` slots were written.
    /// * `Ok(None)` - no match.
    /// * `Err(_)` - engine failure.
    fn exec(
        &self,
        code: &Self::Code,
        input: &str,
        slots: &mut [Option<Range<usize>>],
    ) -> Result<Option<usize>, ExecFailure>;

    /// Does this engine build support JIT optimization at all?
    fn jit_available(&self) -> bool;

    /// JIT-optimize a compiled form in place.
    ///
    /// Repeat calls on an already optimized form succeed.
    fn jit_compile(
        &self,
        code: &Self::Code,
    ) -> Result<(), JitUnsupported>;
}
