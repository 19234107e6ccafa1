//! # Standard Engine
//! This module mixes `regex`, `fancy_regex` and `regex_automata` behind one [`RegexEngine`].

use core::ops::Range;
use std::sync::OnceLock;

use regex_automata::{
    Input,
    dfa::{Automaton, dense},
    util::syntax,
};

use crate::{
    engine::{
        EngineCompileError,
        ExecFailure,
        INFO_GROUP_OVERFLOW,
        InfoError,
        JitUnsupported,
        RegexEngine,
        RegexPattern,
    },
    names::NameTable,
    options::CompileOptions,
};

/// Failure code: the backtracking matcher hit its step limit.
pub const EXEC_BACKTRACK_LIMIT: i32 = -47;

/// Failure code: the backtracking matcher ran out of stack.
pub const EXEC_STACK_OVERFLOW: i32 = -48;

/// Failure code: any other engine failure.
pub const EXEC_INTERNAL: i32 = -2;

/// Default cap on the size of a JIT-built DFA.
pub const DEFAULT_DFA_SIZE_LIMIT: usize = 2 * (1 << 20);

/// Default backtrack limit for `fancy_regex` patterns.
pub const DEFAULT_BACKTRACK_LIMIT: usize = 1_000_000;

/// Wrapper for compiled regex.
#[derive(Debug, Clone)]
enum RegexWrapper {
    /// Wrapper for `regex::Regex`.
    Basic(regex::Regex),

    /// Wrapper for `fancy_regex::Regex`.
    Fancy(fancy_regex::Regex),
}

impl RegexWrapper {
    fn captures_len(&self) -> usize {
        match self {
            Self::Basic(regex) => regex.captures_len(),
            Self::Fancy(regex) => regex.captures_len(),
        }
    }

    fn capture_names(&self) -> Vec<Option<&str>> {
        match self {
            Self::Basic(regex) => regex.capture_names().collect(),
            Self::Fancy(regex) => regex.capture_names().collect(),
        }
    }

    fn is_match(
        &self,
        input: &str,
    ) -> Result<bool, ExecFailure> {
        match self {
            Self::Basic(regex) => Ok(regex.is_match(input)),
            Self::Fancy(regex) => regex.is_match(input).map_err(exec_failure),
        }
    }

    fn captures_into(
        &self,
        input: &str,
        slots: &mut [Option<Range<usize>>],
    ) -> Result<Option<usize>, ExecFailure> {
        match self {
            Self::Basic(regex) => {
                let mut locs = regex.capture_locations();
                if regex.captures_read(&mut locs, input).is_none() {
                    return Ok(None);
                }
                let n = slots.len().min(locs.len());
                for (i, slot) in slots.iter_mut().take(n).enumerate() {
                    *slot = locs.get(i).map(|(start, end)| start..end);
                }
                Ok(Some(n))
            }
            Self::Fancy(regex) => {
                let Some(caps) = regex.captures(input).map_err(exec_failure)? else {
                    return Ok(None);
                };
                let n = slots.len().min(caps.len());
                for (i, slot) in slots.iter_mut().take(n).enumerate() {
                    *slot = caps.get(i).map(|m| m.start()..m.end());
                }
                Ok(Some(n))
            }
        }
    }
}

fn exec_failure(err: fancy_regex::Error) -> ExecFailure {
    let code = match &err {
        fancy_regex::Error::RuntimeError(fancy_regex::RuntimeError::BacktrackLimitExceeded) => {
            EXEC_BACKTRACK_LIMIT
        }
        fancy_regex::Error::RuntimeError(fancy_regex::RuntimeError::StackOverflow) => {
            EXEC_STACK_OVERFLOW
        }
        _ => EXEC_INTERNAL,
    };
    ExecFailure {
        code,
        message: err.to_string(),
    }
}

/// The compiled form produced by [`StandardEngine`].
#[derive(Debug)]
pub struct StandardCode {
    regex: RegexWrapper,
    options: CompileOptions,
    jit: OnceLock<dense::DFA<Vec<u32>>>,
}

impl StandardCode {
    /// Is this a `fancy_regex` (backtracking) pattern?
    pub fn is_fancy(&self) -> bool {
        matches!(self.regex, RegexWrapper::Fancy(_))
    }

    /// Has this been JIT-optimized?
    pub fn is_jit(&self) -> bool {
        self.jit.get().is_some()
    }
}

/// The default engine.
///
/// * [`RegexPattern::Basic`] patterns compile with [`regex`].
/// * [`RegexPattern::Fancy`] patterns compile with [`fancy_regex`].
/// * [`RegexPattern::Adaptive`] patterns try [`regex`] first.
///
/// JIT optimization builds a [`regex_automata`] dense DFA for basic patterns;
/// the DFA then serves capture-less searches.
#[derive(Debug, Clone)]
pub struct StandardEngine {
    jit: bool,
    dfa_size_limit: usize,
    backtrack_limit: usize,
}

impl Default for StandardEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardEngine {
    /// Create a JIT-capable engine with default limits.
    pub fn new() -> Self {
        Self {
            jit: true,
            dfa_size_limit: DEFAULT_DFA_SIZE_LIMIT,
            backtrack_limit: DEFAULT_BACKTRACK_LIMIT,
        }
    }

    /// Create an engine which reports no JIT capability.
    pub fn without_jit() -> Self {
        Self {
            jit: false,
            ..Self::new()
        }
    }

    /// Set the DFA size limit used by JIT optimization.
    pub fn with_dfa_size_limit(
        self,
        dfa_size_limit: usize,
    ) -> Self {
        Self {
            dfa_size_limit,
            ..self
        }
    }

    /// Set the backtrack limit for `fancy_regex` patterns.
    pub fn with_backtrack_limit(
        self,
        backtrack_limit: usize,
    ) -> Self {
        Self {
            backtrack_limit,
            ..self
        }
    }

    fn compile_basic(
        &self,
        pattern: &str,
        options: CompileOptions,
    ) -> Result<RegexWrapper, EngineCompileError> {
        regex::RegexBuilder::new(pattern)
            .case_insensitive(options.contains(CompileOptions::CASELESS))
            .multi_line(options.contains(CompileOptions::MULTILINE))
            .dot_matches_new_line(options.contains(CompileOptions::DOTALL))
            .ignore_whitespace(options.contains(CompileOptions::EXTENDED))
            .swap_greed(options.contains(CompileOptions::UNGREEDY))
            .build()
            .map(RegexWrapper::Basic)
            .map_err(|err| basic_compile_error(pattern, options, err))
    }

    fn compile_fancy(
        &self,
        pattern: &str,
        options: CompileOptions,
    ) -> Result<RegexWrapper, EngineCompileError> {
        let prefix = options.inline_flags();
        let full = format!("{prefix}{pattern}");

        fancy_regex::RegexBuilder::new(&full)
            .backtrack_limit(self.backtrack_limit)
            .build()
            .map(RegexWrapper::Fancy)
            .map_err(|err| match err {
                fancy_regex::Error::ParseError(pos, kind) => EngineCompileError {
                    message: kind.to_string(),
                    offset: pos.saturating_sub(prefix.len()).min(pattern.len()),
                },
                other => EngineCompileError {
                    message: other.to_string(),
                    offset: pattern.len(),
                },
            })
    }
}

/// Recover a located error message for a pattern `regex` refused.
fn basic_compile_error(
    pattern: &str,
    options: CompileOptions,
    err: regex::Error,
) -> EngineCompileError {
    let parsed = regex_syntax::ParserBuilder::new()
        .case_insensitive(options.contains(CompileOptions::CASELESS))
        .multi_line(options.contains(CompileOptions::MULTILINE))
        .dot_matches_new_line(options.contains(CompileOptions::DOTALL))
        .ignore_whitespace(options.contains(CompileOptions::EXTENDED))
        .swap_greed(options.contains(CompileOptions::UNGREEDY))
        .build()
        .parse(pattern);

    match parsed {
        Err(regex_syntax::Error::Parse(e)) => EngineCompileError {
            message: e.kind().to_string(),
            offset: e.span().start.offset,
        },
        Err(regex_syntax::Error::Translate(e)) => EngineCompileError {
            message: e.kind().to_string(),
            offset: e.span().start.offset,
        },
        // Size limits and the like; the failure is not located.
        _ => EngineCompileError {
            message: match err {
                regex::Error::CompiledTooBig(limit) => {
                    format!("compiled regex exceeds size limit of {limit} bytes")
                }
                other => other.to_string(),
            },
            offset: pattern.len(),
        },
    }
}

impl RegexEngine for StandardEngine {
    type Code = StandardCode;

    fn compile(
        &self,
        pattern: &RegexPattern,
        options: CompileOptions,
    ) -> Result<StandardCode, EngineCompileError> {
        let regex = match pattern {
            RegexPattern::Basic(p) => self.compile_basic(p, options)?,
            RegexPattern::Fancy(p) => self.compile_fancy(p, options)?,
            RegexPattern::Adaptive(p) => match self.compile_basic(p, options) {
                Ok(regex) => regex,
                Err(_) => self.compile_fancy(p, options)?,
            },
        };

        Ok(StandardCode {
            regex,
            options,
            jit: OnceLock::new(),
        })
    }

    fn capture_count(
        &self,
        code: &StandardCode,
    ) -> Result<usize, InfoError> {
        Ok(code.regex.captures_len().saturating_sub(1))
    }

    fn name_count(
        &self,
        code: &StandardCode,
    ) -> Result<usize, InfoError> {
        Ok(code.regex.capture_names().into_iter().flatten().count())
    }

    fn name_entry_size(
        &self,
        code: &StandardCode,
    ) -> Result<usize, InfoError> {
        Ok(NameTable::entry_size_for(
            code.regex.capture_names().into_iter().flatten(),
        ))
    }

    fn name_table(
        &self,
        code: &StandardCode,
    ) -> Result<Vec<u8>, InfoError> {
        build_name_table(code)
            .map(|table| table.as_bytes().to_vec())
            .ok_or(InfoError(INFO_GROUP_OVERFLOW))
    }

    fn exec(
        &self,
        code: &StandardCode,
        input: &str,
        slots: &mut [Option<Range<usize>>],
    ) -> Result<Option<usize>, ExecFailure> {
        if !slots.is_empty() {
            return code.regex.captures_into(input, slots);
        }

        if let Some(dfa) = code.jit.get() {
            match dfa.try_search_fwd(&Input::new(input).earliest(true)) {
                Ok(found) => return Ok(found.map(|_| 0)),
                Err(err) => log::trace!("DFA search gave up ({err}); using the regex path"),
            }
        }

        Ok(code.regex.is_match(input)?.then_some(0))
    }

    fn jit_available(&self) -> bool {
        self.jit
    }

    fn jit_compile(
        &self,
        code: &StandardCode,
    ) -> Result<(), JitUnsupported> {
        if !self.jit {
            return Err(JitUnsupported {
                reason: "engine built without JIT".to_string(),
            });
        }
        if code.is_jit() {
            return Ok(());
        }

        let RegexWrapper::Basic(regex) = &code.regex else {
            return Err(JitUnsupported {
                reason: "pattern requires a backtracking matcher".to_string(),
            });
        };

        let options = code.options;
        let dfa = dense::Builder::new()
            .configure(
                dense::DFA::config()
                    .dfa_size_limit(Some(self.dfa_size_limit))
                    .unicode_word_boundary(true),
            )
            .syntax(
                syntax::Config::new()
                    .case_insensitive(options.contains(CompileOptions::CASELESS))
                    .multi_line(options.contains(CompileOptions::MULTILINE))
                    .dot_matches_new_line(options.contains(CompileOptions::DOTALL))
                    .ignore_whitespace(options.contains(CompileOptions::EXTENDED))
                    .swap_greed(options.contains(CompileOptions::UNGREEDY)),
            )
            .build(regex.as_str())
            .map_err(|err| JitUnsupported {
                reason: err.to_string(),
            })?;

        // A racing optimizer may have won; either DFA is equivalent.
        let _ = code.jit.set(dfa);
        Ok(())
    }
}

fn build_name_table(code: &StandardCode) -> Option<NameTable> {
    NameTable::build(
        code.regex
            .capture_names()
            .into_iter()
            .enumerate()
            .filter_map(|(group, name)| name.map(|name| (name, group))),
    )
}
