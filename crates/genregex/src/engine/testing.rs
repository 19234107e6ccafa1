//! # Scripted Test Engine
//!
//! A [`RegexEngine`] whose every answer is scripted per pattern text, and
//! which counts what was asked of it.
//!
//! Unscripted patterns compile with no groups, match by literal substring,
//! and accept JIT optimization.

use core::{
    ops::Range,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};
use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;

use crate::{
    engine::{
        EngineCompileError,
        ExecFailure,
        INFO_GROUP_OVERFLOW,
        InfoError,
        InfoQuery,
        JitUnsupported,
        RegexEngine,
        RegexPattern,
    },
    names::NameTable,
    options::CompileOptions,
};

/// A scripted match outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedOutcome {
    /// Always match, spanning the whole input.
    Match,

    /// Never match.
    NoMatch,

    /// Always fail with this code.
    Error(i32),
}

/// Compiled form for [`ScriptedEngine`].
#[derive(Debug)]
pub struct ScriptedCode {
    pattern: String,
    jit: AtomicBool,
    released: Arc<AtomicUsize>,
}

impl ScriptedCode {
    /// The pattern text.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Has this been JIT-optimized?
    pub fn is_jit(&self) -> bool {
        self.jit.load(Ordering::SeqCst)
    }
}

impl Drop for ScriptedCode {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// A [`RegexEngine`] for tests.
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    no_jit: bool,
    rejects: HashMap<String, EngineCompileError>,
    info_failures: HashMap<String, (InfoQuery, i32)>,
    groups: HashMap<String, Vec<Option<String>>>,
    outcomes: HashMap<String, ScriptedOutcome>,
    jit_refusals: Vec<String>,

    compiled: AtomicUsize,
    jit_calls: AtomicUsize,
    released: Arc<AtomicUsize>,
    exec_calls: Mutex<HashMap<String, usize>>,
}

impl ScriptedEngine {
    /// A JIT-capable engine with nothing scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report no JIT capability.
    pub fn without_jit(self) -> Self {
        Self {
            no_jit: true,
            ..self
        }
    }

    /// Reject `pattern` at compile time, failing at `offset`.
    pub fn reject(
        mut self,
        pattern: &str,
        message: &str,
        offset: usize,
    ) -> Self {
        self.rejects.insert(
            pattern.to_string(),
            EngineCompileError {
                message: message.to_string(),
                offset,
            },
        );
        self
    }

    /// Fail the given metadata query for `pattern`.
    pub fn fail_info(
        mut self,
        pattern: &str,
        query: InfoQuery,
        code: i32,
    ) -> Self {
        self.info_failures
            .insert(pattern.to_string(), (query, code));
        self
    }

    /// Give `pattern` capture groups; `None` entries are unnamed.
    pub fn groups(
        mut self,
        pattern: &str,
        names: &[Option<&str>],
    ) -> Self {
        self.groups.insert(
            pattern.to_string(),
            names.iter().map(|n| n.map(str::to_string)).collect(),
        );
        self
    }

    /// Script the match outcome for `pattern`.
    pub fn outcome(
        mut self,
        pattern: &str,
        outcome: ScriptedOutcome,
    ) -> Self {
        self.outcomes.insert(pattern.to_string(), outcome);
        self
    }

    /// Refuse to JIT-optimize `pattern`.
    pub fn refuse_jit(
        mut self,
        pattern: &str,
    ) -> Self {
        self.jit_refusals.push(pattern.to_string());
        self
    }

    /// Number of successful compiles.
    pub fn compiled(&self) -> usize {
        self.compiled.load(Ordering::SeqCst)
    }

    /// Number of `jit_compile` calls.
    pub fn jit_calls(&self) -> usize {
        self.jit_calls.load(Ordering::SeqCst)
    }

    /// Number of compiled forms released.
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Number of `exec` calls against `pattern`.
    pub fn exec_calls(
        &self,
        pattern: &str,
    ) -> usize {
        self.exec_calls.lock().get(pattern).copied().unwrap_or(0)
    }

    fn check_info(
        &self,
        code: &ScriptedCode,
        query: InfoQuery,
    ) -> Result<(), InfoError> {
        match self.info_failures.get(&code.pattern) {
            Some((q, c)) if *q == query => Err(InfoError(*c)),
            _ => Ok(()),
        }
    }

    fn names_of(
        &self,
        code: &ScriptedCode,
    ) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.groups
            .get(&code.pattern)
            .into_iter()
            .flatten()
            .enumerate()
            .filter_map(|(i, name)| name.as_deref().map(|name| (name, i + 1)))
    }
}

impl RegexEngine for ScriptedEngine {
    type Code = ScriptedCode;

    fn compile(
        &self,
        pattern: &RegexPattern,
        _options: CompileOptions,
    ) -> Result<ScriptedCode, EngineCompileError> {
        if let Some(err) = self.rejects.get(pattern.as_str()) {
            return Err(err.clone());
        }
        self.compiled.fetch_add(1, Ordering::SeqCst);
        Ok(ScriptedCode {
            pattern: pattern.as_str().to_string(),
            jit: AtomicBool::new(false),
            released: self.released.clone(),
        })
    }

    fn capture_count(
        &self,
        code: &ScriptedCode,
    ) -> Result<usize, InfoError> {
        self.check_info(code, InfoQuery::CaptureCount)?;
        Ok(self.groups.get(&code.pattern).map_or(0, Vec::len))
    }

    fn name_count(
        &self,
        code: &ScriptedCode,
    ) -> Result<usize, InfoError> {
        self.check_info(code, InfoQuery::NameCount)?;
        Ok(self.names_of(code).count())
    }

    fn name_entry_size(
        &self,
        code: &ScriptedCode,
    ) -> Result<usize, InfoError> {
        self.check_info(code, InfoQuery::NameEntrySize)?;
        Ok(NameTable::entry_size_for(
            self.names_of(code).map(|(name, _)| name),
        ))
    }

    fn name_table(
        &self,
        code: &ScriptedCode,
    ) -> Result<Vec<u8>, InfoError> {
        self.check_info(code, InfoQuery::NameTable)?;
        NameTable::build(self.names_of(code))
            .map(|table| table.as_bytes().to_vec())
            .ok_or(InfoError(INFO_GROUP_OVERFLOW))
    }

    fn exec(
        &self,
        code: &ScriptedCode,
        input: &str,
        slots: &mut [Option<Range<usize>>],
    ) -> Result<Option<usize>, ExecFailure> {
        *self
            .exec_calls
            .lock()
            .entry(code.pattern.clone())
            .or_default() += 1;

        let span = match self.outcomes.get(&code.pattern) {
            Some(ScriptedOutcome::Error(c)) => {
                return Err(ExecFailure {
                    code: *c,
                    message: "scripted failure".to_string(),
                });
            }
            Some(ScriptedOutcome::NoMatch) => None,
            Some(ScriptedOutcome::Match) => Some(0..input.len()),
            None => input
                .find(&code.pattern)
                .map(|start| start..start + code.pattern.len()),
        };

        Ok(span.map(|span| match slots.first_mut() {
            Some(slot) => {
                *slot = Some(span);
                1
            }
            None => 0,
        }))
    }

    fn jit_available(&self) -> bool {
        !self.no_jit
    }

    fn jit_compile(
        &self,
        code: &ScriptedCode,
    ) -> Result<(), JitUnsupported> {
        self.jit_calls.fetch_add(1, Ordering::SeqCst);
        if self.jit_refusals.contains(&code.pattern) {
            return Err(JitUnsupported {
                reason: "scripted refusal".to_string(),
            });
        }
        code.jit.store(true, Ordering::SeqCst);
        Ok(())
    }
}
