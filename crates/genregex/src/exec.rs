//! # Pattern Execution
//!
//! Matching is safe from any number of workers at once; each call brings
//! its own capture buffer.

use std::sync::Arc;

use crate::{
    engine::RegexEngine,
    errors::{RegexError, RxResult},
    pattern::{Captures, CompiledPattern},
};

/// The result of a single match attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The pattern matched; captures, if requested, are in the buffer.
    Matched,

    /// The pattern did not match.
    NotMatched,
}

impl MatchOutcome {
    /// Is this [`MatchOutcome::Matched`]?
    pub fn is_match(self) -> bool {
        matches!(self, Self::Matched)
    }
}

/// The result of matching a list of patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayOutcome {
    /// The pattern at this index matched; later patterns were not tried.
    Matched(usize),

    /// No pattern matched; the caller should apply its default.
    Declined,
}

/// Match one compiled pattern against `input`.
///
/// ## Arguments
/// * `regex` - the compiled pattern.
/// * `input` - the haystack.
/// * `captures` - optional slots for group offsets.
///
/// ## Errors
/// [`RegexError::Execution`] when the engine fails; the failure is also
/// logged at error level.
pub fn execute<E: RegexEngine>(
    regex: &CompiledPattern<E>,
    input: &str,
    captures: Option<&mut Captures>,
) -> RxResult<MatchOutcome> {
    let engine = regex.engine();
    let result = match captures {
        None => engine.exec(regex.code(), input, &mut []),
        Some(captures) => {
            let result = engine.exec(regex.code(), input, captures.prepare());
            if let Ok(Some(n)) = result {
                captures.set_len(n);
            }
            result
        }
    };

    match result {
        Ok(Some(_)) => Ok(MatchOutcome::Matched),
        Ok(None) => Ok(MatchOutcome::NotMatched),
        Err(failure) => {
            log::error!(
                "regex match failed: {} on \"{}\" using \"{}\": {}",
                failure.code,
                input,
                regex.source(),
                failure.message
            );
            Err(RegexError::Execution {
                code: failure.code,
                message: failure.message,
                input: input.to_string(),
                pattern: regex.source().to_string(),
            })
        }
    }
}

/// Match a list of patterns against `input`, in order, without captures.
///
/// Stops at the first match or the first engine failure; a failure is
/// never masked by a later match.
///
/// ## Returns
/// * `Ok(ArrayOutcome::Matched(i))` - pattern `i` matched.
/// * `Ok(ArrayOutcome::Declined)` - nothing matched.
pub fn execute_array<E: RegexEngine>(
    patterns: &[Arc<CompiledPattern<E>>],
    input: &str,
) -> RxResult<ArrayOutcome> {
    for (idx, regex) in patterns.iter().enumerate() {
        if execute(regex, input, None)?.is_match() {
            return Ok(ArrayOutcome::Matched(idx));
        }
    }
    Ok(ArrayOutcome::Declined)
}
