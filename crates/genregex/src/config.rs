//! # Regex Module Configuration

use serde::Deserialize;

use crate::{
    engine::RegexEngine,
    errors::{RegexError, RxResult},
};

/// Name of the JIT directive.
pub const PCRE_JIT_DIRECTIVE: &str = "pcre_jit";

/// Configuration for the regex module.
///
/// ## Style Hints
///
/// Instance names should prefer `regex_config`,
/// or `config` when there is no ambiguity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct RegexConfig {
    /// JIT-optimize compiled patterns; unset until configured.
    #[serde(default)]
    pcre_jit: Option<bool>,
}

impl RegexConfig {
    /// Set the JIT flag.
    pub fn with_jit(
        self,
        enabled: bool,
    ) -> Self {
        Self {
            pcre_jit: Some(enabled),
        }
    }

    /// Apply one `name value` directive.
    ///
    /// ## Errors
    /// * [`RegexError::UnknownDirective`] for any name other than `pcre_jit`.
    /// * [`RegexError::InvalidFlag`] for a value other than `on` / `off`.
    /// * [`RegexError::DuplicateDirective`] if the flag is already set.
    pub fn apply_directive(
        &mut self,
        name: &str,
        value: &str,
    ) -> RxResult<()> {
        if name != PCRE_JIT_DIRECTIVE {
            return Err(RegexError::UnknownDirective {
                directive: name.to_string(),
            });
        }
        if self.pcre_jit.is_some() {
            return Err(RegexError::DuplicateDirective {
                directive: name.to_string(),
            });
        }
        self.pcre_jit = Some(parse_flag(name, value)?);
        Ok(())
    }

    /// Check the flag against the engine's capability.
    ///
    /// JIT requested from an engine without JIT is switched off, with a
    /// warning; this is never an error.
    pub fn validate<E: RegexEngine>(
        &mut self,
        engine: &E,
    ) {
        if self.pcre_jit == Some(true) && !engine.jit_available() {
            log::warn!("regex engine does not support JIT; \"{PCRE_JIT_DIRECTIVE}\" ignored");
            self.pcre_jit = Some(false);
        }
    }

    /// Settle defaults for anything left unset.
    pub fn init(&mut self) {
        self.pcre_jit.get_or_insert(false);
    }

    /// Is the JIT pass enabled?
    pub fn jit_enabled(&self) -> bool {
        self.pcre_jit.unwrap_or(false)
    }
}

fn parse_flag(
    directive: &str,
    value: &str,
) -> RxResult<bool> {
    if value.eq_ignore_ascii_case("on") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("off") {
        Ok(false)
    } else {
        Err(RegexError::InvalidFlag {
            directive: directive.to_string(),
            value: value.to_string(),
        })
    }
}
