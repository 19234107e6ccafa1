//! # Regex Compiler
//!
//! Compiles configuration patterns for one generation, registering each so
//! the batch optimizer can find it later.

use std::sync::Arc;

use crate::{
    config::RegexConfig,
    engine::{EngineCompileError, InfoError, InfoQuery, RegexEngine},
    errors::{RegexError, RxResult},
    names::NameTable,
    optimizer::optimize_all,
    pattern::{CompileRequest, CompiledPattern},
    registry::PatternRegistry,
    scope::GenerationScope,
};

/// The compile context of one configuration generation.
///
/// ## Style Hints
///
/// Instance names should prefer `compiler`.
pub struct RegexCompiler<E: RegexEngine> {
    engine: Arc<E>,
    registry: Option<PatternRegistry<E>>,
}

impl<E: RegexEngine> core::fmt::Debug for RegexCompiler<E> {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.debug_struct("RegexCompiler")
            .field("registry", &self.registry)
            .finish()
    }
}

impl<E: RegexEngine> RegexCompiler<E> {
    /// Open a compile context with a fresh registry.
    pub fn new(engine: Arc<E>) -> Self {
        Self {
            engine,
            registry: Some(PatternRegistry::new()),
        }
    }

    /// The engine.
    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    /// The registry; `None` once [`finish`](Self::finish) has consumed it.
    pub fn registry(&self) -> Option<&PatternRegistry<E>> {
        self.registry.as_ref()
    }

    /// Compile a pattern.
    ///
    /// On failure the message is also written, truncated, to `request.err`.
    ///
    /// ## Errors
    /// * [`RegexError::EmptyPattern`] for an empty pattern.
    /// * [`RegexError::Compile`] if the engine rejects the pattern.
    /// * [`RegexError::PatternInfo`] if a capture metadata query fails.
    /// * [`RegexError::NoMemory`] if the pattern cannot be registered.
    pub fn compile(
        &mut self,
        request: &mut CompileRequest,
    ) -> RxResult<Arc<CompiledPattern<E>>> {
        let result = self.compile_inner(request);
        if let Err(err) = &result {
            request.err.write(&err.to_string());
        }
        result
    }

    fn compile_inner(
        &mut self,
        request: &CompileRequest,
    ) -> RxResult<Arc<CompiledPattern<E>>> {
        let source = request.pattern.as_str();
        if source.is_empty() {
            return Err(RegexError::EmptyPattern);
        }

        let code = self
            .engine
            .compile(&request.pattern, request.options)
            .map_err(|err| compile_error(source, err))?;

        let info_error = |query: InfoQuery| {
            move |InfoError(code): InfoError| RegexError::PatternInfo {
                query,
                pattern: source.to_string(),
                code,
            }
        };

        let captures = self
            .engine
            .capture_count(&code)
            .map_err(info_error(InfoQuery::CaptureCount))?;

        let mut names = None;
        if captures > 0 {
            let named = self
                .engine
                .name_count(&code)
                .map_err(info_error(InfoQuery::NameCount))?;

            if named > 0 {
                let entry_size = self
                    .engine
                    .name_entry_size(&code)
                    .map_err(info_error(InfoQuery::NameEntrySize))?;
                let table = self
                    .engine
                    .name_table(&code)
                    .map_err(info_error(InfoQuery::NameTable))?;
                names = Some(NameTable::new(entry_size, table));
            }
        }

        let regex = Arc::new(CompiledPattern::new(
            self.engine.clone(),
            code,
            Arc::from(source),
            captures,
            names,
        ));

        if let Some(registry) = self.registry.as_mut() {
            registry.push(regex.clone())?;
        }

        Ok(regex)
    }

    /// Close the load phase: hand the registry to the batch optimizer.
    ///
    /// Patterns compiled afterwards are not registered. Later calls do nothing.
    pub fn finish(
        &mut self,
        config: &RegexConfig,
        scope: &GenerationScope,
    ) {
        match self.registry.take() {
            Some(registry) => {
                optimize_all(&self.engine, registry, config.jit_enabled(), scope);
            }
            None => log::debug!("regex registry already consumed"),
        }
    }
}

fn compile_error(
    pattern: &str,
    err: EngineCompileError,
) -> RegexError {
    let at = if err.offset >= pattern.len() {
        None
    } else {
        let mut start = err.offset;
        while !pattern.is_char_boundary(start) {
            start -= 1;
        }
        Some(pattern[start..].to_string())
    };

    RegexError::Compile {
        message: err.message,
        pattern: pattern.to_string(),
        at,
    }
}
