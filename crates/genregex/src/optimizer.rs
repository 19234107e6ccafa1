//! # Batch Optimizer

use std::sync::Arc;

use crate::{engine::RegexEngine, registry::PatternRegistry, scope::GenerationScope};

/// Run the one-time JIT pass over a generation's registry.
///
/// The registry is consumed. Its entries are handed to `scope` before the
/// pass starts, and released when the scope is torn down.
///
/// A pattern the engine will not optimize is logged and left on the
/// unoptimized path. With `jit_enabled` false, or an engine without JIT,
/// no pattern is touched.
pub fn optimize_all<E: RegexEngine>(
    engine: &Arc<E>,
    registry: PatternRegistry<E>,
    jit_enabled: bool,
    scope: &GenerationScope,
) {
    let entries = Arc::new(registry.into_entries());

    let held = entries.clone();
    let generation = scope.generation();
    scope.add_cleanup(move || {
        log::debug!(
            "releasing {} compiled patterns of generation {generation}",
            held.len()
        );
        drop(held);
    });

    if !(jit_enabled && engine.jit_available()) {
        return;
    }

    log::debug!("JIT-optimizing {} patterns", entries.len());
    let mut optimized = 0;
    for entry in entries.iter() {
        match engine.jit_compile(entry.regex.code()) {
            Ok(()) => optimized += 1,
            Err(err) => log::info!(
                "JIT compiler does not support pattern: \"{}\" ({})",
                entry.name,
                err.reason
            ),
        }
    }
    log::debug!("JIT-optimized {optimized} of {} patterns", entries.len());
}
