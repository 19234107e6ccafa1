//! # `genregex` Configuration Regex Suite
//!
//! Regular expressions for long-running servers which load them from
//! configuration, one generation at a time.
//!
//! The lifecycle of a configuration generation:
//! * [`compiler::RegexCompiler::compile`] compiles each configured pattern,
//!   capturing its group metadata, and registers it.
//! * [`compiler::RegexCompiler::finish`] hands the registry to the
//!   [`optimizer::optimize_all`] JIT pass, once, when loading is done.
//! * [`exec::execute`] and [`exec::execute_array`] match during steady state.
//! * [`scope::GenerationScope::teardown`] releases every compiled pattern
//!   when the generation is retired.
//!
//! The matching itself is delegated to a [`engine::RegexEngine`];
//! [`engine::StandardEngine`] is the default.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use genregex::{
//!     CompileRequest, GenerationScope, RegexCompiler, RegexConfig, StandardEngine,
//!     exec::{ArrayOutcome, execute_array},
//! };
//!
//! let engine = Arc::new(StandardEngine::new());
//! let mut config = RegexConfig::default().with_jit(true);
//! config.validate(&*engine);
//! config.init();
//!
//! let scope = GenerationScope::new(1);
//! let mut compiler = RegexCompiler::new(engine);
//! let deny = vec![
//!     compiler.compile(&mut CompileRequest::new(r"\.php$"))?,
//!     compiler.compile(&mut CompileRequest::new(r"^/admin"))?,
//! ];
//! compiler.finish(&config, &scope);
//!
//! assert_eq!(execute_array(&deny, "/admin/")?, ArrayOutcome::Matched(1));
//! ```
//!
//! ## Crate Features
//!
//! #### feature: ``testing``
//!
//! Exposes `engine::testing`, a scripted engine for tests.
#![warn(missing_docs, unused)]

pub mod compiler;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod names;
pub mod optimizer;
pub mod options;
pub mod pattern;
pub mod registry;
pub mod scope;

#[doc(inline)]
pub use compiler::RegexCompiler;
#[doc(inline)]
pub use config::RegexConfig;
#[doc(inline)]
pub use engine::{RegexEngine, RegexPattern, StandardEngine};
#[doc(inline)]
pub use errors::{RegexError, RxResult};
#[doc(inline)]
pub use options::CompileOptions;
#[doc(inline)]
pub use pattern::{Captures, CompileRequest, CompiledPattern};
#[doc(inline)]
pub use scope::GenerationScope;
