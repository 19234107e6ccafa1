//! JSON pattern configuration, and loading it as one generation.

use std::{fs::File, io::BufReader, path::Path, sync::Arc};

use genregex::{
    CompileOptions,
    CompileRequest,
    CompiledPattern,
    GenerationScope,
    RegexCompiler,
    RegexConfig,
    RegexPattern,
    StandardEngine,
    engine::PatternKind,
};
use serde::Deserialize;

/// One configured pattern.
#[derive(Debug, Clone, Deserialize)]
pub struct PatternEntry {
    /// The pattern text.
    pub pattern: String,

    /// The dialect.
    #[serde(default)]
    pub kind: PatternKind,

    #[serde(default)]
    pub caseless: bool,

    #[serde(default)]
    pub multiline: bool,

    #[serde(default)]
    pub dotall: bool,

    #[serde(default)]
    pub extended: bool,

    #[serde(default)]
    pub ungreedy: bool,
}

impl PatternEntry {
    /// The compile options this entry asks for.
    pub fn options(&self) -> CompileOptions {
        let mut options = CompileOptions::empty();
        options.set(CompileOptions::CASELESS, self.caseless);
        options.set(CompileOptions::MULTILINE, self.multiline);
        options.set(CompileOptions::DOTALL, self.dotall);
        options.set(CompileOptions::EXTENDED, self.extended);
        options.set(CompileOptions::UNGREEDY, self.ungreedy);
        options
    }

    /// Build the compile request.
    pub fn request(&self) -> CompileRequest {
        CompileRequest::new(RegexPattern::new(self.kind, self.pattern.as_str()))
            .with_options(self.options())
    }
}

/// The whole configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct PatternFile {
    #[serde(flatten)]
    pub regex: RegexConfig,

    #[serde(default)]
    pub patterns: Vec<PatternEntry>,
}

impl PatternFile {
    /// Read a configuration file.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Pattern configuration arg group.
#[derive(clap::Args, Debug)]
pub struct PatternFileArgs {
    /// JSON pattern configuration file.
    #[clap(long)]
    pub config: String,

    /// Override the `pcre_jit` directive; `on` or `off`.
    #[clap(long, default_value = None)]
    pub pcre_jit: Option<String>,
}

impl PatternFileArgs {
    /// Read the configuration and load it as generation 1.
    pub fn load(&self) -> Result<Generation, Box<dyn std::error::Error>> {
        let file = PatternFile::read(&self.config)?;
        load_generation(&file, self.pcre_jit.as_deref(), 1)
    }
}

/// A loaded generation: its patterns, and the scope that owns them.
pub struct Generation {
    pub patterns: Vec<Arc<CompiledPattern<StandardEngine>>>,
    pub scope: GenerationScope,
}

/// Compile every pattern of `file` as generation `number`, then run the JIT pass.
///
/// ## Arguments
/// * `file` - the parsed configuration.
/// * `jit` - optional `on` / `off` override for the `pcre_jit` directive.
pub fn load_generation(
    file: &PatternFile,
    jit: Option<&str>,
    number: u64,
) -> Result<Generation, Box<dyn std::error::Error>> {
    let engine = Arc::new(StandardEngine::new());

    let mut config = file.regex;
    if let Some(value) = jit {
        config.apply_directive(genregex::config::PCRE_JIT_DIRECTIVE, value)?;
    }
    config.validate(&*engine);
    config.init();

    let scope = GenerationScope::new(number);
    let mut compiler = RegexCompiler::new(engine);

    let mut patterns = Vec::with_capacity(file.patterns.len());
    for entry in &file.patterns {
        let mut request = entry.request();
        patterns.push(compiler.compile(&mut request)?);
    }

    compiler.finish(&config, &scope);
    log::info!(
        "generation {number}: {} patterns loaded (jit: {})",
        patterns.len(),
        config.jit_enabled()
    );

    Ok(Generation { patterns, scope })
}
