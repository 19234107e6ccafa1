use std::io::Write;

use genregex::{CompiledPattern, StandardEngine};

use crate::{input_output::OutputArgs, pattern_file::PatternFileArgs};

/// Args for the check command.
#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    patterns: PatternFileArgs,

    #[command(flatten)]
    output: OutputArgs,
}

impl CheckArgs {
    /// Run the check command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let generation = self.patterns.load()?;
        let mut writer = self.output.open_writer()?;

        for (idx, regex) in generation.patterns.iter().enumerate() {
            describe(&mut writer, idx, regex)?;
        }
        writer.flush()?;

        generation.scope.teardown();
        Ok(())
    }
}

fn describe(
    writer: &mut dyn Write,
    idx: usize,
    regex: &CompiledPattern<StandardEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
    write!(
        writer,
        "{idx}\t{:?}\tcaptures={}\tnamed={}\tjit={}",
        regex.source(),
        regex.captures(),
        regex.named_captures(),
        if regex.code().is_jit() { "on" } else { "off" },
    )?;
    if let Some(names) = regex.names() {
        for (name, group) in names.entries() {
            write!(writer, "\t{name}=${group}")?;
        }
    }
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern_file::{PatternFile, load_generation};

    #[test]
    fn test_describe() {
        let file: PatternFile = serde_json::from_str(
            r#"{"pcre_jit": true, "patterns": [{"pattern": "^/(?P<page>[a-z]+)$"}]}"#,
        )
        .unwrap();
        let generation = load_generation(&file, None, 1).unwrap();

        let mut out = Vec::new();
        describe(&mut out, 0, &generation.patterns[0]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "0\t\"^/(?P<page>[a-z]+)$\"\tcaptures=1\tnamed=1\tjit=on\tpage=$1\n"
        );
    }
}
