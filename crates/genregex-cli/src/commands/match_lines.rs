use std::{
    io::{BufRead, Write},
    sync::Arc,
};

use genregex::{
    CompiledPattern,
    StandardEngine,
    exec::{ArrayOutcome, execute, execute_array},
};

use crate::{
    input_output::{InputArgs, OutputArgs},
    pattern_file::PatternFileArgs,
};

/// Args for the match command.
#[derive(clap::Args, Debug)]
pub struct MatchArgs {
    #[command(flatten)]
    patterns: PatternFileArgs,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    output: OutputArgs,

    /// Also print the capture groups of the matching pattern.
    #[clap(long)]
    captures: bool,
}

impl MatchArgs {
    /// Run the match command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let generation = self.patterns.load()?;

        let mut reader = self.input.open_reader()?;
        let mut writer = self.output.open_writer()?;

        run_match(
            &mut reader,
            &mut writer,
            &generation.patterns,
            self.captures,
        )?;

        generation.scope.teardown();
        Ok(())
    }
}

fn run_match(
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
    patterns: &[Arc<CompiledPattern<StandardEngine>>],
    captures: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut line = String::new();
    while reader.read_line(&mut line)? > 0 {
        let subject = line.trim_end_matches(['\r', '\n']);

        match execute_array(patterns, subject) {
            Ok(ArrayOutcome::Matched(idx)) => {
                write!(writer, "{idx}")?;
                if captures {
                    write_captures(writer, &patterns[idx], subject)?;
                }
                writeln!(writer)?;
            }
            Ok(ArrayOutcome::Declined) => writeln!(writer, "declined")?,
            Err(err) => writeln!(writer, "error: {err}")?,
        }
        writer.flush()?;

        line.clear();
    }
    Ok(())
}

fn write_captures(
    writer: &mut dyn Write,
    regex: &CompiledPattern<StandardEngine>,
    subject: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut caps = regex.capture_buffer();
    match execute(regex, subject, Some(&mut caps)) {
        Ok(outcome) if outcome.is_match() => {}
        Ok(_) => return Ok(()),
        Err(err) => {
            write!(writer, "\terror: {err}")?;
            return Ok(());
        }
    }
    let names = regex.capture_names();
    for i in 0..caps.len() {
        match names.get(i).copied().flatten() {
            Some(name) => write!(writer, "\t{name}=")?,
            None => write!(writer, "\t${i}=")?,
        }
        match caps.text(subject, i) {
            Some(text) => write!(writer, "{text:?}")?,
            None => write!(writer, "-")?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use genregex::{
        CompileOptions,
        CompileRequest,
        RegexCompiler,
        RegexPattern,
        engine::PatternKind,
    };

    use super::*;
    use crate::pattern_file::{PatternFile, load_generation};

    fn run(
        config: &str,
        input: &str,
        captures: bool,
    ) -> String {
        let file: PatternFile = serde_json::from_str(config).unwrap();
        let generation = load_generation(&file, None, 1).unwrap();

        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        run_match(&mut reader, &mut out, &generation.patterns, captures).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_first_match_wins() {
        let config = r#"{
            "pcre_jit": true,
            "patterns": [
                {"pattern": "\\.php$"},
                {"pattern": "^/admin", "caseless": true},
                {"pattern": "php"}
            ]
        }"#;
        assert_eq!(
            run(config, "/index.php\n/ADMIN/x\n/static/a.css\n/phpinfo\n", false),
            "0\n1\ndeclined\n2\n"
        );
    }

    #[test]
    fn test_captures() {
        let config = r#"{"patterns": [{"pattern": "^/(\\w+)(/(\\d+))?$"}]}"#;
        assert_eq!(
            run(config, "/user/42\n/user\n", true),
            "0\t$0=\"/user/42\"\t$1=\"user\"\t$2=\"/42\"\t$3=\"42\"\n\
             0\t$0=\"/user\"\t$1=\"user\"\t$2=-\t$3=-\n"
        );
    }

    fn runaway() -> Arc<CompiledPattern<StandardEngine>> {
        let engine = Arc::new(StandardEngine::new().with_backtrack_limit(100_000));
        let mut compiler = RegexCompiler::new(engine);
        compiler
            .compile(
                &mut CompileRequest::new(RegexPattern::new(PatternKind::Fancy, "(a|b|ab)*(?=c)"))
                    .with_options(CompileOptions::CASELESS),
            )
            .unwrap()
    }

    #[test]
    fn test_capture_failure_is_reported() {
        let regex = runaway();
        let subject = "ab".repeat(38);

        let mut out = Vec::new();
        write_captures(&mut out, &regex, &subject).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("\terror: regex match failed: -47"), "{out}");
    }

    #[test]
    fn test_match_failure_is_per_line() {
        let patterns = vec![runaway()];
        let input = format!("{}\nc\n", "ab".repeat(38));

        let mut reader = Cursor::new(input.into_bytes());
        let mut out = Vec::new();
        run_match(&mut reader, &mut out, &patterns, true).unwrap();

        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2, "{out}");
        assert!(lines[0].starts_with("error: regex match failed: -47"), "{out}");
        assert_eq!(lines[1], "0\t$0=\"\"\t$1=-");
    }

    #[test]
    fn test_named_captures() {
        let config = r#"{"patterns": [{"pattern": "^/(?P<user>\\w+)/(\\d+)$"}]}"#;
        assert_eq!(
            run(config, "/ann/7\n/ann\n", true),
            "0\t$0=\"/ann/7\"\tuser=\"ann\"\t$2=\"7\"\ndeclined\n"
        );
    }
}
