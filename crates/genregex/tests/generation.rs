#![allow(missing_docs)]

use std::{sync::Arc, thread};

use genregex::{
    CompileOptions,
    CompileRequest,
    GenerationScope,
    RegexCompiler,
    RegexConfig,
    RegexError,
    RegexPattern,
    StandardEngine,
    engine::PatternKind,
    exec::{ArrayOutcome, MatchOutcome, execute, execute_array},
};
use proptest::prelude::*;

#[test]
fn full_generation_lifecycle() {
    let engine = Arc::new(StandardEngine::new());

    let mut config = RegexConfig::default();
    config.apply_directive("pcre_jit", "on").unwrap();
    config.validate(&*engine);
    config.init();
    assert!(config.jit_enabled());

    let scope = GenerationScope::new(1);
    let mut compiler = RegexCompiler::new(engine.clone());

    let location = compiler
        .compile(&mut CompileRequest::new(
            r"^/download/(?P<name>[^/]+)\.(?P<ext>zip|tar)$",
        ))
        .unwrap();
    let deny = vec![
        compiler
            .compile(&mut CompileRequest::new(r"\.ht(access|passwd)$"))
            .unwrap(),
        compiler
            .compile(
                &mut CompileRequest::new(RegexPattern::new(PatternKind::Fancy, r"^/(?!public)"))
                    .with_options(CompileOptions::CASELESS),
            )
            .unwrap(),
    ];
    assert_eq!(compiler.registry().map(|r| r.len()), Some(3));

    compiler.finish(&config, &scope);
    assert!(compiler.registry().is_none());
    assert!(location.code().is_jit());
    assert!(deny[0].code().is_jit());
    assert!(!deny[1].code().is_jit());

    let mut caps = location.capture_buffer();
    let uri = "/download/report.zip";
    assert_eq!(
        execute(&location, uri, Some(&mut caps)),
        Ok(MatchOutcome::Matched)
    );
    let name = location.capture_index("name").unwrap();
    let ext = location.capture_index("ext").unwrap();
    assert_eq!(caps.text(uri, name), Some("report"));
    assert_eq!(caps.text(uri, ext), Some("zip"));

    assert_eq!(
        execute_array(&deny, "/site/.htaccess"),
        Ok(ArrayOutcome::Matched(0))
    );
    assert_eq!(
        execute_array(&deny, "/PRIVATE/x"),
        Ok(ArrayOutcome::Matched(1))
    );
    assert_eq!(
        execute_array(&deny, "/Public/index.html"),
        Ok(ArrayOutcome::Declined)
    );

    // Workers share compiled patterns read-only.
    let deny = Arc::new(deny);
    let workers: Vec<_> = (0..4)
        .map(|i| {
            let deny = deny.clone();
            thread::spawn(move || {
                let uri = format!("/private/{i}");
                execute_array(&deny, &uri)
            })
        })
        .collect();
    for worker in workers {
        assert_eq!(worker.join().unwrap(), Ok(ArrayOutcome::Matched(1)));
    }

    scope.teardown();
    scope.teardown();
}

#[test]
fn jit_unavailable_downgrades() {
    let engine = Arc::new(StandardEngine::without_jit());
    let mut config = RegexConfig::default().with_jit(true);
    config.validate(&*engine);
    assert!(!config.jit_enabled());

    let scope = GenerationScope::new(2);
    let mut compiler = RegexCompiler::new(engine);
    let regex = compiler.compile(&mut CompileRequest::new("abc")).unwrap();
    compiler.finish(&config, &scope);

    assert!(!regex.code().is_jit());
    assert_eq!(execute(&regex, "xabcx", None), Ok(MatchOutcome::Matched));
}

#[test]
fn invalid_pattern_aborts_load() {
    let mut compiler = RegexCompiler::new(Arc::new(StandardEngine::new()));
    let mut rc = CompileRequest::new("^/(api|v1");

    let err = compiler.compile(&mut rc).unwrap_err();
    assert!(err.is_fatal_to_load());
    assert!(matches!(err, RegexError::Compile { .. }));
    assert!(rc.err.as_str().contains("^/(api|v1"), "{}", rc.err.as_str());
}

#[test]
fn compile_error_reports_suffix() {
    let mut compiler = RegexCompiler::new(Arc::new(StandardEngine::new()));
    let mut rc = CompileRequest::new(RegexPattern::new(PatternKind::Basic, "/a[z-a]b"));

    let err = compiler.compile(&mut rc).unwrap_err();
    match err {
        RegexError::Compile { pattern, at, .. } => {
            assert_eq!(pattern, "/a[z-a]b");
            assert_eq!(at.as_deref(), Some("z-a]b"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

proptest! {
    #[test]
    fn capture_count_matches_groups(groups in 0usize..12, named in 0usize..6) {
        let mut pattern = String::from("^");
        for i in 0..groups {
            pattern.push_str(&format!("(x{i})?"));
        }
        for i in 0..named {
            pattern.push_str(&format!("(?P<n{i}>y)?"));
        }
        pattern.push_str("(?:z)?$");

        let mut compiler = RegexCompiler::new(Arc::new(StandardEngine::new()));
        let regex = compiler.compile(&mut CompileRequest::new(pattern)).unwrap();

        prop_assert_eq!(regex.captures(), groups + named);
        prop_assert_eq!(regex.named_captures(), named);
        prop_assert_eq!(regex.names().is_some(), named > 0);
        for i in 0..named {
            prop_assert_eq!(regex.capture_index(&format!("n{i}")), Some(groups + i + 1));
        }
    }

    #[test]
    fn invalid_patterns_name_themselves(prefix in "[a-z]{0,8}") {
        let pattern = format!("{prefix}(");
        let mut compiler = RegexCompiler::new(Arc::new(StandardEngine::new()));
        let err = compiler.compile(&mut CompileRequest::new(pattern.as_str())).unwrap_err();
        prop_assert!(err.to_string().contains(&pattern));
    }
}
