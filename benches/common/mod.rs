#![allow(dead_code)]
use std::fs;
use std::path::Path;

use nectar::ast::Expr;
use nectar::config::LanguageConfig;
use nectar::parser::Parser;
use test_support::load_cases;

/// Fixture programs with benchmarking enabled, as `(name, source)` pairs.
pub fn workloads() -> Vec<(String, String)> {
    let cases = load_cases(Path::new("tests/programs")).expect("load cases");
    cases
        .into_iter()
        .filter(|case| case.spec.bench.enabled)
        .map(|case| {
            let source = fs::read_to_string(&case.program_path)
                .unwrap_or_else(|err| panic!("read {}: {err}", case.program_path.display()));
            (case.name, source)
        })
        .collect()
}

pub fn parse_program(source: &str) -> Expr {
    let config = LanguageConfig::standard();
    let tokens = config.scanner().tokenize(source).expect("tokenize");
    let mut parser = Parser::new(&config);
    parser.interpret_lines(&tokens).expect("interpret");
    parser.finish().expect("finish")
}
