//! Shared harness: run script text through the full pipeline and hand
//! back the result, the captured output and any warnings.

use kairos::error::LexicalWarning;
use kairos::{Error, SourceReader, Value};

pub struct Outcome {
    pub result: Option<Value>,
    pub output: String,
    pub warnings: Vec<LexicalWarning>,
}

pub fn run(source: &str) -> Outcome {
    let mut out = Vec::new();
    let (result, warnings) = kairos::run(SourceReader::from_source(source), &mut out)
        .unwrap_or_else(|e| panic!("program failed: {e}\nsource: {source}"));
    Outcome {
        result,
        output: String::from_utf8(out).expect("output is utf-8"),
        warnings,
    }
}

pub fn output_lines(source: &str) -> Vec<String> {
    run(source).output.lines().map(str::to_string).collect()
}

pub fn result_of(source: &str) -> Option<Value> {
    run(source).result
}

pub fn failure_of(source: &str) -> Error {
    let mut out = Vec::new();
    match kairos::run(SourceReader::from_source(source), &mut out) {
        Err(error) => error,
        Ok(_) => panic!("program should fail: {source}"),
    }
}
