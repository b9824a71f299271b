use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const PAPER: &str = "\\documentclass{article}
\\begin{document}
\\section{Intro}
We define $x_1$.

\\section{Result}
Then $$x_1^2$$ holds.
\\end{document}
";

fn paper_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    fs::write(dir.path().join("paper.tex"), PAPER).expect("paper should be written");
    dir
}

fn write_json(dir: &Path, name: &str, json: &str) {
    fs::write(dir.join(name), json).expect("json fixture should be written");
}

fn run_scriptorium<I, S>(dir: &Path, args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(env!("CARGO_BIN_EXE_scriptorium"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("scriptorium command should execute")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "command failed with status {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn assert_exit_code(output: &Output, code: i32) {
    if output.status.code() != Some(code) {
        panic!(
            "expected exit code {} but got {:?}\nstdout:\n{}\nstderr:\n{}",
            code,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn parse_json_stdout(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|err| {
        panic!(
            "stdout is not JSON ({})\nstdout:\n{}",
            err,
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

fn string_list(value: &Value) -> Vec<&str> {
    value
        .as_array()
        .expect("value should be an array")
        .iter()
        .map(|v| v.as_str().expect("entries should be strings"))
        .collect()
}

#[test]
fn test_flatten_prints_content() {
    let dir = paper_dir();
    fs::write(
        dir.path().join("main.tex"),
        "\\begin{document}\n\\input{part}\n\\end{document}\n",
    )
    .unwrap();
    fs::write(dir.path().join("part.tex"), "\\section{Part} % note\nText.\n").unwrap();

    let output = run_scriptorium(dir.path(), ["flatten", "main.tex"]);
    assert_success(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\\section{Part}"), "stdout:\n{}", stdout);
    assert!(!stdout.contains("\\input"), "stdout:\n{}", stdout);
    assert!(!stdout.contains("note"), "stdout:\n{}", stdout);
}

#[test]
fn test_outline_lists_sections() {
    let dir = paper_dir();
    let output = run_scriptorium(dir.path(), ["outline", "paper.tex"]);
    assert_success(&output);

    let parsed = parse_json_stdout(&output);
    let sections = parsed["document"]["sections"]
        .as_array()
        .expect("sections should be an array");
    let titles: Vec<_> = sections.iter().map(|s| s["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Intro", "Result"]);
    assert_eq!(sections[1]["formulas"][0]["content"], "x_1^2");
}

#[test]
fn test_order_without_deps_keeps_document_order() {
    let dir = paper_dir();
    let output = run_scriptorium(dir.path(), ["order", "paper.tex"]);
    assert_success(&output);
    let order = parse_json_stdout(&output);
    assert_eq!(string_list(&order["ids"]), vec!["sec_0", "sec_1"]);
}

#[test]
fn test_order_applies_deps() {
    let dir = paper_dir();
    write_json(
        dir.path(),
        "deps.json",
        r#"{"dependencies": {"sec_0": ["sec_1"], "sec_1": ["sec_9"]}}"#,
    );

    let output = run_scriptorium(dir.path(), ["order", "paper.tex", "--deps", "deps.json"]);
    assert_success(&output);
    let order = parse_json_stdout(&output);
    assert_eq!(string_list(&order["ids"]), vec!["sec_1", "sec_0"]);
    assert_eq!(order["status"]["kind"], "sorted");
}

#[test]
fn test_validate_clean_rewrites_exit_zero() {
    let dir = paper_dir();
    write_json(
        dir.path(),
        "rewritten.json",
        r#"{"sec_0": "On definit $x_1$.", "sec_1": "Alors $$x_1^2$$ tient."}"#,
    );

    let output = run_scriptorium(dir.path(), ["validate", "paper.tex", "--rewritten", "rewritten.json"]);
    assert_success(&output);
    assert_eq!(parse_json_stdout(&output), Value::Array(Vec::new()));
}

#[test]
fn test_validate_problems_exit_one_and_unknown_ids_are_skipped() {
    let dir = paper_dir();
    write_json(
        dir.path(),
        "rewritten.json",
        r#"{"sec_0": "On definit.", "sec_9": "Nowhere."}"#,
    );

    let output = run_scriptorium(dir.path(), ["validate", "paper.tex", "--rewritten", "rewritten.json"]);
    assert_exit_code(&output, 1);

    let problems = parse_json_stdout(&output);
    let problems = problems.as_array().expect("problems should be an array");
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0]["section_id"], "sec_0");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("sec_9"), "stderr:\n{}", stderr);
}

#[test]
fn test_validate_output_writes_marked_document() {
    let dir = paper_dir();
    write_json(dir.path(), "rewritten.json", r#"{"sec_0": "On definit."}"#);

    let output = run_scriptorium(
        dir.path(),
        ["validate", "paper.tex", "--rewritten", "rewritten.json", "--output", "out.tex"],
    );
    assert_exit_code(&output, 1);

    let written = fs::read_to_string(dir.path().join("out.tex")).expect("output should be written");
    assert!(written.starts_with("\\documentclass{article}\n\\begin{document}\n"), "{}", written);
    assert!(
        written.contains("\\section{Intro}\n\n{\\color{red} On definit.\\footnote{Missing inline formulas: \\$x\\_1\\$}}"),
        "{}",
        written
    );
    assert!(written.contains("\\section{Result}\n\nThen $$x_1^2$$ holds."), "{}", written);
    assert!(written.ends_with("\\end{document}"), "{}", written);
}

#[test]
fn test_config_file_sets_marking() {
    let dir = paper_dir();
    write_json(dir.path(), "rewritten.json", r#"{"sec_0": "On definit."}"#);
    fs::write(
        dir.path().join("plain.toml"),
        "[output]\nmark_problematic = false\n",
    )
    .unwrap();
    fs::write(dir.path().join("scriptorium.toml"), "[output]\nproblem_color = \"blue\"\n").unwrap();

    let output = run_scriptorium(
        dir.path(),
        ["validate", "paper.tex", "--rewritten", "rewritten.json", "--output", "blue.tex"],
    );
    assert_exit_code(&output, 1);
    let written = fs::read_to_string(dir.path().join("blue.tex")).unwrap();
    assert!(written.contains("{\\color{blue} On definit."), "{}", written);

    let output = run_scriptorium(
        dir.path(),
        [
            "--config",
            "plain.toml",
            "validate",
            "paper.tex",
            "--rewritten",
            "rewritten.json",
            "--output",
            "plain.tex",
        ],
    );
    assert_exit_code(&output, 1);
    let written = fs::read_to_string(dir.path().join("plain.tex")).unwrap();
    assert!(!written.contains("\\color"), "{}", written);
    assert!(written.contains("\\section{Intro}\n\nOn definit.\n"), "{}", written);
}

#[test]
fn test_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_scriptorium(dir.path(), ["outline", "absent.tex"]);
    assert!(!output.status.success());
    assert!(!output.stderr.is_empty());
}
