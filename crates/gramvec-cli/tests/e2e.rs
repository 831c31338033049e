use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Value;

struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        static CTR: AtomicUsize = AtomicUsize::new(0);
        let n = CTR.fetch_add(1, Ordering::SeqCst);
        let mut path = std::env::temp_dir();
        path.push(format!("{}_{}_{}", prefix, std::process::id(), n));
        std::fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

fn gramvec() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_gramvec"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run_ok(cwd: &Path, args: &[&str]) -> Output {
    let out = gramvec()
        .current_dir(cwd)
        .args(args)
        .output()
        .expect("run gramvec");
    assert!(
        out.status.success(),
        "expected success\nargs={args:?}\nstatus={}\nstdout={}\nstderr={}",
        out.status,
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr),
    );
    out
}

fn run_err(cwd: &Path, args: &[&str]) -> Output {
    let out = gramvec()
        .current_dir(cwd)
        .args(args)
        .output()
        .expect("run gramvec");
    assert!(
        !out.status.success(),
        "expected failure\nargs={args:?}\nstatus={}\nstdout={}\nstderr={}",
        out.status,
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr),
    );
    out
}

fn run_ok_json(cwd: &Path, args: &[&str]) -> Value {
    let out = run_ok(cwd, args);
    serde_json::from_slice(&out.stdout).expect("stdout is valid JSON")
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).to_string()
}

fn gram_count(doc: &Value, tokens: &[&str]) -> Option<u64> {
    doc["grams"].as_array()?.iter().find_map(|g| {
        let ts: Vec<&str> = g["tokens"]
            .as_array()?
            .iter()
            .filter_map(Value::as_str)
            .collect();
        (ts == tokens).then(|| g["count"].as_u64()).flatten()
    })
}

#[test]
fn extract_counts_unigrams_and_bigrams_together() {
    let dir = TempDir::new("gramvec_extract");
    let v = run_ok_json(
        dir.path(),
        &[
            "--json",
            "extract",
            "--widths",
            "1,2",
            "--text",
            "this is some text about text this is",
        ],
    );
    assert_eq!(v["widths"], serde_json::json!([1, 2]));
    let doc = &v["documents"][0];
    assert_eq!(doc["token_count"], 8);
    assert_eq!(gram_count(doc, &["this"]), Some(2));
    assert_eq!(gram_count(doc, &["this", "is"]), Some(2));
    assert_eq!(gram_count(doc, &["text", "about"]), Some(1));
    assert_eq!(gram_count(doc, &["is", "this"]), None);
}

#[test]
fn extract_handles_short_documents() {
    let dir = TempDir::new("gramvec_extract_short");
    let v = run_ok_json(
        dir.path(),
        &["--json", "extract", "--widths", "3", "--text", "too short"],
    );
    assert_eq!(v["documents"][0]["distinct_grams"], 0);
}

#[test]
fn fit_twice_then_vectorize() {
    let dir = TempDir::new("gramvec_fit");
    let fit1 = run_ok_json(
        dir.path(),
        &["--json", "fit", "--vocab", "v.json", "--text", "text about stuff"],
    );
    assert_eq!(fit1["created"], true);
    assert_eq!(fit1["added"], 3);

    let fit2 = run_ok_json(
        dir.path(),
        &["--json", "fit", "--vocab", "v.json", "--text", "n-grams are handy"],
    );
    assert_eq!(fit2["created"], false);
    assert_eq!(fit2["total"], 6);

    let v = run_ok_json(
        dir.path(),
        &[
            "--json",
            "vectorize",
            "--vocab",
            "v.json",
            "--dense",
            "--text",
            "text about n-grams",
        ],
    );
    assert_eq!(v["strategy"], "vocabulary");
    assert_eq!(v["dim"], 6);
    let row: Vec<i64> = v["rows"][0]["dense"]
        .as_array()
        .expect("dense row")
        .iter()
        .map(|x| x.as_i64().expect("int"))
        .collect();
    assert_eq!(row.len(), 6);
    assert_eq!(row.iter().filter(|x| **x == 1).count(), 3);
    assert_eq!(row.iter().filter(|x| **x == 0).count(), 3);
    // "text" and "about" were fitted first, "n-grams" first in the second pass.
    assert_eq!(row, vec![1, 1, 0, 1, 0, 0]);
}

#[test]
fn refit_keeps_existing_indices() {
    let dir = TempDir::new("gramvec_refit");
    run_ok(
        dir.path(),
        &["fit", "--vocab", "v.json", "--widths", "1,2", "--text", "a b c"],
    );
    let before = run_ok_json(dir.path(), &["--json", "inspect", "--vocab", "v.json"]);
    run_ok(
        dir.path(),
        &["fit", "--vocab", "v.json", "--text", "c b a d", "--text", "a b"],
    );
    let after = run_ok_json(dir.path(), &["--json", "inspect", "--vocab", "v.json"]);

    let before_entries = before["entries"].as_array().expect("entries");
    let after_entries = after["entries"].as_array().expect("entries");
    assert_eq!(before["size"], 5);
    assert!(after_entries.len() > before_entries.len());
    assert_eq!(&after_entries[..before_entries.len()], before_entries.as_slice());
    assert_eq!(after["widths"], serde_json::json!([1, 2]));
}

#[test]
fn fit_rejects_conflicting_widths() {
    let dir = TempDir::new("gramvec_widths");
    run_ok(dir.path(), &["fit", "--vocab", "v.json", "--text", "a b"]);
    let out = run_err(
        dir.path(),
        &["fit", "--vocab", "v.json", "--widths", "2", "--text", "a b"],
    );
    assert!(stderr(&out).contains("do not match"), "{}", stderr(&out));
}

#[test]
fn project_config_widths_must_match_vocabulary() {
    let dir = TempDir::new("gramvec_config_widths");
    run_ok(dir.path(), &["fit", "--vocab", "v.json", "--text", "a b"]);
    std::fs::write(dir.path().join("gramvec.json"), r#"{"widths":[1,2]}"#)
        .expect("write config");

    let out = run_err(
        dir.path(),
        &["fit", "--vocab", "v.json", "--text", "c d"],
    );
    assert!(stderr(&out).contains("do not match"), "{}", stderr(&out));
    let out = run_err(
        dir.path(),
        &["vectorize", "--vocab", "v.json", "--text", "c d"],
    );
    assert!(stderr(&out).contains("do not match"), "{}", stderr(&out));

    // The file was left alone.
    let v = run_ok_json(dir.path(), &["--json", "inspect", "--vocab", "v.json"]);
    assert_eq!(v["size"], 2);
    assert_eq!(v["widths"], serde_json::json!([1]));
}

#[test]
fn fit_follows_command_line_order() {
    let dir = TempDir::new("gramvec_order");
    std::fs::write(dir.path().join("a.txt"), "first").expect("write a.txt");
    std::fs::write(dir.path().join("b.txt"), "third").expect("write b.txt");
    run_ok(
        dir.path(),
        &[
            "fit", "--vocab", "v.json", "a.txt", "--text", "second", "b.txt", "--text", "fourth",
        ],
    );
    let v = run_ok_json(dir.path(), &["--json", "inspect", "--vocab", "v.json"]);
    let words: Vec<&str> = v["entries"]
        .as_array()
        .expect("entries")
        .iter()
        .map(|e| e["tokens"][0].as_str().expect("token"))
        .collect();
    assert_eq!(words, vec!["first", "second", "third", "fourth"]);
}

#[test]
fn zero_width_is_a_configuration_error() {
    let dir = TempDir::new("gramvec_zero_width");
    let out = run_err(dir.path(), &["extract", "--widths", "0,1", "--text", "a b"]);
    assert!(stderr(&out).contains("must be positive"), "{}", stderr(&out));
}

#[test]
fn hashed_rows_have_fixed_width_and_repeat() {
    let dir = TempDir::new("gramvec_hashed");
    let args = [
        "--json",
        "vectorize",
        "--strategy",
        "hashed",
        "--buckets",
        "32",
        "--widths",
        "1,2",
        "--dense",
        "--text",
        "one",
        "--text",
        "this is a much longer document with many more distinct words in it",
    ];
    let v = run_ok_json(dir.path(), &args);
    assert_eq!(v["dim"], 32);
    for row in v["rows"].as_array().expect("rows") {
        assert_eq!(row["dense"].as_array().expect("dense").len(), 32);
    }
    let again = run_ok_json(dir.path(), &args);
    assert_eq!(v, again);
}

#[test]
fn zero_buckets_rejected() {
    let dir = TempDir::new("gramvec_zero_buckets");
    let out = run_err(
        dir.path(),
        &["vectorize", "--strategy", "hashed", "--buckets", "0", "--text", "a"],
    );
    assert!(stderr(&out).contains("num_buckets"), "{}", stderr(&out));
}

#[test]
fn vocabulary_strategy_needs_a_vocab_file() {
    let dir = TempDir::new("gramvec_no_vocab");
    let out = run_err(dir.path(), &["vectorize", "--text", "a"]);
    assert!(stderr(&out).contains("--vocab"), "{}", stderr(&out));
}

#[test]
fn project_config_file_is_used() {
    let dir = TempDir::new("gramvec_config");
    std::fs::write(
        dir.path().join("gramvec.json"),
        r#"{"strategy":"hashed","num_buckets":8,"signed":true}"#,
    )
    .expect("write config");
    let v = run_ok_json(dir.path(), &["--json", "vectorize", "--text", "a b c"]);
    assert_eq!(v["strategy"], "hashed");
    assert_eq!(v["dim"], 8);
    assert_eq!(v["signed"], true);

    // Flags beat the project file.
    let v = run_ok_json(
        dir.path(),
        &["--json", "vectorize", "--buckets", "4", "--text", "a b c"],
    );
    assert_eq!(v["dim"], 4);

    let v = run_ok_json(
        dir.path(),
        &["--json", "vectorize", "--no-signed", "--text", "a b c"],
    );
    assert_eq!(v["signed"], false);
}

#[test]
fn no_lowercase_overrides_project_config() {
    let dir = TempDir::new("gramvec_no_lowercase");
    std::fs::write(dir.path().join("gramvec.json"), r#"{"lowercase":true}"#)
        .expect("write config");
    let lowered = run_ok_json(dir.path(), &["--json", "extract", "--text", "Word"]);
    assert_eq!(gram_count(&lowered["documents"][0], &["word"]), Some(1));

    let kept = run_ok_json(
        dir.path(),
        &["--json", "extract", "--no-lowercase", "--text", "Word"],
    );
    assert_eq!(gram_count(&kept["documents"][0], &["Word"]), Some(1));
    assert_eq!(gram_count(&kept["documents"][0], &["word"]), None);
}

#[test]
fn explicit_config_must_exist() {
    let dir = TempDir::new("gramvec_missing_config");
    run_err(
        dir.path(),
        &["--config", "nope.json", "extract", "--text", "a"],
    );
}

#[test]
fn lines_mode_makes_one_document_per_line() {
    let dir = TempDir::new("gramvec_lines");
    std::fs::write(dir.path().join("corpus.txt"), "alpha beta\n\ngamma\n").expect("write corpus");
    let v = run_ok_json(
        dir.path(),
        &["--json", "fit", "--vocab", "v.json", "--lines", "corpus.txt"],
    );
    assert_eq!(v["documents"], 2);
    assert_eq!(v["total"], 3);
}

#[test]
fn char_granularity() {
    let dir = TempDir::new("gramvec_chars");
    let v = run_ok_json(
        dir.path(),
        &[
            "--json",
            "extract",
            "--granularity",
            "char",
            "--widths",
            "2",
            "--text",
            "abab",
        ],
    );
    let doc = &v["documents"][0];
    assert_eq!(gram_count(doc, &["a", "b"]), Some(2));
    assert_eq!(gram_count(doc, &["b", "a"]), Some(1));
}
