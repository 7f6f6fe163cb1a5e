// End-to-end runs of fixtures against /bin/sh.
#![cfg(unix)]

mod common;

use std::time::Duration;

use common::{config_in, entries, run_with_shell, write_fixture};
use fixture_harness::output::BufferSink;
use fixture_harness::{CaseRunner, Harness, HarnessConfig, Verdict};

#[test]
fn matching_output_passes() {
    let fixtures = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let path = write_fixture(
        fixtures.path(),
        "pass.sft",
        "echo expected text\n=====\nexpected text\n",
    );

    let (results, output) = run_with_shell(&config_in(scratch.path()), &[path]);

    assert_eq!(results.total_files, 1);
    assert_eq!(results.total_tests, 1);
    assert_eq!(results.passed, 1);
    assert_eq!(results.failed, 0);
    assert_eq!(results.exit_code(), 0);
    assert!(output.contains("pass.sft : pass.sft : [-]\n"));
}

#[test]
fn wrong_output_fails_with_diff_report() {
    let fixtures = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let path = write_fixture(
        fixtures.path(),
        "fail.sft",
        "echo wrong text\n=====\nexpected text\n",
    );

    let (results, output) = run_with_shell(&config_in(scratch.path()), &[path.clone()]);

    assert_eq!(results.failed, 1);
    assert_eq!(results.exit_code(), 1);
    assert_eq!(
        results.errors,
        vec![format!(
            "Error in {} (test 1, line 4)\n+++ 'wrong text'\n--- 'expected text'\n",
            path.display()
        )]
    );
    assert!(output.contains("=============================\nError in "));
}

#[test]
fn exit_code_is_checked_when_no_output_is_expected() {
    let fixtures = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let path = write_fixture(fixtures.path(), "exit.sft", "true\n@@@@\nexit 3\n");

    let (results, _) = run_with_shell(&config_in(scratch.path()), &[path]);

    assert_eq!(results.passed, 1);
    assert_eq!(results.failed, 1);
    assert!(results.errors[0].ends_with("(test 2, line 6)\nExpected exitcode 0, got exitcode 3\n"));
}

#[test]
fn expected_output_takes_precedence_over_exit_code() {
    let fixtures = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let path = write_fixture(
        fixtures.path(),
        "stderr.sft",
        "echo 'Error: line 3: bad token' >&2\nexit 2\n=====\nbad token\n",
    );

    let (results, _) = run_with_shell(&config_in(scratch.path()), &[path]);

    assert_eq!(results.passed, 1);
}

#[test]
fn fuzzy_cases_look_for_a_substring() {
    let fixtures = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let path = write_fixture(
        fixtures.path(),
        "fuzzy.sft",
        "printf 'hello\\nworld\\n'\n~~~~~\nwor\n@@@@\nprintf 'hello\\nworld\\n'\n~~~~~\nxyz\n",
    );

    let (results, _) = run_with_shell(&config_in(scratch.path()), &[path]);

    assert_eq!(results.passed, 1);
    assert_eq!(results.failed, 1);
    assert!(results.errors[0].contains("Expected output not found in actual output"));
}

#[test]
fn ignored_cases_are_counted_separately() {
    let fixtures = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let path = write_fixture(
        fixtures.path(),
        "ignore.sft",
        "!ignore\nexit 1\n@@@@\n!IGNORE\necho fine\n~~~~~\nfine\n",
    );

    let (results, output) = run_with_shell(&config_in(scratch.path()), &[path]);

    assert_eq!(results.ignored, 2);
    assert_eq!(results.failed, 0);
    assert_eq!(results.errors.len(), 1);
    assert_eq!(results.exit_code(), 0);
    assert!(output.contains(": [II]\n"));
}

#[test]
fn ignore_directive_reaches_the_binary() {
    let fixtures = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let path = write_fixture(
        fixtures.path(),
        "cat.sft",
        "!ignore\nline-a\n=====\n!ignore\nline-a\n",
    );
    let harness = Harness::new(CaseRunner::new("/bin/cat", &config_in(scratch.path())));
    let mut out = BufferSink::new();

    let results = harness.run([path], &mut out);

    assert_eq!(results.ignored, 1);
    assert!(results.errors.is_empty());
}

#[test]
fn skipped_cases_never_run() {
    let fixtures = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let marker = scratch.path().join("marker");
    let path = write_fixture(
        fixtures.path(),
        "skip.sft",
        &format!("!skip\ntouch {}\n", marker.display()),
    );

    let (results, _) = run_with_shell(&config_in(scratch.path()), &[path]);

    assert_eq!(results.skipped, 1);
    assert!(!marker.exists());
}

#[test]
fn progress_is_grouped_by_ten() {
    let fixtures = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let body = vec!["true\n"; 12].join("@@@@\n");
    let path = write_fixture(fixtures.path(), "many.sft", &body);

    let (results, output) = run_with_shell(&config_in(scratch.path()), &[path]);

    assert_eq!(results.passed, 12);
    assert!(output.contains(": [----------][--]\n"));
}

#[test]
fn scratch_files_are_removed_after_every_outcome() {
    let fixtures = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let path = write_fixture(
        fixtures.path(),
        "mixed.sft",
        "echo a\n=====\na\n@@@@\necho a\n=====\nb\n@@@@\n!ignore\nexit 4\n@@@@\n!skip\n",
    );

    let (results, _) = run_with_shell(&config_in(scratch.path()), &[path]);

    assert_eq!(
        (results.passed, results.failed, results.ignored, results.skipped),
        (1, 1, 1, 1)
    );
    assert_eq!(entries(scratch.path()), 0);
}

#[test]
fn hung_case_times_out() {
    let fixtures = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let path = write_fixture(fixtures.path(), "slow.sft", "exec sleep 5\n");
    let config = HarnessConfig {
        timeout: Some(Duration::from_secs(1)),
        ..config_in(scratch.path())
    };

    let (results, _) = run_with_shell(&config, &[path]);

    assert_eq!(results.failed, 1);
    assert!(results.errors[0].contains("did not finish within 1 seconds"));
    assert_eq!(entries(scratch.path()), 0);
}

#[test]
fn broken_fixture_does_not_stop_the_run() {
    let fixtures = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let broken = fixtures.path().join("broken.sft");
    std::fs::write(&broken, "title: T\nno separator here\n*****\ntrue\n").unwrap();
    let good = write_fixture(fixtures.path(), "good.sft", "true\n");

    let (results, output) = run_with_shell(&config_in(scratch.path()), &[broken, good]);

    assert_eq!(results.total_files, 2);
    assert_eq!(results.total_tests, 1);
    assert_eq!(results.passed, 1);
    assert!(output.contains("broken.sft : Cannot find tag on line 2\n"));
}

#[test]
fn verdicts_serialize_in_lowercase() {
    assert_eq!(serde_json::to_string(&Verdict::Ignore).unwrap(), "\"ignore\"");
}
