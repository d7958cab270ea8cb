// Non-interactive subcommands, run against the compiled binary with the
// state directory and config file pointed at a temp dir.

use assert_cmd::Command;
use hifz::document::VerseRange;
use hifz::record::{FocusMode, Mode, ResultDraft, SessionResult};
use hifz::store::{LocalSessionStore, SessionStore, LOCAL_FILE};
use hifz::util::now_millis;
use tempfile::TempDir;

fn hifz(state: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hifz").unwrap();
    cmd.env("HIFZ_STATE_DIR", state.path())
        .arg("--config")
        .arg(state.path().join("config.json"));
    cmd
}

fn seed(state: &TempDir, attempts: Vec<bool>) -> SessionResult {
    let total = attempts.len() as u32;
    let result = SessionResult::from_attempts(
        ResultDraft {
            document_slug: "an-nas",
            document_name: "An-Nas",
            document_number: 114,
            range: VerseRange { start: 1, end: 6 },
            repetitions: 1,
            mode: Mode::Recall,
            focus_mode: Some(FocusMode::Transliteration),
            hide_policy: None,
        },
        attempts,
        total,
        now_millis(),
    );
    LocalSessionStore::with_path(state.path().join(LOCAL_FILE))
        .save(&result)
        .unwrap();
    result
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn list_shows_embedded_documents() {
    let state = tempfile::tempdir().unwrap();
    let out = stdout_of(hifz(&state).arg("list"));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].contains("al-fatihah"));
    assert!(lines[0].contains("7 verses"));
    assert!(out.contains("al-ikhlas"));
    assert!(out.contains("an-nas"));
}

#[test]
fn plain_stats_without_history() {
    let state = tempfile::tempdir().unwrap();
    let out = stdout_of(hifz(&state).args(["stats", "--plain"]));
    assert!(out.starts_with("No sessions yet"));
}

#[test]
fn plain_stats_reads_saved_history() {
    let state = tempfile::tempdir().unwrap();
    seed(&state, vec![true, true, false, true]);
    let out = stdout_of(hifz(&state).args(["stats", "--plain"]));
    assert!(out.contains("Sessions: 1"));
    assert!(out.contains("Streak: 1 days"));
    assert!(out.contains("Average recall: 75%"));
    assert!(out.contains("An-Nas"));
    assert!(out.contains("transliteration 100%"));
}

#[test]
fn account_flag_reads_the_account_history() {
    let state = tempfile::tempdir().unwrap();
    // only in the local file; the account store starts empty
    seed(&state, vec![true]);
    let out = stdout_of(hifz(&state).args(["--account", "reader", "stats", "--plain"]));
    assert!(out.starts_with("No sessions yet"));
}

#[test]
fn export_writes_csv_to_stdout_and_file() {
    let state = tempfile::tempdir().unwrap();
    let empty = stdout_of(hifz(&state).arg("export"));
    assert_eq!(empty.lines().count(), 1);
    assert!(empty.starts_with("id,completed_at,slug"));

    let saved = seed(&state, vec![true, false]);
    let out = stdout_of(hifz(&state).arg("export"));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with(&saved.id));
    assert!(lines[1].contains(",an-nas,An-Nas,114,1,6,1,recall,1,2,50,transliteration,"));

    let file = state.path().join("out.csv");
    hifz(&state)
        .args(["export", "-o"])
        .arg(&file)
        .assert()
        .success();
    assert_eq!(std::fs::read_to_string(&file).unwrap(), out);
}

#[test]
fn interactive_commands_refuse_without_tty() {
    let state = tempfile::tempdir().unwrap();
    hifz(&state)
        .args(["guided", "al-ikhlas"])
        .write_stdin("")
        .assert()
        .failure();
}

#[test]
fn unknown_document_is_an_error() {
    let state = tempfile::tempdir().unwrap();
    hifz(&state)
        .args(["recall", "al-baqarah"])
        .write_stdin("")
        .assert()
        .failure();
}
