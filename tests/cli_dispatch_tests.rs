use std::process::Command;

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_periscope")
}

#[test]
fn match_command_dispatches_and_emits_json() {
    let output = Command::new(bin())
        .args(["match", "easy", "11", "50"])
        .output()
        .expect("match should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value = serde_json::from_str(&stdout).expect("match should emit json");
    assert!(payload["turns"].is_number());
    assert!(payload["turns"].as_u64().unwrap() <= 50);
}

#[test]
fn match_command_is_deterministic_for_identical_args() {
    let run = || {
        Command::new(bin())
            .args(["match", "normal", "42", "50"])
            .output()
            .expect("match should run")
    };
    let first = run();
    let second = run();
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn tournament_command_with_test_preset_dispatches() {
    let output = Command::new(bin())
        .args(["tournament", "--preset", "test"])
        .output()
        .expect("tournament should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("top"));
}

#[test]
fn tournament_command_rejects_an_unknown_preset() {
    let output = Command::new(bin())
        .args(["tournament", "--preset", "ludicrous"])
        .output()
        .expect("tournament should run");

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn no_subcommand_prints_usage_and_exits_with_code_one() {
    let output = Command::new(bin()).output().expect("binary should run");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("usage"));
}
