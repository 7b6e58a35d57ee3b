use slotcode::config_file::{Config, ConfigStore};
use slotcode::i18n::Language;
use std::process::Command;
use tempfile::TempDir;

fn slotcode_cmd(config_path: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_slotcode"));
    cmd.env("SLOTCODE_CONFIG", config_path)
        .env_remove("SLOTCODE_DIGITS")
        .env_remove("SLOTCODE_INTERVAL")
        .env_remove("SLOTCODE_APPEND");
    cmd
}

#[test]
fn test_cli_prints_code_and_remaining() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    let mut config = Config {
        language: Language::En,
        ..Config::default()
    };
    config.set_secret("abc123");
    ConfigStore::new(&path).save(&config).unwrap();

    let output = slotcode_cmd(&path)
        .args(["--at", "1700000010"])
        .output()
        .expect("Failed to run slotcode");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "962825 30");
}

#[test]
fn test_cli_without_secret_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let output = slotcode_cmd(&path)
        .output()
        .expect("Failed to run slotcode");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("slotcode --setup"));
}
