#![allow(dead_code)]

use assert_cmd::Command;
use predicates::prelude::predicate;

/// Run `nit init` in `dir` and assert it succeeded.
pub fn init_repository(dir: &assert_fs::TempDir) {
    let mut cmd = Command::cargo_bin("nit").unwrap();
    cmd.current_dir(dir.path()).arg("init");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Initialized empty repository"));
}

/// Store `content` as a loose blob via `nit hash-object -w` and return its
/// hash.
pub fn hash_blob(dir: &assert_fs::TempDir, file_name: &str, content: &str) -> String {
    std::fs::write(dir.path().join(file_name), content).unwrap();

    let mut cmd = Command::cargo_bin("nit").unwrap();
    cmd.current_dir(dir.path())
        .arg("hash-object")
        .arg("-w")
        .arg(file_name);

    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap().trim().to_string()
}

/// Write a reference file under `.git/`, creating parent directories.
pub fn write_ref(dir: &assert_fs::TempDir, name: &str, content: &str) {
    let path = dir.path().join(".git").join(name);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Decode a 40-character hex hash into its 20 raw bytes.
pub fn hex_to_bytes(hex: &str) -> Vec<u8> {
    assert_eq!(hex.len(), 40);
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).unwrap())
        .collect()
}
