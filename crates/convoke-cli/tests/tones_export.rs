use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_tones_export_writes_wav_files() {
    let home = tempdir().unwrap();
    let out = tempdir().unwrap();
    let target = out.path().join("tones");

    cargo_bin_cmd!("convoke")
        .env("CONVOKE_HOME", home.path())
        .env_remove("CONVOKE_CONFIG")
        .args(["tones", "export", "--out"])
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("boot.wav"))
        .stdout(predicate::str::contains("warning.wav"));

    for name in ["boot.wav", "keystroke.wav", "warning.wav"] {
        let bytes = std::fs::read(target.join(name)).unwrap();
        assert_eq!(&bytes[..4], b"RIFF");
        assert!(bytes.len() > 44, "{name} has no samples");
    }
}
