use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tempfile::TempDir;

fn rs_import_bin() -> PathBuf {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("target")
        .join("debug")
        .join(if cfg!(windows) {
            "rs-import.exe"
        } else {
            "rs-import"
        });
    if !p.exists() {
        p = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("target")
            .join("release")
            .join(if cfg!(windows) {
                "rs-import.exe"
            } else {
                "rs-import"
            });
    }
    assert!(p.exists(), "rs-import binary not found at {:?}", p);
    p
}

fn write_config(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("rs-import.yml");
    fs::write(
        &path,
        "entities_namespace: \"https://enter.museum4punkt0.de/resource/\"\n\
         media_types:\n  tif: \"https://www.iana.org/assignments/media-types/image/tiff\"\n\
         sparql_endpoint: \"https://store.invalid/sparql\"\n\
         username: importer\npassword: secret\n",
    )
    .expect("write config");
    path
}

fn write_import_folder(dir: &TempDir) -> PathBuf {
    let folder = dir.path().join("dataset_1");
    fs::create_dir_all(&folder).unwrap();
    fs::write(
        folder.join("dataset.yml"),
        "file_namespace: \"https://example.org/project/\"\n\
         data_provider: \"https://example.org/org/\"\n",
    )
    .unwrap();
    fs::write(
        folder.join("images.csv"),
        "filename*,rights_statement\nphoto.tif,CC BY Museum\n",
    )
    .unwrap();
    folder
}

#[test]
fn missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let folder = write_import_folder(&dir);
    let out = Command::new(rs_import_bin())
        .arg("--config")
        .arg(dir.path().join("no-such-config.yml"))
        .arg(&folder)
        .output()
        .expect("run rs-import");
    // a reported failure exits with status 1; 3 is reserved for panics
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("configuration"), "stderr was: {}", stderr);
}

#[test]
fn missing_dataset_description_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);
    let folder = dir.path().join("empty_dataset");
    fs::create_dir_all(&folder).unwrap();
    let out = Command::new(rs_import_bin())
        .arg("--config")
        .arg(&config)
        .arg(&folder)
        .output()
        .expect("run rs-import");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("dataset.yml"), "stderr was: {}", stderr);
}

#[test]
fn invalid_dataset_description_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);
    let folder = write_import_folder(&dir);
    fs::write(
        folder.join("dataset.yml"),
        "data_provider: \"https://example.org/org/\"\n",
    )
    .unwrap();
    let out = Command::new(rs_import_bin())
        .arg("--config")
        .arg(&config)
        .arg(&folder)
        .output()
        .expect("run rs-import");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("file_namespace"), "stderr was: {}", stderr);
}

// A declined review must abort the run before any network call is made, so
// this passes without a reachable SPARQL endpoint.
#[test]
fn declined_review_aborts_before_submission() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);
    let folder = write_import_folder(&dir);
    let mut child = Command::new(rs_import_bin())
        .arg("--config")
        .arg(&config)
        .arg("--review")
        .arg(&folder)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("run rs-import");
    child
        .stdin
        .as_mut()
        .expect("stdin")
        .write_all(b"n\n")
        .expect("answer review prompt");
    let out = child.wait_with_output().expect("wait for rs-import");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("declined"), "stderr was: {}", stderr);
    // the insert command was shown for review
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("INSERT DATA"), "stdout was: {}", stdout);
}
