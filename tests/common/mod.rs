use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub root: PathBuf,
    pub artifacts: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path().to_path_buf();
        let artifacts = root.join("artifacts");
        Self {
            _tmp: tmp,
            root,
            artifacts,
        }
    }

    pub fn write(&self, name: &str, body: &str) -> PathBuf {
        let p = self.root.join(name);
        fs::write(&p, body).expect("write fixture");
        p
    }

    pub fn artifact(&self, name: &str) -> PathBuf {
        self.artifacts.join(name)
    }

    /// Runs from the temp root so the default artifacts dir never lands in the crate.
    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("toon-verify");
        cmd.current_dir(&self.root).env_remove("RUST_LOG");
        cmd
    }

    pub fn verify_args(&self, reference: &Path) -> Vec<String> {
        vec![
            "verify".to_string(),
            "--reference".to_string(),
            path_str(reference),
            "--artifacts-dir".to_string(),
            path_str(&self.artifacts),
        ]
    }

    pub fn run_json(&self, args: &[String], code: i32) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .code(code)
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }
}

pub fn path_str(p: &Path) -> String {
    p.to_str().expect("utf-8 temp path").to_string()
}

pub const NESTED: &str = r#"{
  "x": [1, 2, 3],
  "y": {"z": "hi"}
}
"#;

pub const NESTED_TOON: &str = "x[3]: 1,2,3\ny:\n  z: hi";
