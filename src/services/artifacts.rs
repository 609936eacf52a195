use anyhow::Context;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Directory that receives per-phase artifacts. Names are fixed per phase,
/// so a rerun overwrites the previous run's files.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn write_text(&self, name: &str, body: &str) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create artifacts dir {}", self.dir.display()))?;
        let p = self.path_of(name);
        std::fs::write(&p, body).with_context(|| format!("write artifact {}", p.display()))?;
        tracing::info!(artifact = %p.display(), bytes = body.len(), "wrote artifact");
        Ok(p)
    }

    /// Persists a tree in the reference format, indented for diffing.
    pub fn write_tree(&self, name: &str, tree: &Value) -> anyhow::Result<PathBuf> {
        let body = serde_json::to_string_pretty(tree)?;
        self.write_text(name, &format!("{}\n", body))
    }
}

#[cfg(test)]
mod tests {
    use super::ArtifactStore;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn creates_directory_and_overwrites_by_name() {
        let tmp = TempDir::new().expect("temp dir");
        let store = ArtifactStore::new(tmp.path().join("out/nested"));

        let p = store.write_text("encoded.toon", "a: 1").unwrap();
        assert_eq!(std::fs::read_to_string(&p).unwrap(), "a: 1");
        store.write_text("encoded.toon", "a: 2").unwrap();
        assert_eq!(std::fs::read_to_string(&p).unwrap(), "a: 2");

        let t = store.write_tree("tree.json", &json!({"k": [1]})).unwrap();
        let back: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(t).unwrap()).unwrap();
        assert_eq!(back, json!({"k": [1]}));
    }
}
