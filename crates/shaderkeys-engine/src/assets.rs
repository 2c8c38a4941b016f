use std::path::{Path, PathBuf};

use crate::error::EngineError;

/// Environment variable that points at an assets directory.
pub const ASSETS_ENV: &str = "SHADERKEYS_ASSETS";

/// A validated root directory containing the sketch's runtime assets (JSON + shaders).
#[derive(Debug, Clone)]
pub struct AssetsRoot {
    path: PathBuf,
}

impl AssetsRoot {
    /// Locate the `assets/` directory.
    ///
    /// Resolution order:
    /// 1) `explicit` (the `--assets` flag), if it exists
    /// 2) `SHADERKEYS_ASSETS` env var, if set and existing
    /// 3) Search upward from `start_dir` for a folder named `assets`
    pub fn discover(explicit: Option<&Path>, start_dir: &Path) -> Result<Self, EngineError> {
        if let Some(p) = explicit {
            if p.is_dir() {
                return Ok(Self { path: p.to_path_buf() });
            }
            return Err(EngineError::AssetsNotFound {
                start_dir: p.to_path_buf(),
            });
        }

        if let Ok(p) = std::env::var(ASSETS_ENV) {
            let pb = PathBuf::from(p);
            if pb.is_dir() {
                return Ok(Self { path: pb });
            }
        }

        Self::search_upward(start_dir)
    }

    /// Walk `start_dir` and its ancestors looking for an `assets/` folder.
    pub fn search_upward(start_dir: &Path) -> Result<Self, EngineError> {
        let mut cur = start_dir.to_path_buf();
        loop {
            let cand = cur.join("assets");
            if cand.is_dir() {
                return Ok(Self { path: cand });
            }
            if !cur.pop() {
                break;
            }
        }

        Err(EngineError::AssetsNotFound {
            start_dir: start_dir.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.path.join(rel)
    }

    /// `<stem>.<os>.json` when this platform has one, `<stem>.json` otherwise.
    pub fn pick_platform_json(&self, stem: &str) -> PathBuf {
        let per_os = self.path.join(format!("{stem}.{}.json", os_tag()));
        if per_os.exists() {
            per_os
        } else {
            self.path.join(format!("{stem}.json"))
        }
    }

    /// Config paths are relative to the root; absolute ones pass through.
    pub fn resolve(&self, rel: &str) -> PathBuf {
        let p = Path::new(rel);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.path.join(p)
        }
    }
}

fn os_tag() -> &'static str {
    match std::env::consts::OS {
        os @ ("windows" | "macos" | "linux") => os,
        _ => "other",
    }
}

/// Shader and config text, with the path attached to any I/O failure.
pub fn read_text(path: &Path) -> Result<String, EngineError> {
    std::fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub(crate) mod testdir {
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicU32, Ordering};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    /// Scratch directory under the system temp dir, removed on drop.
    pub struct TestDir(PathBuf);

    impl TestDir {
        pub fn new(label: &str) -> Self {
            let n = COUNTER.fetch_add(1, Ordering::Relaxed);
            let p = std::env::temp_dir().join(format!(
                "shaderkeys-{label}-{}-{n}",
                std::process::id()
            ));
            let _ = std::fs::remove_dir_all(&p);
            std::fs::create_dir_all(&p).unwrap();
            Self(p)
        }

        pub fn path(&self) -> &Path {
            &self.0
        }

        pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
            let p = self.0.join(rel);
            if let Some(parent) = p.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(&p, contents).unwrap();
            p
        }
    }

    impl Drop for TestDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testdir::TestDir;
    use super::*;

    #[test]
    fn search_upward_finds_assets_in_an_ancestor() {
        let dir = TestDir::new("assets-up");
        dir.write("assets/sketch.json", "{}");
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let root = AssetsRoot::search_upward(&nested).unwrap();
        assert_eq!(root.path(), dir.path().join("assets"));
    }

    #[test]
    fn explicit_dir_wins_and_must_exist() {
        let dir = TestDir::new("assets-explicit");
        let root = AssetsRoot::discover(Some(dir.path()), Path::new("/")).unwrap();
        assert_eq!(root.path(), dir.path());

        let missing = dir.path().join("nope");
        let err = AssetsRoot::discover(Some(&missing), Path::new("/")).unwrap_err();
        assert!(matches!(err, EngineError::AssetsNotFound { .. }));
    }

    #[test]
    fn platform_json_falls_back_to_plain_stem() {
        let dir = TestDir::new("assets-platform");
        let root = AssetsRoot::discover(Some(dir.path()), Path::new("/")).unwrap();
        assert_eq!(root.pick_platform_json("sketch"), dir.path().join("sketch.json"));

        let os_file = dir.write(&format!("sketch.{}.json", os_tag()), "{}");
        assert_eq!(root.pick_platform_json("sketch"), os_file);
    }

    #[test]
    fn relative_paths_resolve_against_assets() {
        let dir = TestDir::new("assets-resolve");
        let root = AssetsRoot::discover(Some(dir.path()), Path::new("/")).unwrap();
        assert_eq!(root.resolve("shaders/a.frag"), dir.path().join("shaders/a.frag"));
        let abs = if cfg!(windows) { "C:\\x\\a.frag" } else { "/x/a.frag" };
        assert_eq!(root.resolve(abs), PathBuf::from(abs));
    }

    #[test]
    fn read_missing_file_is_io_error() {
        let dir = TestDir::new("assets-read");
        let err = read_text(&dir.path().join("missing.frag")).unwrap_err();
        assert!(matches!(err, EngineError::Io { .. }));
    }
}
