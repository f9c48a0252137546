//! Output file names for a run.
//!
//! Every file a run writes is named after the script that launched it, with
//! the script's extension stripped, so that runs started from different
//! scripts in the same directory do not overwrite each other:
//!
//! | file              | contents                                  |
//! |-------------------|-------------------------------------------|
//! | `<base>.log`      | console transcript (interactive runs)     |
//! | `<base>.pic`      | saved results                             |
//! | `<base>.png`      | last rendered frame (interactive runs)    |
//! | `<base>.gif`      | animation (interactive runs)              |
//! | `<base>_NNNN.png` | per-frame snapshots (if requested)        |

use std::path::{ Path, PathBuf };
use crate::error::{ RunError, RunResult };

/// File paths owned by a run.
///
/// The paths are passed unchanged to whichever component writes them; the
/// contents are never inspected here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunArtifacts {
    base: String,
    dir: PathBuf,
}

impl RunArtifacts {
    /// Name outputs after `script`, placing them in the current directory.
    ///
    /// ```
    /// use xchain::RunArtifacts;
    ///
    /// let artifacts = RunArtifacts::from_script("workspace/src/tdse_1.rs").unwrap();
    /// assert_eq!(artifacts.base(), "tdse_1");
    /// assert_eq!(artifacts.save_file().to_str(), Some("tdse_1.pic"));
    /// ```
    pub fn from_script<P>(script: P) -> RunResult<Self>
    where P: AsRef<Path>
    {
        let script = script.as_ref();
        let base
            = script.file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| RunError::BadScript(script.to_path_buf()))?;
        Ok(Self { base: base.to_string(), dir: PathBuf::new() })
    }

    /// Place outputs in `dir` instead.
    pub fn in_dir<P>(mut self, dir: P) -> Self
    where P: AsRef<Path>
    {
        self.dir = dir.as_ref().to_path_buf();
        self
    }

    /// Base name shared by all output files.
    pub fn base(&self) -> &str { &self.base }

    /// Directory holding all output files.
    pub fn dir(&self) -> &Path { &self.dir }

    fn with_ext(&self, ext: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", self.base, ext))
    }

    pub fn log_file(&self) -> PathBuf { self.with_ext("log") }

    pub fn save_file(&self) -> PathBuf { self.with_ext("pic") }

    pub fn image_file(&self) -> PathBuf { self.with_ext("png") }

    pub fn movie_file(&self) -> PathBuf { self.with_ext("gif") }

    /// Snapshot image of the `k`-th frame.
    pub fn snapshot_file(&self, k: usize) -> PathBuf {
        self.dir.join(format!("{}_{:04}.png", self.base, k))
    }
}
