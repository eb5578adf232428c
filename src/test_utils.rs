//! Test utilities shared across the codebase

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::cs::symbols::{CsParser, SyntaxFile};

/// Parse C# source held in memory, as if it lived at `relative_path`
pub fn parse_cs(relative_path: &str, source: &str) -> SyntaxFile {
    parse_cs_with_defines(relative_path, source, &[])
}

/// Parse C# source with preprocessor symbols defined
pub fn parse_cs_with_defines(relative_path: &str, source: &str, defines: &[&str]) -> SyntaxFile {
    let mut parser = CsParser::new().expect("Failed to create C# parser");
    let defines: Vec<String> = defines.iter().map(|d| d.to_string()).collect();
    parser
        .parse(Path::new(relative_path), source.to_string(), &defines)
        .expect("Failed to parse C# source")
}

/// A throwaway source tree on disk
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Write a file below the root, creating directories as needed
    pub fn write(&self, relative_path: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create directories");
        }
        fs::write(&path, content).expect("Failed to write test file");
        path
    }

    pub fn read(&self, relative_path: &str) -> String {
        fs::read_to_string(self.dir.path().join(relative_path)).expect("Failed to read test file")
    }

    /// Absolute path of a file below the root
    pub fn path(&self, relative_path: &str) -> PathBuf {
        self.dir.path().join(relative_path)
    }

    /// The root spelled relative to the working directory
    #[cfg(unix)]
    pub fn relative_root(&self) -> PathBuf {
        let cwd = std::env::current_dir().expect("Failed to read working directory");
        let mut relative = PathBuf::new();
        for _ in cwd
            .components()
            .filter(|c| matches!(c, std::path::Component::Normal(_)))
        {
            relative.push("..");
        }
        relative.push(self.dir.path().strip_prefix("/").expect("Temp dir is not absolute"));
        relative
    }
}
