use std::{
    fs,
    io,
    path::{Path, PathBuf},
    process::Command,
};

use chrono::Local;
use log::{debug, info};
use strum::Display;
use thiserror::Error;

/// Name of the file recording the input version
pub const VERSION_FILE: &str = "version.txt";

/// External programs computing MD5 hashes
#[derive(Copy, Clone, Debug, Display, Eq, PartialEq)]
#[strum(serialize_all = "lowercase")]
pub enum HashTool {
    /// BSD `md5`, prints `MD5 (<file>) = <hash>`
    Md5,
    /// GNU `md5sum`, prints `<hash>  <file>`
    Md5Sum,
}

impl HashTool {
    /// Extract the hash from the program output
    pub fn parse_output(&self, stdout: &str) -> Option<String> {
        let mut tokens = stdout.split_whitespace();
        let hash = match self {
            HashTool::Md5 => tokens.last(),
            HashTool::Md5Sum => tokens.next(),
        };
        hash.map(|h| h.to_owned())
    }
}

#[derive(Debug, Error)]
pub enum HashError {
    #[error("Neither `md5` nor `md5sum` found")]
    NoTool,
    #[error("Failed to run `{tool}`: {err}")]
    Io {
        tool: HashTool,
        #[source]
        err: io::Error,
    },
    #[error("`{tool} {file:?}` failed: {stderr}")]
    Failed {
        tool: HashTool,
        file: PathBuf,
        stderr: String,
    },
    #[error("Unexpected output from `{tool}`: {output}")]
    Output { tool: HashTool, output: String },
}

/// MD5 hash of a file
///
/// Uses `md5` if available and `md5sum` otherwise.
pub fn file_hash<P: AsRef<Path>>(path: P) -> Result<String, HashError> {
    file_hash_with(path, &[HashTool::Md5, HashTool::Md5Sum])
}

/// MD5 hash of a file using the first available tool
pub fn file_hash_with<P: AsRef<Path>>(
    path: P,
    tools: &[HashTool],
) -> Result<String, HashError> {
    let path = path.as_ref();
    for &tool in tools {
        let output = match Command::new(tool.to_string()).arg(path).output() {
            Ok(output) => output,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("`{tool}` not found");
                continue;
            }
            Err(err) => return Err(HashError::Io { tool, err }),
        };
        if !output.status.success() {
            return Err(HashError::Failed {
                tool,
                file: path.to_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        return tool.parse_output(&stdout).ok_or_else(|| HashError::Output {
            tool,
            output: stdout.into_owned(),
        });
    }
    Err(HashError::NoTool)
}

/// Record the current time and the input hash in `dir/version.txt`
pub fn write_version_file<P: AsRef<Path>>(
    dir: P,
    hash: &str,
) -> Result<PathBuf, io::Error> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(VERSION_FILE);
    let now = Local::now().format("%m-%d-%Y, %H:%M:%S");
    fs::write(&path, format!("Job ran on: {now}\nTree version: \n{hash}"))?;
    info!("Wrote input version to {path:?}");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO_MD5: &str = "b1946ac92492d2347c6235b4d2611184";

    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn parse() {
        let md5 = format!("MD5 (tree_v2.root) = {HELLO_MD5}\n");
        assert_eq!(HashTool::Md5.parse_output(&md5).as_deref(), Some(HELLO_MD5));
        let md5sum = format!("{HELLO_MD5}  tree_v2.root\n");
        assert_eq!(
            HashTool::Md5Sum.parse_output(&md5sum).as_deref(),
            Some(HELLO_MD5)
        );
        assert_eq!(HashTool::Md5Sum.parse_output(""), None);
        assert_eq!(HashTool::Md5Sum.to_string(), "md5sum");
    }

    #[test]
    fn hash_file() {
        log_init();

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("hello.txt");
        fs::write(&file, "hello\n").unwrap();
        match file_hash(&file) {
            Ok(hash) => assert_eq!(hash, HELLO_MD5),
            // no hash tool installed
            Err(HashError::NoTool) => {}
            Err(err) => panic!("{err}"),
        }
        assert!(matches!(
            file_hash_with(&file, &[]),
            Err(HashError::NoTool)
        ));
    }

    #[test]
    fn version_file() {
        log_init();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("output").join("tag");
        let path = write_version_file(&out, HELLO_MD5).unwrap();
        assert_eq!(path, out.join(VERSION_FILE));
        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Job ran on: "));
        assert_eq!(lines[1], "Tree version: ");
        assert_eq!(lines[2], HELLO_MD5);
    }
}
