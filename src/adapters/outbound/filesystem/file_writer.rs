use crate::shared::error::AnalysisError;
use crate::shared::Result;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// FileSystemWriter adapter for the `--output` file and snapshot updates
///
/// Opens the destination after checking that its parent directory exists and
/// that the path is not a symbolic link.
pub struct FileSystemWriter {
    output_path: PathBuf,
}

impl FileSystemWriter {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }

    pub fn path(&self) -> &Path {
        &self.output_path
    }

    /// Creates (or truncates) the output file.
    pub fn create(&self) -> Result<BufWriter<File>> {
        self.validate_parent_directory()?;
        self.validate_output_security()?;

        let file = File::create(&self.output_path).map_err(|e| self.write_error(e.to_string()))?;
        Ok(BufWriter::new(file))
    }

    /// Replaces the file with `value` as pretty-printed JSON.
    ///
    /// The document is written to a hidden sibling file first and renamed
    /// over the destination, so readers never see a half-written file.
    pub fn write_json<T: Serialize>(&self, value: &T) -> Result<()> {
        self.validate_parent_directory()?;
        self.validate_output_security()?;

        let staging = self.staging_path()?;
        let result = (|| -> std::io::Result<()> {
            let mut writer = BufWriter::new(File::create(&staging)?);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
            fs::rename(&staging, &self.output_path)
        })();

        if let Err(e) = result {
            let _ = fs::remove_file(&staging);
            return Err(self.write_error(e.to_string()).into());
        }
        Ok(())
    }

    fn staging_path(&self) -> Result<PathBuf> {
        let file_name = self
            .output_path
            .file_name()
            .ok_or_else(|| self.write_error("Output path has no file name".to_string()))?;
        Ok(self
            .output_path
            .with_file_name(format!(".{}.tmp", file_name.to_string_lossy())))
    }

    fn validate_parent_directory(&self) -> Result<()> {
        if let Some(parent) = self.output_path.parent() {
            if parent != Path::new("") && !parent.is_dir() {
                return Err(self
                    .write_error(format!(
                        "Parent directory does not exist: {}",
                        parent.display()
                    ))
                    .into());
            }
        }
        Ok(())
    }

    fn validate_output_security(&self) -> Result<()> {
        match fs::symlink_metadata(&self.output_path) {
            Ok(metadata) if metadata.is_symlink() => Err(self
                .write_error(
                    "Security: Output path is a symbolic link. For security reasons, writing to symbolic links is not allowed."
                        .to_string(),
                )
                .into()),
            Ok(metadata) if metadata.is_dir() => {
                Err(self.write_error("Output path is a directory".to_string()).into())
            }
            _ => Ok(()),
        }
    }

    fn write_error(&self, details: String) -> AnalysisError {
        AnalysisError::FileWriteError {
            path: self.output_path.clone(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_writer_success() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("notifications.jsonl");

        let writer = FileSystemWriter::new(output_path.clone());
        let mut file = writer.create().unwrap();
        file.write_all(b"{}\n").unwrap();
        file.flush().unwrap();

        assert_eq!(fs::read_to_string(&output_path).unwrap(), "{}\n");
    }

    #[test]
    fn test_file_writer_parent_directory_not_found() {
        let writer = FileSystemWriter::new(PathBuf::from("/nonexistent/directory/out.jsonl"));
        let err = writer.create().unwrap_err();
        assert!(err.to_string().contains("Parent directory does not exist"));
    }

    #[test]
    fn test_file_writer_rejects_directory() {
        let temp_dir = TempDir::new().unwrap();
        let writer = FileSystemWriter::new(temp_dir.path().to_path_buf());
        assert!(writer.create().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_writer_rejects_symlink() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("target.jsonl");
        let link = temp_dir.path().join("link.jsonl");
        fs::write(&target, "").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let err = FileSystemWriter::new(link).create().unwrap_err();
        assert!(err.to_string().contains("symbolic link"));
    }

    #[test]
    fn test_write_json_replaces_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("portfolio.json");
        fs::write(&path, "{\"stale\": true}").unwrap();

        FileSystemWriter::new(path.clone())
            .write_json(&serde_json::json!({ "associations": [] }))
            .unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, serde_json::json!({ "associations": [] }));
        assert!(!temp_dir.path().join(".portfolio.json.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_write_json_rejects_symlink() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("target.json");
        let link = temp_dir.path().join("link.json");
        fs::write(&target, "{}").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let err = FileSystemWriter::new(link)
            .write_json(&serde_json::json!({}))
            .unwrap_err();
        assert!(err.to_string().contains("symbolic link"));
        assert_eq!(fs::read_to_string(&target).unwrap(), "{}");
    }
}
