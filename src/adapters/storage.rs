use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_file_relative_to_base_path() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("providers.json"), b"[]").unwrap();

        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
        assert_eq!(storage.read_file("providers.json").await.unwrap(), b"[]");

        let err = storage.read_file("missing.json").await.unwrap_err();
        assert!(matches!(
            err,
            crate::utils::error::AssistantError::IoError(ref e)
                if e.kind() == std::io::ErrorKind::NotFound
        ));
    }
}
