use crate::utils::error::{RelayError, Result};
use std::path::{Path, PathBuf};

/// 從目前目錄往上尋找 `.env` 並載入；找不到不算錯誤。已存在的環境變數不會被覆蓋
pub fn load_dotenv() -> Result<Option<PathBuf>> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(dotenv_error(".env", e)),
    }
}

/// 載入指定的 env 檔案，回傳是否有載入
pub fn load_env_file<P: AsRef<Path>>(path: P) -> Result<bool> {
    let path = path.as_ref();
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(dotenv_error(&path.display().to_string(), e)),
    }
}

fn dotenv_error(source: &str, e: dotenvy::Error) -> RelayError {
    RelayError::ConfigError {
        message: format!("Failed to load {}: {}", source, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_missing_env_file_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(!load_env_file(dir.path().join(".env")).unwrap());
    }

    #[test]
    fn test_env_file_values_are_exported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "# relay settings").unwrap();
        writeln!(file, "MOCKUP_RELAY_ENV_FILE_TEST_KEY=from-env-file").unwrap();

        assert!(load_env_file(&path).unwrap());
        assert_eq!(
            std::env::var("MOCKUP_RELAY_ENV_FILE_TEST_KEY").unwrap(),
            "from-env-file"
        );
        std::env::remove_var("MOCKUP_RELAY_ENV_FILE_TEST_KEY");
    }

    #[test]
    fn test_malformed_env_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "NOT A VALID LINE\n").unwrap();

        assert!(matches!(
            load_env_file(&path),
            Err(RelayError::ConfigError { .. })
        ));
    }
}
