//! 比赛配置存储 - 业务能力层
//!
//! 比赛目录下的 `nowcoderac.json` 通过 [`ConfigStore`] 读写，会话本身不直接访问文件。

use crate::error::{AppError, AppResult, FileError};
use crate::models::ContestConfig;
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// 比赛配置的读写接口
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// 读取配置（不做业务校验）
    async fn load(&self) -> AppResult<ContestConfig>;

    /// 覆盖写入配置
    async fn save(&self, config: &ContestConfig) -> AppResult<()>;

    /// 存储位置，仅用于日志和提示
    fn location(&self) -> String;
}

/// 以 JSON 文件保存配置
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 比赛目录下的配置文件
    pub fn in_folder(folder: &Path, file_name: &str) -> Self {
        Self::new(folder.join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

/// 4 空格缩进的 JSON
fn to_pretty_json(config: &ContestConfig) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    config.serialize(&mut ser)?;
    Ok(buf)
}

#[async_trait]
impl ConfigStore for JsonFileStore {
    async fn load(&self) -> AppResult<ContestConfig> {
        let path = self.path.display().to_string();
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FileError::NotFound { path }.into());
            }
            Err(e) => return Err(AppError::file_read_failed(path, e)),
        };
        serde_json::from_str(&content)
            .map_err(|e| FileError::JsonParseFailed { path, source: e }.into())
    }

    async fn save(&self, config: &ContestConfig) -> AppResult<()> {
        let path = self.path.display().to_string();
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::file_write_failed(parent.display().to_string(), e))?;
        }
        let data = to_pretty_json(config)
            .map_err(|e| AppError::Other(format!("序列化配置失败: {}", e)))?;
        tokio::fs::write(&self.path, data)
            .await
            .map_err(|e| AppError::file_write_failed(path.clone(), e))?;
        debug!("💾 配置已保存: {}", path);
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// 内存中的配置，测试和临时会话使用
#[derive(Default)]
pub struct MemoryStore {
    config: Mutex<Option<ContestConfig>>,
    saves: Mutex<usize>,
}

impl MemoryStore {
    pub fn new(config: Option<ContestConfig>) -> Self {
        Self {
            config: Mutex::new(config),
            saves: Mutex::new(0),
        }
    }

    /// 当前保存的配置
    pub fn snapshot(&self) -> Option<ContestConfig> {
        self.config
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// 调用 save 的次数
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn load(&self) -> AppResult<ContestConfig> {
        self.snapshot().ok_or_else(|| {
            FileError::NotFound {
                path: self.location(),
            }
            .into()
        })
    }

    async fn save(&self, config: &ContestConfig) -> AppResult<()> {
        *self
            .config
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(config.clone());
        *self.saves.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Problem, ProblemInfo};

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "nowcoder-store-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[tokio::test]
    async fn test_json_file_round_trip() {
        let dir = temp_dir("roundtrip");
        let store = JsonFileStore::in_folder(&dir.join("contest"), "nowcoderac.json");

        let mut config = ContestConfig::new(12345);
        config.problems.push(Problem::new(ProblemInfo {
            index: "A".into(),
            title: "签到".into(),
            ..Default::default()
        }));
        store.save(&config).await.unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\n    \"contestId\": 12345"));

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, config);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let store = JsonFileStore::new(temp_dir("missing").join("nowcoderac.json"));
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, AppError::File(FileError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_memory_store_counts_saves() {
        let store = MemoryStore::default();
        assert!(store.load().await.is_err());
        store.save(&ContestConfig::new(1)).await.unwrap();
        store.save(&ContestConfig::new(2)).await.unwrap();
        assert_eq!(store.save_count(), 2);
        assert_eq!(store.load().await.unwrap().contest_id, 2);
    }
}
