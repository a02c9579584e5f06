//! 설정 디렉토리
//!
//! - 글로벌: `~/.config/tablero/`
//! - 프로젝트: `<root>/.tablero/` (설정 파일 + CLI 세션 저장소)

use crate::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const GLOBAL_DIR: &str = "tablero";
const PROJECT_DIR: &str = ".tablero";

/// 설정 파일이 놓이는 디렉토리
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDir {
    dir: PathBuf,
}

impl ConfigDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn global() -> Result<Self> {
        let dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Cannot find config directory".to_string()))?;
        Ok(Self::new(dir.join(GLOBAL_DIR)))
    }

    pub fn project(root: impl AsRef<Path>) -> Self {
        Self::new(root.as_ref().join(PROJECT_DIR))
    }

    /// 현재 작업 디렉토리 기준 프로젝트 디렉토리
    pub fn current_project() -> Result<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| Error::Config(format!("Cannot get current directory: {}", e)))?;
        Ok(Self::project(cwd))
    }

    pub fn path(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// 파일이 없으면 `Ok(None)`, 읽기/파싱 실패는 `Error::Config`
    pub fn read<T: DeserializeOwned>(&self, filename: &str) -> Result<Option<T>> {
        let path = self.path(filename);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::Config(format!("Failed to read {}: {}", path.display(), e)))
            }
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// pretty JSON으로 쓰고 경로를 돌려준다. 디렉토리는 필요하면 만든다.
    pub fn write<T: Serialize>(&self, filename: &str, data: &T) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            Error::Config(format!("Failed to create {}: {}", self.dir.display(), e))
        })?;
        let path = self.path(filename);
        let content = serde_json::to_string_pretty(data)?;
        std::fs::write(&path, content)
            .map_err(|e| Error::Config(format!("Failed to write {}: {}", path.display(), e)))?;
        Ok(path)
    }
}
