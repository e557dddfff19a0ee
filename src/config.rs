use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::confetti::{CONFETTI_DURATION, ConfettiSettings, FRAMES_PER_SECOND, PARTICLE_COUNT};
use crate::models::DrawDuration;

/// 覆盖配置文件路径的环境变量
pub const CONFIG_ENV: &str = "CHOUQIAN_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("无法获取用户配置目录")]
    ConfigDirNotFound,
    #[error("读取配置文件失败: {0}")]
    Io(#[from] io::Error),
    #[error("配置文件格式错误: {0}")]
    Parse(#[from] toml::de::Error),
}

/// 配置文件结构 (config.toml)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub draw: DrawSection,
    pub confetti: ConfettiSection,
    pub log: LogSection,
    pub labels: Labels,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawSection {
    /// 启动时的抽签时长（秒）
    pub default_duration: f64,
}

impl Default for DrawSection {
    fn default() -> Self {
        Self {
            default_duration: DrawDuration::default().as_secs_f64(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfettiSection {
    pub particle_count: usize,
    pub duration_ms: u64,
    pub fps: u32,
}

impl Default for ConfettiSection {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT,
            duration_ms: CONFETTI_DURATION.as_millis() as u64,
            fps: FRAMES_PER_SECOND,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// 日志级别，RUST_LOG 优先
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// 界面文字
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub title: String,
    pub subtitle: String,
    pub input_placeholder: String,
    pub duration: String,
    pub options: String,
    pub empty_hint: String,
    pub result: String,
    pub start: String,
    pub drawing: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            title: "✨ 抽签器 ✨".to_string(),
            subtitle: "添加选项并开始抽签".to_string(),
            input_placeholder: "输入选项...".to_string(),
            duration: "抽签时间（秒）".to_string(),
            options: "选项列表".to_string(),
            empty_hint: "请添加至少两个选项开始抽签".to_string(),
            result: "🏆 抽签结果".to_string(),
            start: "开始抽签".to_string(),
            drawing: "抽签中...".to_string(),
        }
    }
}

impl Settings {
    /// 启动时长，非法值回退为默认
    pub fn draw_duration(&self) -> DrawDuration {
        DrawDuration::from_secs(self.draw.default_duration).unwrap_or_default()
    }

    pub fn confetti_settings(&self) -> ConfettiSettings {
        ConfettiSettings {
            particle_count: self.confetti.particle_count,
            duration: Duration::from_millis(self.confetti.duration_ms),
            fps: self.confetti.fps,
        }
    }
}

/// 配置文件路径 (~/.config/chouqian/config.toml)
pub fn settings_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }
    let dir = dirs::config_dir().ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(dir.join("chouqian").join("config.toml"))
}

/// 从TOML文件加载配置，文件不存在时使用默认值
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let content = fs::read_to_string(path)?;
    parse_settings(&content)
}

pub fn parse_settings(content: &str) -> Result<Settings, ConfigError> {
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = env::temp_dir().join("chouqian-test-missing").join("config.toml");
        let settings = load_settings(&path).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_tables_keep_defaults() {
        let settings = parse_settings(
            r#"
            [draw]
            default_duration = 1.5

            [labels]
            start = "Draw!"
            "#,
        )
        .unwrap();

        assert_eq!(settings.draw_duration().as_secs_f64(), 1.5);
        assert_eq!(settings.labels.start, "Draw!");
        assert_eq!(settings.labels.drawing, "抽签中...");
        assert_eq!(settings.confetti_settings(), ConfettiSettings::default());
        assert_eq!(settings.log.level, "info");
    }

    #[test]
    fn test_out_of_range_duration_is_clamped() {
        let settings = parse_settings("[draw]\ndefault_duration = 42.0\n").unwrap();
        assert_eq!(settings.draw_duration().as_secs_f64(), 10.0);
    }

    #[test]
    fn test_broken_file_is_an_error() {
        let err = parse_settings("[draw\ndefault_duration = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = parse_settings("[confetti]\nfps = \"fast\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = env::temp_dir().join(format!("chouqian-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[confetti]\nparticle_count = 40\nduration_ms = 1000\n").unwrap();

        let settings = load_settings(&path).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        let confetti = settings.confetti_settings();
        assert_eq!(confetti.particle_count, 40);
        assert_eq!(confetti.duration, Duration::from_secs(1));
        assert_eq!(confetti.fps, FRAMES_PER_SECOND);
    }
}
