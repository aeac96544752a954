//! 启动选项与日志配置

use config::{Config, ConfigBuilder, Environment, File};
use infrastructure_common::{CompositionError, CompositionResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 默认配置文件（不含扩展名）
pub const DEFAULT_CONFIG_FILE: &str = "config/composition";

/// 环境变量前缀
pub const ENV_PREFIX: &str = "COMPOSITION";

/// 启动选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapOptions {
    /// 没有显式提供制品时是否从静态类型表发现
    pub scan_default_artifacts: bool,
    /// 是否加入内置默认组件
    pub register_builtin_defaults: bool,
    /// 日志配置，设置后在启动时初始化日志
    pub logging: Option<LoggingConfig>,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            scan_default_artifacts: true,
            register_builtin_defaults: true,
            logging: None,
        }
    }
}

impl BootstrapOptions {
    /// 从默认配置文件（可选）和环境变量加载
    ///
    /// 环境变量形如 `COMPOSITION_SCAN_DEFAULT_ARTIFACTS=false`，
    /// 嵌套字段使用双下划线：`COMPOSITION_LOGGING__LEVEL=debug`
    pub fn load() -> CompositionResult<Self> {
        Self::from_builder(
            Config::builder().add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        )
    }

    /// 从指定文件加载，环境变量仍然覆盖文件
    pub fn from_file(path: impl AsRef<Path>) -> CompositionResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CompositionError::Configuration {
                message: format!("配置文件不存在: {}", path.display()),
            });
        }

        info!("加载启动配置: {}", path.display());
        Self::from_builder(Config::builder().add_source(File::from(path)))
    }

    fn from_builder(builder: ConfigBuilder<config::builder::DefaultState>) -> CompositionResult<Self> {
        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|e| CompositionError::Configuration {
                message: format!("读取启动配置失败: {}", e),
            })
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别或过滤表达式，例如 `info`、`infrastructure_composition=debug`
    pub level: String,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }

    /// 初始化全局日志
    ///
    /// 已经存在全局订阅者时返回 `false`，不视为错误
    pub fn init(&self) -> CompositionResult<bool> {
        let filter = EnvFilter::try_new(&self.level).map_err(|e| CompositionError::Configuration {
            message: format!("无效的日志级别 {}: {}", self.level, e),
        })?;

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(self.show_target)
            .with_thread_ids(self.show_thread_ids)
            .with_file(self.show_file)
            .with_line_number(self.show_line_number);

        let installed = if self.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        }
        .is_ok();

        if installed {
            info!("日志系统初始化完成");
        }
        Ok(installed)
    }
}
