//! 错误类型定义

use thiserror::Error;

/// 组件自身抛出的错误（初始化、拦截器、被拦截的方法等）
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 依赖注入错误类型
///
/// 由容器能力接口产生
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("组件未注册: {type_name}{}", display_name(.name))]
    ComponentNotRegistered { type_name: String, name: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ComponentCreationFailed {
        type_name: String,
        source: BoxError,
    },

    #[error("类型转换失败: 期望 {expected}, 实际 {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("组件已注册: {type_name}{}", display_name(.name))]
    AlreadyRegistered { type_name: String, name: String },

    #[error("容器已封闭，不能再注册: {type_name}")]
    ContainerSealed { type_name: String },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("组件注册失败: {type_name}, 原因: {message}")]
    RegistrationError { type_name: String, message: String },
}

impl DependencyError {
    /// 创建未注册错误
    pub fn not_registered(type_name: impl Into<String>, name: Option<&str>) -> Self {
        Self::ComponentNotRegistered {
            type_name: type_name.into(),
            name: name.unwrap_or_default().to_string(),
        }
    }

    /// 创建组件创建失败错误
    pub fn creation_failed(type_name: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::ComponentCreationFailed {
            type_name: type_name.into(),
            source: source.into(),
        }
    }
}

fn display_name(name: &str) -> String {
    if name.is_empty() {
        String::new()
    } else {
        format!("|{}", name)
    }
}

/// 组合内核错误类型
///
/// 由启动协调器和拦截管道产生
#[derive(Error, Debug)]
pub enum CompositionError {
    #[error("启动器当前状态为 {state}，不能执行: {operation}")]
    InvalidState { state: String, operation: String },

    #[error("组件描述缺少契约类型和实现类型")]
    ContractRequired,

    #[error("契约类型 {contract} 缺少实现类型或实例")]
    ImplementationRequired { contract: String },

    #[error("契约类型不匹配: 声明为 {contract}, 实现提供的是 {provided}")]
    ContractMismatch { contract: String, provided: String },

    #[error("依赖注入错误: {source}")]
    Dependency {
        #[from]
        source: DependencyError,
    },

    #[error("组件初始化失败: {component}, 原因: {source}")]
    InitializationFailure { component: String, source: BoxError },

    #[error("拦截器链构建失败: {operation}, 拦截器: {interceptor}, 原因: {source}")]
    InterceptorChain {
        operation: String,
        interceptor: String,
        source: BoxError,
    },

    #[error("组件发现失败: {message}")]
    ArtifactDiscovery { message: String },

    #[error("配置错误: {message}")]
    Configuration { message: String },
}

impl CompositionError {
    /// 创建状态错误
    pub fn invalid_state(state: impl ToString, operation: impl Into<String>) -> Self {
        Self::InvalidState {
            state: state.to_string(),
            operation: operation.into(),
        }
    }
}

/// 结果类型别名
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type CompositionResult<T> = Result<T, CompositionError>;
