//! 内置序列化组件
//!
//! 对象安全的序列化接口基于 `serde_json::Value`，
//! 通过扩展 trait 提供强类型的便捷方法。

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// 文本序列化器
pub trait TextSerializer: Send + Sync {
    /// 序列化为文本
    fn serialize(&self, value: &Value) -> serde_json::Result<String>;

    /// 从文本反序列化
    fn deserialize(&self, text: &str) -> serde_json::Result<Value>;
}

/// 二进制序列化器
pub trait BinarySerializer: Send + Sync {
    /// 序列化为字节
    fn serialize(&self, value: &Value) -> serde_json::Result<Vec<u8>>;

    /// 从字节反序列化
    fn deserialize(&self, bytes: &[u8]) -> serde_json::Result<Value>;
}

/// 文本序列化器的强类型扩展
pub trait TextSerializerExt: TextSerializer {
    /// 序列化任意可序列化类型
    fn serialize_as<T: Serialize + ?Sized>(&self, value: &T) -> serde_json::Result<String> {
        self.serialize(&serde_json::to_value(value)?)
    }

    /// 反序列化为指定类型
    fn deserialize_as<T: DeserializeOwned>(&self, text: &str) -> serde_json::Result<T> {
        serde_json::from_value(self.deserialize(text)?)
    }
}

impl<S: TextSerializer + ?Sized> TextSerializerExt for S {}

/// 二进制序列化器的强类型扩展
pub trait BinarySerializerExt: BinarySerializer {
    /// 序列化任意可序列化类型
    fn serialize_as<T: Serialize + ?Sized>(&self, value: &T) -> serde_json::Result<Vec<u8>> {
        self.serialize(&serde_json::to_value(value)?)
    }

    /// 反序列化为指定类型
    fn deserialize_as<T: DeserializeOwned>(&self, bytes: &[u8]) -> serde_json::Result<T> {
        serde_json::from_value(self.deserialize(bytes)?)
    }
}

impl<S: BinarySerializer + ?Sized> BinarySerializerExt for S {}

/// JSON 文本序列化器
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonTextSerializer {
    pretty: bool,
}

impl JsonTextSerializer {
    /// 紧凑输出
    pub fn new() -> Self {
        Self::default()
    }

    /// 带缩进的输出
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl TextSerializer for JsonTextSerializer {
    fn serialize(&self, value: &Value) -> serde_json::Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
    }

    fn deserialize(&self, text: &str) -> serde_json::Result<Value> {
        serde_json::from_str(text)
    }
}

/// JSON 二进制序列化器（UTF-8 字节）
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonBinarySerializer;

impl BinarySerializer for JsonBinarySerializer {
    fn serialize(&self, value: &Value) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(value)
    }

    fn deserialize(&self, bytes: &[u8]) -> serde_json::Result<Value> {
        serde_json::from_slice(bytes)
    }
}
