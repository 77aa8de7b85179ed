//! Args - 位置引数 + キーワード引数を JSON 値で運ぶ
//!
//! 引数の形を型で決めたくない signal 用。
//! 型が決まっている場合は `Signal<MyEvent>` のように直接その型を使えばよい。

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ArgsError;

/// Args は send() にそのまま渡される引数の組
///
/// # 使用例
/// ```ignore
/// let args = Args::new().arg(1).arg(2).kwarg("key", "v");
/// signal.send(&args).await?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Args {
    #[serde(default)]
    positional: Vec<Value>,
    #[serde(default)]
    keywords: BTreeMap<String, Value>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keywords.insert(key.into(), value.into());
        self
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn keywords(&self) -> &BTreeMap<String, Value> {
        &self.keywords
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    pub fn keyword(&self, key: &str) -> Option<&Value> {
        self.keywords.get(key)
    }

    pub fn decode<T: DeserializeOwned>(&self, index: usize) -> Result<T, ArgsError> {
        let value = self
            .get(index)
            .ok_or(ArgsError::MissingPositional(index))?;
        Ok(T::deserialize(value)?)
    }

    pub fn decode_keyword<T: DeserializeOwned>(&self, key: &str) -> Result<T, ArgsError> {
        let value = self
            .keyword(key)
            .ok_or_else(|| ArgsError::MissingKeyword(key.to_string()))?;
        Ok(T::deserialize(value)?)
    }
}
