//! Errors - signal / list / args のエラー型
//!
//! # 分類
//! - `SignalError`: 状態遷移の契約違反（frozen 後の変更、未 freeze での送信など）
//! - `HandlerError`: 独自のエラー型を持たない receiver 向けの既定エラー
//! - `ArgsError`: `Args` からの取り出し・デコード失敗

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    /// freeze 済みの list / signal を変更しようとした
    #[error("cannot modify frozen list")]
    Frozen,

    /// freeze 前に send しようとした
    #[error("cannot send non-frozen signal")]
    NotFrozen,

    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("receiver is not connected to this signal")]
    NotConnected,
}

/// HandlerError は receiver の既定エラー型
///
/// `Signal<A>` の `E` を省略するとこの型になります。
/// `From<SignalError>` を実装しているので `send()` の `NotFrozen` もそのまま載ります。
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Signal(#[from] SignalError),

    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl HandlerError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

#[derive(Debug, Error)]
pub enum ArgsError {
    #[error("missing positional argument at index {0}")]
    MissingPositional(usize),

    #[error("missing keyword argument '{0}'")]
    MissingKeyword(String),

    #[error("json decode: {0}")]
    Decode(#[from] serde_json::Error),
}
