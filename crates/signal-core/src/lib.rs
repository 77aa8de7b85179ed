//! signal-core
//!
//! Freeze 可能な非同期 signal（receiver の列 + 逐次 send）。
//!
//! # モジュール構成
//! - **list**: `FrozenList<T>` - 構築中は可変、freeze 後は不変な列
//! - **receiver**: `Receiver<A, E>` trait とクロージャ用アダプタ
//! - **signal**: `Signal<A, E>` - receiver を登録順に 1 つずつ await する
//! - **args**: `Args` - 位置引数 + キーワード引数（JSON 値）
//! - **error**: `SignalError` / `HandlerError` / `ArgsError`

pub mod args;
pub mod error;
pub mod list;
pub mod receiver;
pub mod signal;

pub use self::args::Args;
pub use self::error::{ArgsError, HandlerError, SignalError};
pub use self::list::FrozenList;
pub use self::receiver::{FnReceiver, Receiver, ReceiverRef, receiver_fn};
pub use self::signal::Signal;
