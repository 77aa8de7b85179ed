//! Signal - freeze 可能な receiver 列と逐次 send
//!
//! # 学習ポイント
//! - `FrozenList<ReceiverRef>` の上に薄く載せる（変更系は委譲するだけ）
//! - `E: From<SignalError>` で「未 freeze」も receiver のエラー型に載せる
//! - `?` で最初の失敗をそのまま返す（残りの receiver は呼ばない）
//!
//! # 利用上の約束
//! - 変更は `&mut Signal`、送信は `&Signal` なので、送信中の変更は借用チェッカーが弾く
//! - 内部ロックは持たない。タスクをまたいで共有するなら freeze 後に `Arc<Signal>` で渡す
//! - `send()` の future を drop すると、実行中の receiver もそこでキャンセルされる

use std::fmt;
use std::sync::Arc;

use crate::error::{HandlerError, SignalError};
use crate::list::FrozenList;
use crate::receiver::{FnReceiver, Receiver, ReceiverRef};

/// Signal は owner が持つ receiver の列
///
/// # ライフサイクル
/// 1. `Signal::new(&owner)` で空・可変の状態で作る
/// 2. `connect()` などで receiver を追加する
/// 3. `freeze()` で不変にする
/// 4. `send()` で全 receiver を登録順に 1 つずつ await する
///
/// # 使用例
/// ```ignore
/// let mut on_startup: Signal<Args> = Signal::new(&app_name);
/// on_startup.connect_fn("warm_cache", |args: Args| async move { Ok(()) })?;
/// on_startup.freeze();
/// on_startup.send(&Args::new().arg(1)).await?;
/// ```
pub struct Signal<A, E = HandlerError> {
    owner: String,
    receivers: FrozenList<ReceiverRef<A, E>>,
}

impl<A, E> Signal<A, E> {
    /// The owner is only kept in its `Debug` form, for display.
    pub fn new(owner: &impl fmt::Debug) -> Self {
        Self {
            owner: format!("{owner:?}"),
            receivers: FrozenList::new(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn freeze(&mut self) {
        if !self.receivers.is_frozen() {
            tracing::debug!(owner = %self.owner, receivers = self.receivers.len(), "signal frozen");
        }
        self.receivers.freeze();
    }

    pub fn is_frozen(&self) -> bool {
        self.receivers.is_frozen()
    }

    /// Send `args` to every receiver, in the order they were connected.
    ///
    /// Each receiver is awaited to completion before the next one starts.
    /// The first receiver error is returned as is and the remaining receivers
    /// are skipped. Fails with `SignalError::NotFrozen` (converted into `E`)
    /// before running anything if the signal has not been frozen.
    pub async fn send(&self, args: &A) -> Result<(), E>
    where
        E: From<SignalError>,
    {
        if !self.is_frozen() {
            return Err(SignalError::NotFrozen.into());
        }

        tracing::debug!(owner = %self.owner, receivers = self.receivers.len(), "sending signal");
        for (index, receiver) in self.receivers.iter().enumerate() {
            tracing::trace!(index, receiver = receiver.name(), "invoking receiver");
            receiver.receive(args).await?;
        }
        Ok(())
    }

    // ────────────────────────────────────────────────────────────────────────
    // 変更系（frozen なら SignalError::Frozen）
    // ────────────────────────────────────────────────────────────────────────

    /// Append a receiver.
    pub fn connect(&mut self, receiver: ReceiverRef<A, E>) -> Result<(), SignalError> {
        self.receivers.push(receiver)
    }

    /// Append an async closure as a receiver and return its handle
    /// (usable with `disconnect`).
    pub fn connect_fn<F, Fut>(
        &mut self,
        name: impl Into<String>,
        f: F,
    ) -> Result<ReceiverRef<A, E>, SignalError>
    where
        A: Clone + Send + Sync + 'static,
        E: 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), E>> + Send + 'static,
    {
        let receiver: ReceiverRef<A, E> = Arc::new(FnReceiver::new(name, f));
        self.connect(Arc::clone(&receiver))?;
        Ok(receiver)
    }

    pub fn insert(&mut self, index: usize, receiver: ReceiverRef<A, E>) -> Result<(), SignalError> {
        self.receivers.insert(index, receiver)
    }

    pub fn extend(
        &mut self,
        receivers: impl IntoIterator<Item = ReceiverRef<A, E>>,
    ) -> Result<(), SignalError> {
        self.receivers.extend(receivers)
    }

    /// Remove the first entry that is the same `Arc` as `receiver`.
    pub fn disconnect(&mut self, receiver: &ReceiverRef<A, E>) -> Result<(), SignalError> {
        if self.receivers.is_frozen() {
            return Err(SignalError::Frozen);
        }
        let index = self
            .position_of(receiver)
            .ok_or(SignalError::NotConnected)?;
        self.receivers.remove_at(index)?;
        Ok(())
    }

    pub fn remove_at(&mut self, index: usize) -> Result<ReceiverRef<A, E>, SignalError> {
        self.receivers.remove_at(index)
    }

    pub fn pop(&mut self) -> Result<Option<ReceiverRef<A, E>>, SignalError> {
        self.receivers.pop()
    }

    pub fn clear(&mut self) -> Result<(), SignalError> {
        self.receivers.clear()
    }

    pub fn reverse(&mut self) -> Result<(), SignalError> {
        self.receivers.reverse()
    }

    pub fn set(
        &mut self,
        index: usize,
        receiver: ReceiverRef<A, E>,
    ) -> Result<ReceiverRef<A, E>, SignalError> {
        self.receivers.set(index, receiver)
    }

    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), SignalError> {
        self.receivers.swap(a, b)
    }

    pub fn retain(
        &mut self,
        f: impl FnMut(&ReceiverRef<A, E>) -> bool,
    ) -> Result<(), SignalError> {
        self.receivers.retain(f)
    }

    // ────────────────────────────────────────────────────────────────────────
    // 参照系
    // ────────────────────────────────────────────────────────────────────────

    pub fn receivers(&self) -> &FrozenList<ReceiverRef<A, E>> {
        &self.receivers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReceiverRef<A, E>> {
        self.receivers.iter()
    }

    pub fn len(&self) -> usize {
        self.receivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receivers.is_empty()
    }

    pub fn contains(&self, receiver: &ReceiverRef<A, E>) -> bool {
        self.position_of(receiver).is_some()
    }

    fn position_of(&self, receiver: &ReceiverRef<A, E>) -> Option<usize> {
        self.receivers.position(|r| Arc::ptr_eq(r, receiver))
    }
}

impl<A, E> fmt::Debug for Signal<A, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.receivers.iter().map(|r| r.name()).collect();
        write!(
            f,
            "<Signal owner={}, frozen={}, {:?}>",
            self.owner,
            self.receivers.is_frozen(),
            names
        )
    }
}
