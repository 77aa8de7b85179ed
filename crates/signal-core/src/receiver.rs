//! Receiver - signal に接続される非同期ハンドラ
//!
//! # 学習ポイント
//! - ジェネリック async trait (`Receiver<A, E>`)
//! - `Arc<dyn Receiver<A, E>>` での型消去と同一性（`Arc::ptr_eq`）
//! - クロージャ → trait object のアダプタ（`FnReceiver`）

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::HandlerError;

/// Receiver は send() の引数を受け取って非同期に処理する
///
/// # 使用例
/// ```ignore
/// struct Audit;
///
/// #[async_trait]
/// impl Receiver<Request> for Audit {
///     async fn receive(&self, req: &Request) -> Result<(), HandlerError> {
///         println!("request: {}", req.path);
///         Ok(())
///     }
/// }
/// ```
///
/// # 引数の形
/// - `A` は呼び出し側が渡す型そのもの（可変長引数が欲しければ `Args` を使う）
/// - 戻り値は使われない。失敗は `Err(E)` でそのまま送信元に返る
#[async_trait]
pub trait Receiver<A: ?Sized, E = HandlerError>: Send + Sync {
    async fn receive(&self, args: &A) -> Result<(), E>;

    /// Debug 表示用の名前
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Signal に格納される receiver の値
pub type ReceiverRef<A, E = HandlerError> = Arc<dyn Receiver<A, E>>;

/// Async closure adapter.
///
/// The closure takes the arguments by value, so each receiver gets its own clone.
pub struct FnReceiver<F, A, E> {
    name: String,
    f: F,
    _marker: PhantomData<fn(A) -> E>,
}

impl<F, A, E> FnReceiver<F, A, E> {
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<F, Fut, A, E> Receiver<A, E> for FnReceiver<F, A, E>
where
    F: Fn(A) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), E>> + Send,
    A: Clone + Send + Sync,
{
    async fn receive(&self, args: &A) -> Result<(), E> {
        (self.f)(args.clone()).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// クロージャから `ReceiverRef` を作る
pub fn receiver_fn<F, Fut, A, E>(name: impl Into<String>, f: F) -> ReceiverRef<A, E>
where
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    A: Clone + Send + Sync + 'static,
    E: 'static,
{
    Arc::new(FnReceiver::new(name, f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter {
        total: AtomicUsize,
    }

    #[async_trait]
    impl Receiver<usize> for Counter {
        async fn receive(&self, n: &usize) -> Result<(), HandlerError> {
            self.total.fetch_add(*n, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn struct_receiver_gets_borrowed_args() {
        let counter = Counter {
            total: AtomicUsize::new(0),
        };
        counter.receive(&3).await.unwrap();
        counter.receive(&4).await.unwrap();
        assert_eq!(counter.total.load(Ordering::SeqCst), 7);
        assert!(counter.name().ends_with("Counter"));
    }

    #[tokio::test]
    async fn fn_receiver_uses_given_name_and_propagates_error() {
        let r: ReceiverRef<String> = receiver_fn("reject", |s: String| async move {
            Err(HandlerError::failed(format!("rejected {s}")))
        });

        assert_eq!(r.name(), "reject");
        let err = r.receive(&"ping".to_string()).await.unwrap_err();
        assert_eq!(err.to_string(), "rejected ping");
    }
}
