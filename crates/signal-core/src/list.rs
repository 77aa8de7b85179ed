//! FrozenList - freeze 可能な順序付きコレクション
//!
//! # 学習ポイント
//! - enum による状態表現（`Mutable(Vec<T>)` / `Frozen(Box<[T]>)`）
//! - 変更系メソッドは `Mutable` 側からしか到達できない
//! - 失敗時は何も変更しない（atomic no-op）
//!
//! # 状態遷移
//! - mutable → frozen の一方向のみ（1 回だけ、戻らない）

use std::fmt;

use crate::error::SignalError;

enum Items<T> {
    Mutable(Vec<T>),
    Frozen(Box<[T]>),
}

/// FrozenList は「構築中は可変、freeze 後は不変」な列
///
/// # 使用例
/// ```ignore
/// let mut list = FrozenList::new();
/// list.push(1)?;
/// list.freeze();
/// assert!(list.push(2).is_err());
/// ```
pub struct FrozenList<T> {
    items: Items<T>,
}

impl<T> FrozenList<T> {
    pub fn new() -> Self {
        Self {
            items: Items::Mutable(Vec::new()),
        }
    }

    pub fn with_items(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: Items::Mutable(items.into_iter().collect()),
        }
    }

    /// Lock the list. Calling it again is a no-op.
    pub fn freeze(&mut self) {
        if let Items::Mutable(items) = &mut self.items {
            let items = std::mem::take(items);
            self.items = Items::Frozen(items.into_boxed_slice());
        }
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self.items, Items::Frozen(_))
    }

    fn items_mut(&mut self) -> Result<&mut Vec<T>, SignalError> {
        match &mut self.items {
            Items::Mutable(items) => Ok(items),
            Items::Frozen(_) => Err(SignalError::Frozen),
        }
    }

    /// index が `[0, len)` に入っていることを確認した上で可変参照を返す
    fn items_mut_at(&mut self, index: usize) -> Result<&mut Vec<T>, SignalError> {
        let items = self.items_mut()?;
        if index >= items.len() {
            return Err(SignalError::IndexOutOfRange {
                index,
                len: items.len(),
            });
        }
        Ok(items)
    }

    // ────────────────────────────────────────────────────────────────────────
    // 変更系（frozen なら SignalError::Frozen）
    // ────────────────────────────────────────────────────────────────────────

    pub fn push(&mut self, item: T) -> Result<(), SignalError> {
        self.items_mut()?.push(item);
        Ok(())
    }

    /// `index == len` is allowed and appends.
    pub fn insert(&mut self, index: usize, item: T) -> Result<(), SignalError> {
        let items = self.items_mut()?;
        if index > items.len() {
            return Err(SignalError::IndexOutOfRange {
                index,
                len: items.len(),
            });
        }
        items.insert(index, item);
        Ok(())
    }

    pub fn extend(&mut self, iter: impl IntoIterator<Item = T>) -> Result<(), SignalError> {
        self.items_mut()?.extend(iter);
        Ok(())
    }

    pub fn remove_at(&mut self, index: usize) -> Result<T, SignalError> {
        Ok(self.items_mut_at(index)?.remove(index))
    }

    pub fn pop(&mut self) -> Result<Option<T>, SignalError> {
        Ok(self.items_mut()?.pop())
    }

    pub fn clear(&mut self) -> Result<(), SignalError> {
        self.items_mut()?.clear();
        Ok(())
    }

    pub fn reverse(&mut self) -> Result<(), SignalError> {
        self.items_mut()?.reverse();
        Ok(())
    }

    /// Replace the item at `index`, returning the previous one.
    pub fn set(&mut self, index: usize, item: T) -> Result<T, SignalError> {
        let items = self.items_mut_at(index)?;
        Ok(std::mem::replace(&mut items[index], item))
    }

    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), SignalError> {
        let items = self.items_mut_at(a.max(b))?;
        items.swap(a, b);
        Ok(())
    }

    pub fn retain(&mut self, f: impl FnMut(&T) -> bool) -> Result<(), SignalError> {
        self.items_mut()?.retain(f);
        Ok(())
    }

    // ────────────────────────────────────────────────────────────────────────
    // 参照系（常に可能）
    // ────────────────────────────────────────────────────────────────────────

    pub fn as_slice(&self) -> &[T] {
        match &self.items {
            Items::Mutable(items) => items.as_slice(),
            Items::Frozen(items) => &items[..],
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    pub fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn position(&self, pred: impl FnMut(&T) -> bool) -> Option<usize> {
        self.iter().position(pred)
    }
}

impl<T: PartialEq> FrozenList<T> {
    pub fn contains(&self, item: &T) -> bool {
        self.as_slice().contains(item)
    }
}

impl<T> Default for FrozenList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for FrozenList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::with_items(iter)
    }
}

impl<'a, T> IntoIterator for &'a FrozenList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// frozen かどうかは比較しない（中身だけ）
impl<T: PartialEq> PartialEq for FrozenList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for FrozenList<T> {}

impl<T: fmt::Debug> fmt::Debug for FrozenList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<FrozenList frozen={} {:?}>",
            self.is_frozen(),
            self.as_slice()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn frozen_123() -> FrozenList<i32> {
        let mut list = FrozenList::with_items([1, 2, 3]);
        list.freeze();
        list
    }

    #[test]
    fn new_list_is_mutable_and_empty() {
        let list: FrozenList<i32> = FrozenList::new();
        assert!(!list.is_frozen());
        assert!(list.is_empty());
    }

    #[test]
    fn mutations_before_freeze() {
        let mut list = FrozenList::new();
        list.push(1).unwrap();
        list.extend([2, 3]).unwrap();
        list.insert(0, 0).unwrap();
        assert_eq!(list.as_slice(), &[0, 1, 2, 3]);

        assert_eq!(list.remove_at(1).unwrap(), 1);
        assert_eq!(list.pop().unwrap(), Some(3));
        assert_eq!(list.set(0, 10).unwrap(), 0);
        list.reverse().unwrap();
        assert_eq!(list.as_slice(), &[2, 10]);

        list.swap(0, 1).unwrap();
        list.retain(|x| *x > 5).unwrap();
        assert_eq!(list.as_slice(), &[10]);

        list.clear().unwrap();
        assert!(list.is_empty());
    }

    #[rstest]
    #[case::push(|l: &mut FrozenList<i32>| l.push(4))]
    #[case::insert(|l: &mut FrozenList<i32>| l.insert(0, 4))]
    #[case::extend(|l: &mut FrozenList<i32>| l.extend([4, 5]))]
    #[case::remove_at(|l: &mut FrozenList<i32>| l.remove_at(0).map(|_| ()))]
    #[case::pop(|l: &mut FrozenList<i32>| l.pop().map(|_| ()))]
    #[case::clear(|l: &mut FrozenList<i32>| l.clear())]
    #[case::reverse(|l: &mut FrozenList<i32>| l.reverse())]
    #[case::set(|l: &mut FrozenList<i32>| l.set(1, 9).map(|_| ()))]
    #[case::swap(|l: &mut FrozenList<i32>| l.swap(0, 2))]
    #[case::retain(|l: &mut FrozenList<i32>| l.retain(|_| false))]
    fn frozen_list_rejects_mutation(
        #[case] op: fn(&mut FrozenList<i32>) -> Result<(), SignalError>,
    ) {
        let mut list = frozen_123();
        assert_eq!(op(&mut list), Err(SignalError::Frozen));
        assert_eq!(list.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn frozen_error_wins_over_index_error() {
        let mut list = frozen_123();
        assert_eq!(list.remove_at(99), Err(SignalError::Frozen));
    }

    #[test]
    fn out_of_range_leaves_list_untouched() {
        let mut list = FrozenList::with_items([1, 2]);
        assert_eq!(
            list.insert(3, 9),
            Err(SignalError::IndexOutOfRange { index: 3, len: 2 })
        );
        assert_eq!(
            list.remove_at(2),
            Err(SignalError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            list.swap(0, 5),
            Err(SignalError::IndexOutOfRange { index: 5, len: 2 })
        );
        assert_eq!(list.as_slice(), &[1, 2]);

        // len ちょうどへの insert は append
        list.insert(2, 3).unwrap();
        assert_eq!(list.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn freeze_is_idempotent() {
        let mut list = frozen_123();
        list.freeze();
        assert!(list.is_frozen());
        assert_eq!(list.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn reads_work_after_freeze() {
        let list = frozen_123();
        assert_eq!(list.len(), 3);
        assert_eq!(list.get(1), Some(&2));
        assert_eq!(list.first(), Some(&1));
        assert_eq!(list.last(), Some(&3));
        assert!(list.contains(&3));
        assert_eq!(list.position(|x| *x == 2), Some(1));
        assert_eq!((&list).into_iter().sum::<i32>(), 6);
    }

    #[test]
    fn equality_ignores_frozen_state() {
        let mutable: FrozenList<i32> = [1, 2, 3].into_iter().collect();
        assert_eq!(mutable, frozen_123());
    }

    #[test]
    fn debug_shows_frozen_state_and_items() {
        let mut list = FrozenList::with_items([1, 2]);
        assert_eq!(format!("{list:?}"), "<FrozenList frozen=false [1, 2]>");
        list.freeze();
        assert_eq!(format!("{list:?}"), "<FrozenList frozen=true [1, 2]>");
    }
}
