// ErrorMap - インデックス付きエラーの集約
// 完了順に依存しない決定的な結合表示を提供

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use thiserror::Error;

/// 結合エラー内の区切り文字
const JOIN_SEPARATOR: &str = "\n";

/// 入力インデックスをキーとしたエラーの集約
///
/// キーは失敗したアイテムのインデックスと完全に一致する。
/// 表示（`Display`）は [`ErrorMap::join`] の結果と同一で、
/// インデックスの昇順に `"<index>: <message>"` を改行で連結したものになる。
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorMap<E> {
    errors: BTreeMap<usize, E>,
}

impl<E> ErrorMap<E> {
    pub fn new() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }

    /// エラーを登録（同じインデックスは上書き）
    pub fn insert(&mut self, index: usize, error: E) -> Option<E> {
        self.errors.insert(index, error)
    }

    pub fn get(&self, index: usize) -> Option<&E> {
        self.errors.get(&index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.errors.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// 失敗したインデックスを昇順で取得
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.errors.keys().copied()
    }

    /// (インデックス, エラー) を昇順で走査
    pub fn iter(&self) -> impl Iterator<Item = (usize, &E)> + '_ {
        self.errors.iter().map(|(index, error)| (*index, error))
    }

    pub fn into_inner(self) -> BTreeMap<usize, E> {
        self.errors
    }

    /// 全エラーを1つの複合エラーに結合
    ///
    /// 各エラーはインデックスで包まれ、昇順に並ぶ。
    pub fn join(self) -> JoinedError<E> {
        JoinedError {
            errors: self
                .errors
                .into_iter()
                .map(|(index, error)| IndexedError { index, error })
                .collect(),
        }
    }
}

impl<E> Default for ErrorMap<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> FromIterator<(usize, E)> for ErrorMap<E> {
    fn from_iter<T: IntoIterator<Item = (usize, E)>>(iter: T) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl<E> IntoIterator for ErrorMap<E> {
    type Item = (usize, E);
    type IntoIter = btree_map::IntoIter<usize, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<E: fmt::Display> fmt::Display for ErrorMap<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(
            f,
            self.errors.iter().map(|(index, error)| (*index, error)),
        )
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for ErrorMap<E> {}

/// インデックスで包まれた単一エラー
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{index}: {error}")]
pub struct IndexedError<E> {
    pub index: usize,
    pub error: E,
}

/// [`ErrorMap::join`] が返す複合エラー
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedError<E> {
    errors: Vec<IndexedError<E>>,
}

impl<E> JoinedError<E> {
    /// 包まれたエラーをインデックス昇順で取得
    pub fn errors(&self) -> &[IndexedError<E>] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<IndexedError<E>> {
        self.errors
    }
}

impl<E: fmt::Display> fmt::Display for JoinedError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(
            f,
            self.errors
                .iter()
                .map(|indexed| (indexed.index, &indexed.error)),
        )
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for JoinedError<E> {}

// ErrorMapとJoinedErrorで表示を共有する
fn write_joined<'a, E, I>(f: &mut fmt::Formatter<'_>, entries: I) -> fmt::Result
where
    E: fmt::Display + 'a,
    I: Iterator<Item = (usize, &'a E)>,
{
    for (position, (index, error)) in entries.enumerate() {
        if position > 0 {
            f.write_str(JOIN_SEPARATOR)?;
        }
        write!(f, "{index}: {error}")?;
    }
    Ok(())
}
