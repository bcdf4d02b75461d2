//! Key-value storage error types.

use thiserror::Error;

/// Errors that can occur reading or writing the key-value store.
///
/// None of these are fatal: callers log them and keep their in-memory state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The storage location could not be determined or created.
    #[error("保存先が利用できません: {0}")]
    Unavailable(String),

    /// Reading a stored value failed.
    #[error("保存データの読み込みに失敗しました: {0}")]
    ReadFailed(String),

    /// Writing a value failed (e.g. disk full, permission denied).
    #[error("保存データの書き込みに失敗しました: {0}")]
    WriteFailed(String),

    /// The key contains characters that cannot be stored.
    #[error("無効なキーです: {0}")]
    InvalidKey(String),
}

impl StorageError {
    /// Returns true if this error happened while writing.
    #[must_use]
    pub fn is_write_error(&self) -> bool {
        matches!(self, Self::WriteFailed(_) | Self::Unavailable(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "--data-dir で書き込み可能なディレクトリを指定してください",
            Self::ReadFailed(_) => "保存ファイルの権限を確認してください",
            Self::WriteFailed(_) => "ディスクの空き容量と権限を確認してください",
            Self::InvalidKey(_) => "キーには英数字とハイフンのみ使用できます",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::WriteFailed("disk full".to_string());
        assert!(err.to_string().contains("disk full"));
        assert!(err.to_string().contains("書き込み"));
    }

    #[test]
    fn test_is_write_error() {
        assert!(StorageError::WriteFailed("x".into()).is_write_error());
        assert!(StorageError::Unavailable("x".into()).is_write_error());
        assert!(!StorageError::ReadFailed("x".into()).is_write_error());
        assert!(!StorageError::InvalidKey("x".into()).is_write_error());
    }

    #[test]
    fn test_suggestion() {
        assert!(StorageError::Unavailable("x".into())
            .suggestion()
            .contains("--data-dir"));
    }
}
