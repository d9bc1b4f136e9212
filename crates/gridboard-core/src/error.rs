/// A column count outside the discrete set {4, 6, 8, 12}.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthError {
    #[error("widget width {0} is not one of 4, 6, 8, 12")]
    OutOfRange(u8),
}

/// Failure reported by a [`crate::LayoutStore`].
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("layout store i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("layout encoding error: {0}")]
    Encode(String),

    #[error("layout rejected by store: {0}")]
    Rejected(String),
}

impl StoreError {
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }
}
