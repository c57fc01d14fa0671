// State handle contract - the narrow get/set surface this crate depends on
use crate::types::BlockNumber;

/// Read access to committed state as of one logical height.
///
/// Implementations must return the value visible at `height()`: the most
/// recent write at or below that height. Nothing here may be cached by
/// callers across handles, since each handle pins its own height.
pub trait StateReader {
    /// Logical height this handle reads at
    fn height(&self) -> BlockNumber;

    /// Raw bytes under `key`, or `None` if never written at or below `height()`
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError>;
}

/// Write access for the height currently being executed.
///
/// The surrounding state layer guarantees a single writer per height; taking
/// `&mut self` keeps that exclusivity visible to the compiler as well.
pub trait StateWriter: StateReader {
    /// Store `value` under `key`, effective from `height()` onward
    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StateError>;
}

/// State layer errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("Write at height {height} would rewrite history (latest written height {latest})")]
    HistoryRewrite {
        height: BlockNumber,
        latest: BlockNumber,
    },

    #[error("State backend failure: {0}")]
    Backend(String),
}
