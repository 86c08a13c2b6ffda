mod types;

pub use types::{PeriphError, Result};
