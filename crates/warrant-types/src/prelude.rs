pub use crate::error::{Error, WrResult};
pub use crate::types::{Patch, RoleId, Timestamp, TnId};

pub use tracing::{debug, error, info, warn};

// vim: ts=4
