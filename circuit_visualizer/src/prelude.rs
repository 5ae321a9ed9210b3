pub use crate::context::Context;
pub use log::{debug, info, trace, warn};
pub use serde::{Deserialize, Serialize};
pub use tap::prelude::*;
