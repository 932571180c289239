//! Convenient imports for hosts.
//!
//! ```rust
//! use stitch::prelude::*;
//! ```

pub use crate::tags::{handler_fn, Attributes, TagExpansion, TagHandler};
pub use crate::{ComposeError, Composer, ComposerConfig, OutputMode, RenderOutput};
