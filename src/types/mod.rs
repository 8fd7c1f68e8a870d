pub mod error;

pub use error::{AgentError, RenderError, Result, ResultExt};
