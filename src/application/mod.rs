// Application layer - the session facade every client (CLI, tests) talks to.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
