// SPDX-License-Identifier: MIT OR Apache-2.0

//! The graph composer (C7) and workspace loader (C8): merges per-project
//! flow graphs into one, then augments it with cross-service `remote`
//! edges derived from HTTP-call metadata and workspace bindings.

mod composition;
mod error;
mod remote;
mod workspace;

pub use composition::{compose, Composition};
pub use error::{ComposeError, Result};
pub use workspace::{Binding, ServiceDefinition, WorkspaceDefinition};
