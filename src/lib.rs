//! repos-viewer - Status dashboard for a fleet of local git repositories
//!
//! repos-viewer polls a repos-server for one JSON snapshot describing every
//! tracked repository and shows which of them need attention: local edits,
//! untracked files, or commits not yet exchanged with the remote.
//!
//! ## Core Features
//!
//! - **Snapshot fetching**: One `GET` per refresh, with the prior view kept on failure
//! - **Visibility policy**: Hide clean repositories and, optionally, ignored ones
//! - **Raw inspector**: Pretty-printed payload with token-class highlighting
//! - **Summary table**: Typed cells rendered as HTML, text, or in the terminal UI
//!
//! ## Modules
//!
//! - [`model`]: Wire types for the status document
//! - [`fetch`]: HTTP snapshot source
//! - [`policy`]: Visibility predicate and name ordering
//! - [`render`]: Inspector and table projections
//! - [`dashboard`]: Last good snapshot and refresh semantics
//! - [`config`]: Configuration management and parsing
//! - [`tui`]: Interactive terminal dashboard

pub mod config;
pub mod dashboard;
pub mod fetch;
pub mod model;
pub mod policy;
pub mod render;
pub mod tui;

pub use config::Config;
pub use dashboard::Dashboard;
pub use fetch::{FetchError, SnapshotFetcher, SnapshotSource};
pub use model::{RemoteState, RepoConfig, RepoRecord, RepoState, Snapshot};
pub use policy::{should_show, sort_by_name, DisplayMode};
pub use render::{render_snapshot, OutputFormat, RenderedView};
