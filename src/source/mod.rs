// src/source/mod.rs

//! Where flow graphs and per-node details come from.
//!
//! The tree passes never fetch anything themselves. They consume whatever a
//! [`GraphSource`] returns, and the enricher asks a [`NodeDetailSource`] for
//! supplemental data. [`DirectorySource`] implements both over a dump of the
//! engine's JSON documents; tests plug in fakes.

pub mod directory;
pub mod document;

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::graph::RawNode;
use crate::types::BuildCoordinates;

pub use directory::DirectorySource;
pub use document::{parse_build_document, parse_node_detail, NodeDetail};

pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Supplies the flat node list of one build.
pub trait GraphSource: Send + Sync {
    /// `Ok(None)` when the engine has not produced graph data for the build
    /// yet. That is an expected transient state, not an error.
    fn fetch_graph<'a>(&'a self, coords: &'a BuildCoordinates) -> SourceFuture<'a, Option<Vec<RawNode>>>;
}

/// Supplies per-node detail for enrichment.
pub trait NodeDetailSource: Send + Sync {
    fn fetch_node_detail<'a>(
        &'a self,
        coords: &'a BuildCoordinates,
        node_id: &'a str,
    ) -> SourceFuture<'a, NodeDetail>;
}
