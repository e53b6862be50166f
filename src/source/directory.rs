// src/source/directory.rs

//! Sources backed by a directory of saved engine documents.
//!
//! Layout, mirroring the engine's URL structure:
//!
//! ```text
//! <root>/<job>/<build>/build.json        build document (actions[].nodes)
//! <root>/<job>/<build>/nodes/<id>.json   node detail documents
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::fs::{FileSystem, RealFileSystem};
use crate::graph::RawNode;
use crate::source::document::{parse_build_document, parse_node_detail, NodeDetail};
use crate::source::{GraphSource, NodeDetailSource, SourceFuture};
use crate::types::BuildCoordinates;

pub const BUILD_DOCUMENT_FILE: &str = "build.json";
pub const NODE_DETAIL_DIR: &str = "nodes";

#[derive(Debug, Clone)]
pub struct DirectorySource<F: FileSystem = RealFileSystem> {
    fs: F,
    root: PathBuf,
}

impl DirectorySource<RealFileSystem> {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_fs(RealFileSystem, root)
    }
}

impl<F: FileSystem> DirectorySource<F> {
    pub fn with_fs(fs: F, root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn build_dir(&self, coords: &BuildCoordinates) -> PathBuf {
        self.root
            .join(&coords.job_name)
            .join(coords.build_number.to_string())
    }

    pub fn build_document_path(&self, coords: &BuildCoordinates) -> PathBuf {
        self.build_dir(coords).join(BUILD_DOCUMENT_FILE)
    }

    pub fn node_detail_path(&self, coords: &BuildCoordinates, node_id: &str) -> PathBuf {
        self.build_dir(coords)
            .join(NODE_DETAIL_DIR)
            .join(format!("{node_id}.json"))
    }

    fn read_graph(&self, coords: &BuildCoordinates) -> crate::errors::Result<Option<Vec<RawNode>>> {
        let path = self.build_document_path(coords);
        debug!(?path, url = %coords.stages_url(), "reading build document");
        if !self.fs.is_file(&path) {
            debug!(?path, "no build document yet");
            return Ok(None);
        }
        let json = self.fs.read_to_string(&path)?;
        parse_build_document(&json)
    }

    fn read_node_detail(
        &self,
        coords: &BuildCoordinates,
        node_id: &str,
    ) -> crate::errors::Result<NodeDetail> {
        let path = self.node_detail_path(coords, node_id);
        debug!(?path, url = %coords.node_detail_url(node_id), "reading node detail");
        let json = self.fs.read_to_string(&path)?;
        parse_node_detail(&json)
    }
}

impl<F: FileSystem> GraphSource for DirectorySource<F> {
    fn fetch_graph<'a>(&'a self, coords: &'a BuildCoordinates) -> SourceFuture<'a, Option<Vec<RawNode>>> {
        Box::pin(async move { self.read_graph(coords) })
    }
}

impl<F: FileSystem> NodeDetailSource for DirectorySource<F> {
    fn fetch_node_detail<'a>(
        &'a self,
        coords: &'a BuildCoordinates,
        node_id: &'a str,
    ) -> SourceFuture<'a, NodeDetail> {
        Box::pin(async move { self.read_node_detail(coords, node_id) })
    }
}
