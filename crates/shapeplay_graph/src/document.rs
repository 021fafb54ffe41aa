// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph documents stored as RON files.

use crate::graph::{Graph, GraphError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Current graph document format version
pub const DOCUMENT_FORMAT_VERSION: u32 = 1;

/// Errors that can occur when loading or saving a document
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Reading or writing the file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid RON for a document
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// The document could not be serialized
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    /// The document was written by a newer version
    #[error("Document version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest version this build reads
        supported: u32,
    },
    /// The graph failed its integrity check
    #[error("Invalid graph: {0}")]
    InvalidGraph(#[from] GraphError),
}

/// A named graph with a format version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Format version
    pub version: u32,
    /// Document name
    pub name: String,
    /// The graph
    pub graph: Graph,
}

impl GraphDocument {
    /// Wrap a graph in a document at the current format version
    pub fn new(graph: Graph) -> Self {
        Self {
            version: DOCUMENT_FORMAT_VERSION,
            name: graph.name.clone(),
            graph,
        }
    }

    /// Parse a document from RON text
    pub fn from_ron(content: &str) -> Result<Self, DocumentError> {
        let mut document: GraphDocument = ron::from_str(content)?;

        if document.version > DOCUMENT_FORMAT_VERSION {
            return Err(DocumentError::UnsupportedVersion {
                found: document.version,
                supported: DOCUMENT_FORMAT_VERSION,
            });
        }

        document.graph.rebuild_index();
        document.graph.validate()?;
        Ok(document)
    }

    /// Serialize the document as pretty RON
    pub fn to_ron(&self) -> Result<String, DocumentError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Load a document from a file
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path)?;
        let document = Self::from_ron(&content)?;
        tracing::info!(
            path = %path.display(),
            nodes = document.graph.node_count(),
            "Loaded graph document"
        );
        Ok(document)
    }

    /// Save the document to a file
    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        std::fs::write(path, self.to_ron()?)?;
        tracing::info!(path = %path.display(), "Saved graph document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{LeafKind, Node, NodeKind};

    fn sample() -> (Graph, crate::node::NodeId, crate::node::NodeId) {
        let mut graph = Graph::new("sample");
        let scene = graph.add_node(Node::new(NodeKind::Scene));
        let tree = graph.add_owned_node(scene, Node::new(NodeKind::BehaviorTree));
        let key = graph.add_node(
            Node::new(NodeKind::Leaf(LeafKind::KeyDown)).with_property("keyCode", 32.0),
        );
        graph.attach_child(tree, key).unwrap();
        (graph, scene, tree)
    }

    #[test]
    fn test_document_keeps_wiring() {
        let (graph, scene, tree) = sample();
        let text = GraphDocument::new(graph).to_ron().unwrap();
        let loaded = GraphDocument::from_ron(&text).unwrap();

        assert_eq!(loaded.name, "sample");
        assert_eq!(loaded.graph.node_count(), 3);
        assert_eq!(loaded.graph.behavior_trees_for(scene), vec![tree]);
        assert_eq!(loaded.graph.behavior_children(tree).len(), 1);
        let terminal = loaded.graph.node(tree).unwrap().terminals[0].id;
        assert!(loaded.graph.terminal_of_uuid(terminal.0).is_some());
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let (graph, _, _) = sample();
        let mut document = GraphDocument::new(graph);
        document.version = DOCUMENT_FORMAT_VERSION + 1;
        let text = document.to_ron().unwrap();

        assert!(matches!(
            GraphDocument::from_ron(&text),
            Err(DocumentError::UnsupportedVersion { found, .. })
                if found == DOCUMENT_FORMAT_VERSION + 1
        ));
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        assert!(matches!(
            GraphDocument::from_ron("not a document"),
            Err(DocumentError::Parse(_))
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let (graph, _, _) = sample();
        let path = std::env::temp_dir().join(format!("shapeplay-{}.ron", uuid::Uuid::new_v4()));
        GraphDocument::new(graph).save(&path).unwrap();
        let loaded = GraphDocument::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.graph.node_count(), 3);
    }
}
