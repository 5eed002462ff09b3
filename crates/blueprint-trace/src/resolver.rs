//! Reference resolution over a snapshot
//!
//! Lookups by id and kind, downward (children) and upward (trace path)
//! traversal. All of them are pure reads of an immutable [`Snapshot`].

use crate::snapshot::Snapshot;
use blueprint_artifact::{ArtifactKind, ArtifactNode};
use std::collections::BTreeSet;

impl Snapshot {
    /// Node with the given id
    #[inline]
    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&ArtifactNode> {
        self.nodes().get(id)
    }

    /// All nodes of one kind, in id order
    #[must_use]
    pub fn get_by_kind(&self, kind: ArtifactKind) -> Vec<&ArtifactNode> {
        self.iter().filter(|node| node.kind() == kind).collect()
    }

    /// Nodes naming `parent_id` in any of their parent fields
    #[must_use]
    pub fn children(&self, parent_id: &str) -> Vec<&ArtifactNode> {
        self.iter()
            .filter(|node| node.metadata.parents.references(parent_id))
            .collect()
    }

    /// Ancestors of `id`, starting with the node itself
    ///
    /// Follows the first present parent field in priority order
    /// (`parent_uc`, `parent_feat`, `parent_goal`, `origin`). Stops at a node
    /// without a parent, at an unresolved parent, or at an id already on the
    /// path. An unknown `id` yields an empty path.
    #[must_use]
    pub fn trace_path(&self, id: &str) -> Vec<&ArtifactNode> {
        let mut path = Vec::new();
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut current = self.get_by_id(id);

        while let Some(node) = current {
            if !seen.insert(node.id.as_str()) {
                tracing::debug!(id, revisited = %node.id, "parent chain loops; trace truncated");
                break;
            }
            path.push(node);
            current = node.parent_ref().and_then(|parent| self.get_by_id(parent));
        }
        path
    }

    /// Topmost ancestor of `id` when it is a Goal
    #[must_use]
    pub fn root_goal(&self, id: &str) -> Option<&ArtifactNode> {
        self.trace_path(id)
            .last()
            .copied()
            .filter(|node| node.kind() == ArtifactKind::Goal)
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::build_index;
    use blueprint_artifact::ArtifactKind;
    use blueprint_store::MemoryDocumentStore;

    fn corpus() -> MemoryDocumentStore {
        MemoryDocumentStore::new()
            .with_document("GL-001.md", "---\nid: GL-001\ntitle: Goal\nstatus: APPROVED\n---\n")
            .with_document(
                "FT-010.md",
                "---\nid: FT-010\ntitle: Feat\nstatus: APPROVED\nparent_goal: GL-001\n---\n",
            )
            .with_document(
                "UC-100.md",
                "---\nid: UC-100\ntitle: Flow\nstatus: APPROVED\nparent_feat: FT-010\n---\n",
            )
            .with_document(
                "TSK-1.md",
                "---\nid: TSK-1\ntitle: Do\nstatus: DRAFT\nparent_uc: UC-100\n---\n",
            )
            .with_document(
                "TSK-2.md",
                "---\nid: TSK-2\ntitle: Also\nstatus: DRAFT\norigin: UC-100\n---\n",
            )
    }

    #[test]
    fn lookups() {
        let snapshot = build_index(&corpus()).unwrap();
        assert!(snapshot.get_by_id("UC-100").is_some());
        assert!(snapshot.get_by_id("UC-999").is_none());
        assert_eq!(snapshot.get_by_kind(ArtifactKind::Task).len(), 2);
        assert!(snapshot.get_by_kind(ArtifactKind::Research).is_empty());
    }

    #[test]
    fn children_match_any_parent_field() {
        let snapshot = build_index(&corpus()).unwrap();
        let ids: Vec<&str> = snapshot
            .children("UC-100")
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(ids, vec!["TSK-1", "TSK-2"]);
    }

    #[test]
    fn trace_path_is_leaf_to_root() {
        let snapshot = build_index(&corpus()).unwrap();
        let ids: Vec<&str> = snapshot
            .trace_path("TSK-1")
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(ids, vec!["TSK-1", "UC-100", "FT-010", "GL-001"]);
        assert_eq!(snapshot.root_goal("TSK-1").unwrap().id.as_str(), "GL-001");
        assert!(snapshot.trace_path("TSK-404").is_empty());
    }

    #[test]
    fn trace_path_stops_on_loop() {
        let store = MemoryDocumentStore::new()
            .with_document("FT-1.md", "---\nid: FT-1\norigin: FT-2\n---\n")
            .with_document("FT-2.md", "---\nid: FT-2\norigin: FT-1\n---\n");
        let snapshot = build_index(&store).unwrap();
        let path = snapshot.trace_path("FT-1");
        assert_eq!(path.len(), 2);
        assert!(snapshot.root_goal("FT-1").is_none());
    }

    #[test]
    fn trace_path_stops_on_unresolved_parent() {
        let store = MemoryDocumentStore::new()
            .with_document("UC-1.md", "---\nid: UC-1\nparent_feat: FT-404\n---\n");
        let snapshot = build_index(&store).unwrap();
        assert_eq!(snapshot.trace_path("UC-1").len(), 1);
    }
}
