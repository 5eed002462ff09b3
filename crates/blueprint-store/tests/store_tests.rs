use blueprint_store::{
    DocumentStore, FeedbackStore, FsDocumentStore, FsFeedbackStore, StoreError, TraceConfig,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;

fn write(root: &std::path::Path, relative: &str, text: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

#[test]
fn test_listing_is_sorted_and_stable() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "z/UC-2.md", "---\nid: UC-2\n---\n");
    write(dir.path(), "a/GL-1.md", "---\nid: GL-1\n---\n");
    write(dir.path(), "m/FT-1.md", "---\nid: FT-1\n---\n");

    let store = FsDocumentStore::new(dir.path());
    let first = store.list_documents().unwrap();
    let second = store.list_documents().unwrap();
    assert_eq!(first, second);
    let stems: Vec<&str> = first.iter().filter_map(|d| d.stem()).collect();
    assert_eq!(stems, vec!["GL-1", "FT-1", "UC-2"]);
}

#[test]
fn test_metadata_and_body_split() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "UC-1.md",
        "---\nid: UC-1\ndependencies:\n  - UC-2\n  - UC-3\n---\n\n# Checkout\n\nSteps.\n",
    );
    let store = FsDocumentStore::new(dir.path());
    let docs = store.list_documents().unwrap();
    let meta = store.read_metadata(&docs[0]);
    assert_eq!(meta.get("id").and_then(|v| v.as_str()), Some("UC-1"));
    assert_eq!(store.read_body(&docs[0]), "# Checkout\n\nSteps.");
}

#[test]
fn test_document_without_frontmatter_reads_empty_metadata() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "notes.md", "just prose\n---\nnot: frontmatter\n---\n");
    let store = FsDocumentStore::new(dir.path());
    let docs = store.list_documents().unwrap();
    assert!(store.read_metadata(&docs[0]).is_empty());
}

#[test]
fn test_custom_extensions() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "GL-1.markdown", "---\nid: GL-1\n---\n");
    write(dir.path(), "GL-2.md", "---\nid: GL-2\n---\n");
    let config: TraceConfig = TraceConfig::from_toml_str(
        &format!(
            "corpus_root = {:?}\nextensions = [\"markdown\"]\n",
            dir.path().display().to_string()
        ),
        dir.path(),
    )
    .unwrap();
    let store = FsDocumentStore::from_config(&config);
    let docs = store.list_documents().unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].stem(), Some("GL-1"));
}

#[test]
fn test_config_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blueprint.toml");
    fs::write(
        &path,
        "corpus_root = \"docs/_blueprint\"\nfeedback_dir = \"reviews\"\nsnippet_len = 80\n",
    )
    .unwrap();
    let config = TraceConfig::from_file(&path).unwrap();
    assert_eq!(config.corpus_root, PathBuf::from("docs/_blueprint"));
    assert_eq!(config.feedback_path(), PathBuf::from("docs/_blueprint/reviews"));
    assert_eq!(config.snippet_len, 80);
}

#[test]
fn test_missing_config_file_is_io_error() {
    let err = TraceConfig::from_file("/no/such/blueprint.toml").unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
    assert!(err.to_string().contains("/no/such/blueprint.toml"));
}

#[test]
fn test_feedback_store_over_config_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = TraceConfig::new().with_root(dir.path());
    write(dir.path(), "inbound/User_Feedback/FB-UC-1.md", "---\nread: false\n---\nRedo.\n");
    write(dir.path(), "inbound/User_Feedback/FB-UC-2.md", "no frontmatter at all\n");
    write(dir.path(), "inbound/User_Feedback/notes.md", "---\nread: false\n---\n");

    let feedback = FsFeedbackStore::new(config.feedback_path());
    assert!(feedback.has_feedback("UC-1"));
    assert!(!feedback.has_feedback("UC-3"));
    let unread: Vec<String> = feedback
        .unread_feedback()
        .into_iter()
        .map(|r| r.artifact_id)
        .collect();
    assert_eq!(unread, vec!["UC-1".to_string(), "UC-2".to_string()]);
}
