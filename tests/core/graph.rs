use purview::core::config::ScanConfig;
use purview::core::graph::generate_policy_graph;
use purview::core::index::PolicyIndex;
use std::fs;
use tempfile::tempdir;

#[test]
fn cross_references_between_policies_become_edges() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path();
    fs::write(
        root.join("AGENTS.md"),
        "Subtree rules live in [django](./django/AGENTS.md).\n",
    )
    .expect("write root policy");
    fs::create_dir_all(root.join("django")).expect("mkdir django");
    fs::write(
        root.join("django/AGENTS.md"),
        "Defer to [the root policy](../AGENTS.md) for anything unlisted.\n",
    )
    .expect("write django policy");

    let index = PolicyIndex::build(root, &ScanConfig::default()).expect("build");
    let graph = generate_policy_graph(&index);

    assert_eq!(graph.nodes, vec!["AGENTS.md", "django/AGENTS.md"]);
    assert_eq!(
        graph.edges,
        vec![
            ("AGENTS.md".to_string(), "django/AGENTS.md".to_string()),
            ("django/AGENTS.md".to_string(), "AGENTS.md".to_string()),
        ]
    );
}

#[test]
fn mermaid_render_lists_nodes_then_arrows() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path();
    fs::write(root.join("AGENTS.md"), "See django/AGENTS.md.\n").expect("write root policy");
    fs::create_dir_all(root.join("django")).expect("mkdir django");
    fs::write(root.join("django/AGENTS.md"), "No references here.\n")
        .expect("write django policy");

    let index = PolicyIndex::build(root, &ScanConfig::default()).expect("build");
    let graph = generate_policy_graph(&index);

    assert!(graph.mermaid.starts_with("graph TD\n"));
    assert!(graph.mermaid.contains("AGENTS_md[\"AGENTS.md\"]"));
    assert!(graph.mermaid.contains("django_AGENTS_md[\"django/AGENTS.md\"]"));
    assert!(graph.mermaid.contains("AGENTS_md --> django_AGENTS_md"));
}

#[test]
fn self_references_never_produce_edges() {
    let tmp = tempdir().expect("tempdir");
    fs::write(
        tmp.path().join("AGENTS.md"),
        "This file is AGENTS.md and it governs the whole tree.\n",
    )
    .expect("write policy");

    let index = PolicyIndex::build(tmp.path(), &ScanConfig::default()).expect("build");
    let graph = generate_policy_graph(&index);
    assert!(graph.edges.is_empty());
    assert!(graph.nodes.is_empty());
}

#[test]
fn url_references_are_ignored() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path();
    fs::write(
        root.join("AGENTS.md"),
        "External guide: [upstream](https://example.com/AGENTS.md)\n",
    )
    .expect("write root policy");
    fs::create_dir_all(root.join("django")).expect("mkdir django");
    fs::write(root.join("django/AGENTS.md"), "quiet\n").expect("write django policy");

    let index = PolicyIndex::build(root, &ScanConfig::default()).expect("build");
    let graph = generate_policy_graph(&index);
    assert!(graph.edges.is_empty(), "URL must not resolve to an indexed node");
}

#[test]
fn duplicate_mentions_collapse_to_one_edge() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path();
    fs::write(
        root.join("AGENTS.md"),
        "Read django/AGENTS.md twice: [once](./django/AGENTS.md) and django/AGENTS.md again.\n",
    )
    .expect("write root policy");
    fs::create_dir_all(root.join("django")).expect("mkdir django");
    fs::write(root.join("django/AGENTS.md"), "quiet\n").expect("write django policy");

    let index = PolicyIndex::build(root, &ScanConfig::default()).expect("build");
    let graph = generate_policy_graph(&index);
    assert_eq!(
        graph.edges,
        vec![("AGENTS.md".to_string(), "django/AGENTS.md".to_string())]
    );
}
