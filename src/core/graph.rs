//! Cross-reference graph between indexed policy files.
//!
//! Policy content stays opaque text; references are pulled out with plain
//! regex scans (Markdown links plus bare `*.md` mentions), never a
//! structural parse. Only references landing on another indexed policy file
//! become edges.

use crate::core::index::{PolicyIndex, normalize_path};
use crate::core::output;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PolicyGraph {
    /// Root-relative policy file paths, sorted.
    pub nodes: Vec<String>,
    /// (source, target) pairs, sorted and deduplicated.
    pub edges: Vec<(String, String)>,
    pub mermaid: String,
}

pub fn generate_policy_graph(index: &PolicyIndex) -> PolicyGraph {
    let mut nodes = HashSet::new();
    let mut edges = Vec::new();

    let existing: HashSet<String> = index
        .policies()
        .map(|p| output::rel_display(index.root(), &p.file_path))
        .collect();

    let link_re = Regex::new(r"\[[^\]]*\]\(([^)]+\.md)(?:#[^)]+)?\)").unwrap();
    let path_re = Regex::new(r"(?P<path>(?:[A-Za-z0-9_./-]+)\.md)").unwrap();

    for policy in index.policies() {
        let src_rel = output::rel_display(index.root(), &policy.file_path);
        let mut refs = HashSet::new();

        for cap in link_re.captures_iter(&policy.content) {
            refs.insert(cap[1].to_string());
        }
        for cap in path_re.captures_iter(&policy.content) {
            refs.insert(cap["path"].to_string());
        }

        for r in refs {
            if r.contains("://") || !r.ends_with(".md") {
                continue;
            }
            let direct = if let Some(stripped) = r.strip_prefix("./") {
                stripped.to_string()
            } else {
                r
            };

            // References resolve against the policy's own directory, the
            // same anchor its content is served from.
            let candidate = normalize_path(&policy.dir.join(&direct));
            let dst_rel = output::rel_display(index.root(), &candidate);

            if existing.contains(&dst_rel) && dst_rel != src_rel {
                nodes.insert(src_rel.clone());
                nodes.insert(dst_rel.clone());
                edges.push((src_rel.clone(), dst_rel));
            }
        }
    }

    let mut sorted_nodes: Vec<String> = nodes.into_iter().collect();
    sorted_nodes.sort();
    edges.sort();
    edges.dedup();

    PolicyGraph {
        mermaid: render_mermaid(&sorted_nodes, &edges),
        nodes: sorted_nodes,
        edges,
    }
}

fn render_mermaid(nodes: &[String], edges: &[(String, String)]) -> String {
    let mut mermaid = String::from("graph TD\n");
    for n in nodes {
        mermaid.push_str(&format!("  {}[\"{}\"]\n", node_id(n), n));
    }
    for (src, dst) in edges {
        mermaid.push_str(&format!("  {} --> {}\n", node_id(src), node_id(dst)));
    }
    mermaid
}

fn node_id(name: &str) -> String {
    name.replace(|c: char| !c.is_alphanumeric(), "_")
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "graph",
        "version": "1.0.0",
        "description": "Cross-reference graph between indexed policy files (Mermaid render)",
        "commands": [
            { "name": "graph", "description": "Extract *.md references between policies and render a digraph" }
        ],
        "storage": []
    })
}
