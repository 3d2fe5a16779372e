//! Directory tree built from container entry paths.

use crate::types::{ContainerEntry, DirectoryNode};

/// Build a forest of [`DirectoryNode`]s from entry paths, in encounter order.
///
/// Intermediate segments reuse an existing folder of the same name and are
/// synthesized when absent. The final segment is always appended: a path
/// ending in `/` adds a folder, anything else a file. Repeating a path
/// (tar permits duplicates) therefore yields duplicate leaves under a single
/// shared parent chain.
pub fn build_directory_tree<'a, I>(paths: I) -> Vec<DirectoryNode>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut root: Vec<DirectoryNode> = Vec::new();

    for path in paths {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((leaf, parents)) = segments.split_last() else {
            continue;
        };

        let mut current = &mut root;
        for segment in parents {
            current = child_folder(current, segment);
        }

        if path.ends_with('/') {
            current.push(DirectoryNode::Folder {
                name: leaf.to_string(),
                nodes: Vec::new(),
            });
        } else {
            current.push(DirectoryNode::File {
                name: leaf.to_string(),
            });
        }
    }

    root
}

/// Tree for a decoded entry list.
pub fn tree_from_entries(entries: &[ContainerEntry]) -> Vec<DirectoryNode> {
    build_directory_tree(entries.iter().map(|e| e.path.as_str()))
}

/// Children of the folder `name` under `nodes`, creating the folder if needed.
fn child_folder<'a>(nodes: &'a mut Vec<DirectoryNode>, name: &str) -> &'a mut Vec<DirectoryNode> {
    let existing = nodes
        .iter()
        .position(|n| matches!(n, DirectoryNode::Folder { name: n, .. } if n == name));

    let idx = match existing {
        Some(idx) => idx,
        None => {
            nodes.push(DirectoryNode::Folder {
                name: name.to_string(),
                nodes: Vec::new(),
            });
            nodes.len() - 1
        }
    };

    match &mut nodes[idx] {
        DirectoryNode::Folder { nodes, .. } => nodes,
        DirectoryNode::File { .. } => unreachable!("position() only matches folders"),
    }
}
