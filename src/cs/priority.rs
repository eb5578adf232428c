//! Choice of the single declaration that holds an identity's documentation
//!
//! Partial types and duplicated declarations produce several nodes for one
//! identity. Exactly one of them may carry the doc comment: the first visited
//! node that already has one, otherwise the first visited node.

use std::collections::HashMap;

use super::identity::identity;
use super::symbols::SyntaxFile;

/// Position of a documentable unit: file index in the request, then the
/// unit's index in [`SyntaxFile::doc_units`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub file: usize,
    pub unit: usize,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    node: NodeId,
    has_doc: bool,
}

/// Map from identity to its documentation target
#[derive(Debug, Default)]
pub struct PriorityMap {
    targets: HashMap<String, Candidate>,
}

impl PriorityMap {
    /// The node chosen for an identity
    pub fn target(&self, identity: &str) -> Option<NodeId> {
        self.targets.get(identity).map(|c| c.node)
    }

    pub fn is_target(&self, identity: &str, node: NodeId) -> bool {
        self.target(identity) == Some(node)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Visit every documentable unit of the files, in file order then traversal
/// order, and choose one target per identity
pub fn build_priority_map(files: &[SyntaxFile]) -> PriorityMap {
    let mut map = PriorityMap::default();

    for (file_index, file) in files.iter().enumerate() {
        for (unit_index, unit) in file.doc_units().iter().enumerate() {
            let id = match identity(unit.symbol) {
                Ok(id) => id,
                Err(e) => {
                    log::debug!("Skipping {}: {}", unit.symbol.name, e);
                    continue;
                }
            };
            let candidate = Candidate {
                node: NodeId {
                    file: file_index,
                    unit: unit_index,
                },
                has_doc: unit.slot.has_doc(),
            };
            map.targets
                .entry(id)
                .and_modify(|current| {
                    if !current.has_doc && candidate.has_doc {
                        *current = candidate;
                    }
                })
                .or_insert(candidate);
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::parse_cs;

    #[test]
    fn test_prefers_documented_fragment() {
        let first = parse_cs("A.cs", "public partial class Widget { }\n");
        let second = parse_cs(
            "B.cs",
            "/// <summary>Doc</summary>\npublic partial class Widget { }\n",
        );
        let map = build_priority_map(&[first, second]);
        assert_eq!(map.target("Widget"), Some(NodeId { file: 1, unit: 0 }));
    }

    #[test]
    fn test_first_visited_wins_without_docs() {
        let first = parse_cs("A.cs", "public partial class Widget { }\n");
        let second = parse_cs("B.cs", "public partial class Widget { }\n");
        let map = build_priority_map(&[first, second]);
        assert_eq!(map.target("Widget"), Some(NodeId { file: 0, unit: 0 }));
    }

    #[test]
    fn test_first_documented_wins_when_several_have_docs() {
        let first = parse_cs("A.cs", "/// <summary>One</summary>\npublic partial class Widget { }\n");
        let second = parse_cs("B.cs", "/// <summary>Two</summary>\npublic partial class Widget { }\n");
        let map = build_priority_map(&[first, second]);
        assert!(map.is_target("Widget", NodeId { file: 0, unit: 0 }));
        assert!(!map.is_target("Widget", NodeId { file: 1, unit: 0 }));
    }

    #[test]
    fn test_each_field_variable_is_a_unit() {
        let file = parse_cs("Point.cs", "public class Point\n{\n    public int X, Y;\n}\n");
        let map = build_priority_map(&[file]);
        assert_eq!(map.len(), 3);
        assert_eq!(map.target("Point.X"), Some(NodeId { file: 0, unit: 1 }));
        assert_eq!(map.target("Point.Y"), Some(NodeId { file: 0, unit: 2 }));
    }
}
