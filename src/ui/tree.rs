//! ui::tree
//!
//! Text rendering of a grown tree.
//!
//! ```text
//! root (container): <2 features>
//! ├── leaf1 (text): hello
//! └── gone [dropped: not found: gone]
//! ```
//!
//! Children come first, in tree order, followed by the node's dropped
//! references.

use std::fmt::Write;

use crate::tree::{Branch, BranchFailure};

enum Entry<'a> {
    Child(&'a Branch),
    Dropped(&'a BranchFailure),
}

/// Render a Branch and its descendants as an indented tree.
pub fn render_tree(root: &Branch) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", root.thing());
    render_entries(root, "", &mut out);
    out
}

fn render_entries(branch: &Branch, prefix: &str, out: &mut String) {
    let entries: Vec<Entry<'_>> = branch
        .children
        .iter()
        .map(Entry::Child)
        .chain(branch.failures.iter().map(Entry::Dropped))
        .collect();
    let count = entries.len();

    for (i, entry) in entries.into_iter().enumerate() {
        let last = i + 1 == count;
        let (connector, extension) = if last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };

        match entry {
            Entry::Child(child) => {
                let _ = writeln!(out, "{}{}{}", prefix, connector, child.thing());
                render_entries(child, &format!("{}{}", prefix, extension), out);
            }
            Entry::Dropped(failure) => {
                let _ = writeln!(
                    out,
                    "{}{}{} [dropped: {}]",
                    prefix, connector, failure.feature.address, failure.reason
                );
            }
        }
    }
}
