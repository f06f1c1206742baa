use super::forest::{CategoryNode, Forest};
use contracts::domain::common::LocalizedText;
use std::ops::Range;

/// Фильтрация дерева: узлы, совпавшие по имени, и их предки.
///
/// Returns a new forest; the input is not touched. A node kept only because
/// something below it matched is expanded so the match is on screen; a node
/// that matches itself keeps its expansion flag. A blank query returns the
/// forest as it is.
pub fn filter(forest: &Forest, query: &str) -> Forest {
    let needle = normalize_query(query);
    if needle.is_empty() {
        return forest.clone();
    }

    let order = forest.preorder_slots();
    let mut matched = vec![false; forest.len()];
    let mut keep = vec![false; forest.len()];

    // Reverse preorder visits children before their parent
    for &slot in order.iter().rev() {
        let node = forest.slot(slot);
        matched[slot] = name_matches(&node.record.name, &needle);
        keep[slot] = matched[slot] || node.children.iter().any(|&child| keep[child]);
    }

    let mut remap = vec![usize::MAX; forest.len()];
    let mut nodes: Vec<CategoryNode> = Vec::new();
    for &slot in &order {
        if !keep[slot] {
            continue;
        }
        let source = forest.slot(slot);
        let new_slot = nodes.len();
        remap[slot] = new_slot;

        // A kept node's parent is kept too and was placed earlier
        let parent = source.parent.map(|p| remap[p]);
        if let Some(parent) = parent {
            nodes[parent].children.push(new_slot);
        }

        nodes.push(CategoryNode {
            record: source.record.clone(),
            children: Vec::new(),
            parent,
            depth: source.depth,
            expanded: if matched[slot] { source.expanded } else { true },
        });
    }

    let roots = forest
        .root_slots()
        .iter()
        .filter(|&&slot| keep[slot])
        .map(|&slot| remap[slot])
        .collect();

    let filtered = Forest::from_parts(nodes, roots);
    tracing::debug!(
        "filter_tree: query={:?}, {} of {} nodes kept",
        needle,
        filtered.len(),
        forest.len()
    );
    filtered
}

pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// `needle` must already be normalized
pub fn name_matches(name: &LocalizedText, needle: &str) -> bool {
    name.variants()
        .any(|text| text.to_lowercase().contains(needle))
}

/// Byte ranges of `text` matching `query` case-insensitively, for highlighting.
/// Matches do not overlap; a blank query yields nothing.
pub fn match_ranges(text: &str, query: &str) -> Vec<Range<usize>> {
    let needle: Vec<char> = normalize_query(query).chars().collect();
    if needle.is_empty() {
        return Vec::new();
    }

    // Lowercased chars with the byte span of the source char they came from
    let mut lowered: Vec<(char, usize, usize)> = Vec::with_capacity(text.len());
    for (start, ch) in text.char_indices() {
        let end = start + ch.len_utf8();
        for lower in ch.to_lowercase() {
            lowered.push((lower, start, end));
        }
    }

    let mut ranges: Vec<Range<usize>> = Vec::new();
    let mut i = 0;
    while i + needle.len() <= lowered.len() {
        let hit = lowered[i..i + needle.len()]
            .iter()
            .zip(&needle)
            .all(|((c, _, _), n)| c == n);
        if hit {
            let start = lowered[i].1;
            let end = lowered[i + needle.len() - 1].2;
            ranges.push(start..end);
            i += needle.len();
        } else {
            i += 1;
        }
    }
    ranges
}
