use super::error::IntegrityWarning;
use super::forest::{CategoryNode, Forest};
use contracts::domain::a001_category::aggregate::{CategoryId, CategoryRecord};
use std::collections::HashMap;

/// Forest plus everything that had to be patched up on the way
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub forest: Forest,
    pub warnings: Vec<IntegrityWarning>,
}

/// Build the forest and log integrity problems
pub fn build(records: Vec<CategoryRecord>) -> Forest {
    let report = build_with_report(records);
    for warning in &report.warnings {
        tracing::warn!("{}", warning);
    }
    report.forest
}

/// Построение дерева из плоского списка: два прохода, без рекурсии.
///
/// 1. id → слот для каждой записи (дубликаты отбрасываются)
/// 2. в порядке входа каждая запись добавляется к детям родителя,
///    либо в корни, если parent_id пустой или не найден
pub fn build_with_report(records: Vec<CategoryRecord>) -> BuildReport {
    if records.is_empty() {
        return BuildReport::default();
    }

    let total = records.len();
    let mut warnings = Vec::new();

    // Pass 1
    let mut slots: HashMap<CategoryId, usize> = HashMap::with_capacity(records.len());
    let mut nodes: Vec<CategoryNode> = Vec::with_capacity(records.len());
    for record in records {
        if slots.contains_key(&record.id) {
            warnings.push(IntegrityWarning::DuplicateId { id: record.id });
            continue;
        }
        slots.insert(record.id, nodes.len());
        nodes.push(CategoryNode {
            record,
            children: Vec::new(),
            parent: None,
            depth: 0,
            expanded: false,
        });
    }

    // Pass 2
    let mut roots = Vec::new();
    for slot in 0..nodes.len() {
        let parent_id = nodes[slot].record.parent_id;
        match parent_id {
            None => roots.push(slot),
            Some(parent_id) => match slots.get(&parent_id) {
                Some(&parent) => {
                    nodes[parent].children.push(slot);
                    nodes[slot].parent = Some(parent);
                }
                None => {
                    warnings.push(IntegrityWarning::OrphanParent {
                        id: nodes[slot].record.id,
                        parent_id,
                    });
                    roots.push(slot);
                }
            },
        }
    }

    // Depths from the roots; whatever stays unreached sits on a parent cycle
    let mut reached = vec![false; nodes.len()];
    let mut stack: Vec<usize> = roots.clone();
    while let Some(slot) = stack.pop() {
        reached[slot] = true;
        let depth = nodes[slot].depth + 1;
        for i in 0..nodes[slot].children.len() {
            let child = nodes[slot].children[i];
            nodes[child].depth = depth;
            stack.push(child);
        }
    }

    let forest = if reached.iter().all(|&r| r) {
        Forest::from_parts(nodes, roots)
    } else {
        for (slot, node) in nodes.iter().enumerate() {
            if !reached[slot] {
                warnings.push(IntegrityWarning::Unreachable { id: node.record.id });
            }
        }
        compact(nodes, roots, &reached)
    };

    tracing::debug!(
        "build_tree: {} records, {} nodes, {} roots, {} warnings",
        total,
        forest.len(),
        forest.root_ids().len(),
        warnings.len()
    );

    BuildReport { forest, warnings }
}

/// Drop unreached slots and renumber the rest
fn compact(nodes: Vec<CategoryNode>, roots: Vec<usize>, reached: &[bool]) -> Forest {
    let mut remap = vec![usize::MAX; nodes.len()];
    let mut next = 0;
    for (slot, &keep) in reached.iter().enumerate() {
        if keep {
            remap[slot] = next;
            next += 1;
        }
    }

    let kept = nodes
        .into_iter()
        .enumerate()
        .filter(|(slot, _)| reached[*slot])
        .map(|(_, mut node)| {
            // A reached node's children and parent are reached as well
            node.children = node.children.iter().map(|&c| remap[c]).collect();
            node.parent = node.parent.map(|p| remap[p]);
            node
        })
        .collect();
    let roots = roots.into_iter().map(|r| remap[r]).collect();

    Forest::from_parts(kept, roots)
}
