use catalog_tree::domain::a001_category::{
    match_ranges, CategoryTreeSession, Forest, HttpCategoryDataSource, LoadOutcome,
};
use catalog_tree::shared::config::load_config;
use catalog_tree::system;

/// Preview of the category picker against the configured catalog API:
/// `catalog_tree [query]` prints the (filtered) tree with matches in brackets.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    system::tracing::initialize(&config.logging)?;

    let query = std::env::args().skip(1).collect::<Vec<_>>().join(" ");

    let source = HttpCategoryDataSource::new(&config.api)?;
    let mut session = CategoryTreeSession::open(Vec::new());

    let skipped = match session.load(&source).await {
        LoadOutcome::Loaded {
            skipped, warnings, ..
        } => {
            if !warnings.is_empty() {
                tracing::warn!("{} integrity warnings while building the tree", warnings.len());
            }
            skipped
        }
        LoadOutcome::Failed(message) => {
            anyhow::bail!("Не удалось загрузить категории: {}", message);
        }
        LoadOutcome::Discarded | LoadOutcome::Busy => {
            anyhow::bail!("Category load did not run");
        }
    };

    session.set_query(query.as_str());

    let visible = session.visible();
    for line in render_lines(visible, session.query()) {
        println!("{}", line);
    }

    println!(
        "\n{} roots, {} of {} categories shown, {} records skipped",
        visible.root_ids().len(),
        visible.len(),
        session.forest().len(),
        skipped
    );

    Ok(())
}

/// Indented listing of every node, matched text wrapped in `[...]`
fn render_lines(forest: &Forest, query: &str) -> Vec<String> {
    forest
        .iter_depth_first()
        .map(|node| {
            let name = node.record.name.display();
            let mut line = "  ".repeat(node.depth);
            let mut last = 0;
            for range in match_ranges(name, query) {
                line.push_str(&name[last..range.start]);
                line.push('[');
                line.push_str(&name[range.clone()]);
                line.push(']');
                last = range.end;
            }
            line.push_str(&name[last..]);
            match forest.subtree_product_count(node.id()) {
                Some(count) if count > 0 => format!("{} ({}) #{}", line, count, node.id()),
                _ => format!("{} #{}", line, node.id()),
            }
        })
        .collect()
}
