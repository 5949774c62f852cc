//! Bounded expansion of collapsed comment stubs.

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use super::listing::{CommentTree, Thing};

/// Reddit accepts at most this many ids per morechildren call.
pub const MORE_CHILDREN_CHUNK: usize = 100;

/// Where the comments hidden behind a stub come from.
#[async_trait]
pub trait MoreSource: Send + Sync {
    /// Comments named by a "load more comments" stub.
    async fn more_children(&self, post_id: &str, ids: &[String]) -> Result<Vec<Thing>>;

    /// Replies to `parent_id` behind a "continue this thread" link.
    async fn continue_thread(&self, post_id: &str, parent_id: &str) -> Result<Vec<Thing>>;
}

/// Expands up to `budget` stubs, oldest first, including stubs that earlier
/// expansions reveal. Returns how many stubs were expanded.
pub async fn expand_more<S>(source: &S, tree: &mut CommentTree, post_id: &str, budget: usize) -> Result<usize>
where
    S: MoreSource + ?Sized,
{
    let mut expanded = 0;

    while expanded < budget {
        let Some(more) = tree.next_more() else {
            break;
        };

        if more.children.is_empty() {
            // top-level stubs without ids have nothing to load
            let Some(parent) = more.parent_id.strip_prefix("t1_") else {
                continue;
            };
            expanded += 1;
            tree.extend(source.continue_thread(post_id, parent).await?);
            continue;
        }

        expanded += 1;
        for chunk in more.children.chunks(MORE_CHILDREN_CHUNK) {
            tree.extend(source.more_children(post_id, chunk).await?);
        }
    }

    if tree.has_pending() {
        debug!("Post {}: expansion budget of {} reached, rest left collapsed", post_id, budget);
    }

    Ok(expanded)
}
