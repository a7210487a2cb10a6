use crate::gateway::Named;

/// Items whose name contains `query`, ignoring case. An empty query matches everything.
pub fn filter_by_name<T: Named + Clone>(items: &[T], query: &str) -> Vec<T> {
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| item.name().to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
