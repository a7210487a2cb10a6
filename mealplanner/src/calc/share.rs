use crate::gateway::Named;

/// The grocery list as a numbered message for sharing. `None` when empty.
pub fn share_text<T: Named>(items: &[T]) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    let lines = items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item.name()))
        .collect::<Vec<_>>()
        .join("\n");
    Some(format!(
        "🛒 My Grocery List:\n\n{lines}\n\n📱 Created with Meal Planner"
    ))
}
