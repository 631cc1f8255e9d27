const LISTS: &str = "lists";
const ITEMS: &str = "items";

/// Path segments recognised under `/lists`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Route {
    pub list_id: Option<String>,
    /// Whether segment 2 is the literal `items`.
    pub items_segment: bool,
    pub item_id: Option<String>,
}

impl Route {
    /// Splits `path` on `/`, ignoring empty segments.
    ///
    /// Returns `None` when the first segment is not `lists`.
    pub fn parse(path: &str) -> Option<Route> {
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
        if parts.first() != Some(&LISTS) {
            return None;
        }

        let items_segment = parts.get(2) == Some(&ITEMS);
        Some(Route {
            list_id: parts.get(1).map(|s| s.to_string()),
            items_segment,
            item_id: if items_segment {
                parts.get(3).map(|s| s.to_string())
            } else {
                None
            },
        })
    }
}
