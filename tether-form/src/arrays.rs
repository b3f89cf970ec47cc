use std::collections::BTreeSet;

/// Names of the field arrays currently mounted in a form.
#[derive(Debug, Clone, Default)]
pub(crate) struct FieldArrayNames {
    names: BTreeSet<String>,
}

impl FieldArrayNames {
    pub(crate) fn add(&mut self, name: &str) -> bool {
        self.names.insert(name.to_string())
    }

    pub(crate) fn remove(&mut self, name: &str) -> bool {
        self.names.remove(name)
    }

    /// Whether `field` is an item of one of the arrays.
    ///
    /// `items[0]`, `items[3].title` and `items.1` belong to `items`;
    /// `items`, `itemsCount` and `items.title` do not.
    pub(crate) fn owns(&self, field: &str) -> bool {
        self.names.iter().any(|array| is_item_of(field, array))
    }
}

fn is_item_of(field: &str, array: &str) -> bool {
    let Some(rest) = field.strip_prefix(array) else {
        return false;
    };
    let Some(rest) = rest.strip_prefix(['[', '.']) else {
        return false;
    };
    rest.starts_with(|c: char| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_paths() {
        let mut arrays = FieldArrayNames::default();
        arrays.add("items");

        assert!(arrays.owns("items[0]"));
        assert!(arrays.owns("items[3].title"));
        assert!(arrays.owns("items.1"));
        assert!(!arrays.owns("items"));
        assert!(!arrays.owns("itemsCount"));
        assert!(!arrays.owns("items.title"));
        assert!(!arrays.owns("other[0]"));
    }

    #[test]
    fn test_nested_arrays() {
        let mut arrays = FieldArrayNames::default();
        arrays.add("orders[0].lines");

        assert!(arrays.owns("orders[0].lines[2].sku"));
        assert!(!arrays.owns("orders[1].lines[2].sku"));
    }

    #[test]
    fn test_remove() {
        let mut arrays = FieldArrayNames::default();
        arrays.add("items");
        assert!(arrays.remove("items"));
        assert!(!arrays.owns("items[0]"));
    }
}
