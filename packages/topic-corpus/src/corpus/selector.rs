//! Explicit topic/section selection.

use crate::topic::Topic;

/// Which topics or sections an operation applies to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selector<T> {
    /// No restriction.
    #[default]
    All,
    One(T),
    Many(Vec<T>),
}

/// Selects topics by canonical identifier.
pub type TopicSelector = Selector<Topic>;

/// Selects sections by name.
pub type SectionSelector = Selector<String>;

impl<T> Selector<T> {
    pub fn one(item: impl Into<T>) -> Self {
        Selector::One(item.into())
    }

    pub fn many<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<T>,
    {
        Selector::Many(items.into_iter().map(Into::into).collect())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selector::All)
    }

    /// The named items, or `None` for [`Selector::All`].
    pub fn items(&self) -> Option<&[T]> {
        match self {
            Selector::All => None,
            Selector::One(item) => Some(std::slice::from_ref(item)),
            Selector::Many(items) => Some(items),
        }
    }
}

impl<T> From<Option<T>> for Selector<T> {
    fn from(item: Option<T>) -> Self {
        item.map_or(Selector::All, Selector::One)
    }
}

impl<T> From<Vec<T>> for Selector<T> {
    fn from(items: Vec<T>) -> Self {
        Selector::Many(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items() {
        let all: SectionSelector = Selector::All;
        assert!(all.items().is_none());

        let one: SectionSelector = Selector::one("History");
        assert_eq!(one.items().unwrap(), &["History".to_string()]);

        let many: TopicSelector = Selector::many(["A", "B"]);
        assert_eq!(many.items().unwrap().len(), 2);
    }

    #[test]
    fn test_from_option() {
        let none: Selector<String> = None.into();
        assert!(none.is_all());
        let some: Selector<String> = Some("x".to_string()).into();
        assert_eq!(some, Selector::One("x".to_string()));
    }
}
