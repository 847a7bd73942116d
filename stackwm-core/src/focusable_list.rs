//! Ordered, optionally filtered views over the focusable entities of a
//! screen.
use crate::errors::Result;
use crate::models::{Focusable, WindowStore};
use crate::pattern::{ClientPattern, MatchContext};
use serde::{Deserialize, Serialize};

/// Options parsed from the leading `{...}` block of a list selector,
/// picking one of the four canonical lists a `FocusControl` exposes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListOptions {
    /// Creation order instead of focus order.
    pub static_order: bool,
    /// Grouping-window granularity instead of client granularity.
    pub groups: bool,
}

impl ListOptions {
    /// Split `{opts} pattern` into options and the remaining pattern
    /// text. Unknown option tokens are ignored with a warning.
    #[must_use]
    pub fn parse(source: &str) -> (Self, &str) {
        let mut opts = Self::default();
        let trimmed = source.trim_start();
        let Some(body) = trimmed.strip_prefix('{') else {
            return (opts, source);
        };
        let Some(end) = body.find('}') else {
            return (opts, source);
        };
        for token in body[..end].split_whitespace() {
            match token.to_lowercase().as_str() {
                "static" => opts.static_order = true,
                "groups" => opts.groups = true,
                other => tracing::warn!("ignoring unknown list option: {}", other),
            }
        }
        (opts, &body[end + 1..])
    }
}

/// An ordered sequence of focusables, optionally filtered by a
/// pattern. A filtered list is a snapshot: it is not re-validated when
/// the underlying entities change, only [`FocusableList::reset`]
/// resynchronizes it with its parent.
#[derive(Debug, Clone, Default)]
pub struct FocusableList {
    options: ListOptions,
    pattern: Option<ClientPattern>,
    list: Vec<Focusable>,
}

impl FocusableList {
    /// An unfiltered list; used for the raw focus-order lists owned by
    /// `FocusControl`.
    #[must_use]
    pub fn new(options: ListOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// A filtered view over a parent list, populated immediately from
    /// the parent's current contents.
    pub fn from_pattern_str(
        pattern: &str,
        parent: &Self,
        store: &WindowStore,
        ctx: &MatchContext,
    ) -> Result<Self> {
        let pattern: ClientPattern = pattern.parse()?;
        let mut list = Self {
            options: parent.options,
            pattern: Some(pattern),
            list: Vec::new(),
        };
        list.add_matching(parent, store, ctx);
        Ok(list)
    }

    /// Everything in the parent the pattern currently matches, in
    /// parent order; each copy bumps the pattern's match count.
    fn add_matching(&mut self, parent: &Self, store: &WindowStore, ctx: &MatchContext) {
        let Some(pattern) = self.pattern.as_mut() else {
            return;
        };
        for &entry in &parent.list {
            if pattern.matches(entry, store, ctx) {
                pattern.add_match();
                self.list.push(entry);
            }
        }
    }

    /// Drop the snapshot and repopulate from the parent. The only way
    /// a filtered list sees upstream changes.
    pub fn reset(&mut self, parent: &Self, store: &WindowStore, ctx: &MatchContext) {
        if self.pattern.is_none() {
            return;
        }
        self.list.clear();
        if let Some(pattern) = self.pattern.as_mut() {
            pattern.reset_matches();
        }
        self.add_matching(parent, store, ctx);
    }

    pub fn push_front(&mut self, entry: Focusable) {
        self.list.insert(0, entry);
    }

    pub fn push_back(&mut self, entry: Focusable) {
        self.list.push(entry);
    }

    /// No-op unless the entry is currently a member.
    pub fn move_to_front(&mut self, entry: Focusable) {
        if self.remove(entry) {
            self.list.insert(0, entry);
        }
    }

    /// No-op unless the entry is currently a member.
    pub fn move_to_back(&mut self, entry: Focusable) {
        if self.remove(entry) {
            self.list.push(entry);
        }
    }

    /// Remove an entry, reporting whether it was present. A filtered
    /// list gives the match back to its pattern's budget.
    pub fn remove(&mut self, entry: Focusable) -> bool {
        match self.position(entry) {
            Some(index) => {
                self.list.remove(index);
                if let Some(pattern) = self.pattern.as_mut() {
                    pattern.remove_match();
                }
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn contains(&self, entry: Focusable) -> bool {
        self.list.contains(&entry)
    }

    #[must_use]
    pub fn position(&self, entry: Focusable) -> Option<usize> {
        self.list.iter().position(|&e| e == entry)
    }

    #[must_use]
    pub fn first(&self) -> Option<Focusable> {
        self.list.first().copied()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Focusable> {
        self.list.get(index).copied()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Focusable> + '_ {
        self.list.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    #[must_use]
    pub fn options(&self) -> ListOptions {
        self.options
    }

    #[must_use]
    pub fn pattern(&self) -> Option<&ClientPattern> {
        self.pattern.as_ref()
    }

    pub fn pattern_mut(&mut self) -> Option<&mut ClientPattern> {
        self.pattern.as_mut()
    }

    /// Whether another list denotes the same view; stands in for the
    /// pointer-identity check a cycling gesture uses to decide it is
    /// still walking the same list.
    #[must_use]
    pub fn same_view(&self, other: &Self) -> bool {
        self.options == other.options
            && self.pattern == other.pattern
            && self.list == other.list
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Rect, Screen};

    fn titled(store: &mut WindowStore, title: &str) -> Focusable {
        let w = store.insert_window(Rect::new(0, 0, 100, 100));
        let c = store.insert_client(title);
        store.attach_client(c, w);
        Focusable::Client(c)
    }

    #[test]
    fn options_parse_selects_canonical_parent() {
        let (opts, rest) = ListOptions::parse("{static groups} (title=a)");
        assert!(opts.static_order);
        assert!(opts.groups);
        assert_eq!(rest.trim(), "(title=a)");

        let (opts, rest) = ListOptions::parse("(title=a)");
        assert_eq!(opts, ListOptions::default());
        assert_eq!(rest, "(title=a)");
    }

    #[test]
    fn filtered_list_is_a_snapshot_until_reset() {
        let mut store = WindowStore::new();
        let screen = Screen::default();
        let ctx = MatchContext::new(&screen, None);
        let mut parent = FocusableList::new(ListOptions::default());
        for title in ["alpha", "beta", "gamma"] {
            parent.push_back(titled(&mut store, title));
        }
        let mut filtered =
            FocusableList::from_pattern_str("(beta)", &parent, &store, &ctx).unwrap();
        assert_eq!(filtered.len(), 1);
        assert!(filtered.contains(parent.get(1).unwrap()));

        // A new matching entry in the parent does not appear...
        let beta2 = titled(&mut store, "beta");
        parent.push_back(beta2);
        assert!(!filtered.contains(beta2));

        // ...until reset.
        filtered.reset(&parent, &store, &ctx);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.contains(beta2));
        assert_eq!(filtered.pattern().unwrap().match_count(), 2);
    }

    #[test]
    fn guarded_moves_are_no_ops_for_non_members() {
        let mut store = WindowStore::new();
        let a = titled(&mut store, "a");
        let b = titled(&mut store, "b");
        let stranger = titled(&mut store, "c");
        let mut list = FocusableList::new(ListOptions::default());
        list.push_back(a);
        list.push_back(b);

        list.move_to_front(stranger);
        list.move_to_back(stranger);
        assert!(!list.remove(stranger));
        assert_eq!(list.len(), 2);

        list.move_to_front(b);
        assert_eq!(list.first(), Some(b));
        list.move_to_back(b);
        assert_eq!(list.first(), Some(a));
    }

    #[test]
    fn bad_pattern_text_is_reported() {
        let store = WindowStore::new();
        let screen = Screen::default();
        let ctx = MatchContext::new(&screen, None);
        let parent = FocusableList::new(ListOptions::default());
        assert!(FocusableList::from_pattern_str("(*oops)", &parent, &store, &ctx).is_err());
    }
}
