//! The value that flows through the graph: an ordered sequence of opaque
//! items ("messages"). Equality is element-wise sequence equality; isolation
//! between concurrent siblings is provided by `Clone` at every routing hop.

use serde::{Deserialize, Serialize};

/// Ordered sequence of items flowing through a graph run.
///
/// Generic over the item type so one executor serves any message/item
/// payload, the same way the teacher crate's `StateGraph<S>` is generic over
/// its state type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State<T> {
    pub messages: Vec<T>,
}

impl<T> State<T> {
    pub fn new(messages: Vec<T>) -> Self {
        Self { messages }
    }

    pub fn push(&mut self, item: T) {
        self.messages.push(item);
    }

    pub fn last(&self) -> Option<&T> {
        self.messages.last()
    }
}

impl<T> Default for State<T> {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
        }
    }
}

impl<T: PartialEq> PartialEq for State<T> {
    fn eq(&self, other: &Self) -> bool {
        self.messages == other.messages
    }
}

impl<T: PartialEq> Eq for State<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_element_wise_sequence() {
        let a = State::new(vec![1, 2, 3]);
        let b = State::new(vec![1, 2, 3]);
        let c = State::new(vec![1, 2]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn clone_is_an_independent_deep_copy() {
        let a = State::new(vec![vec![1, 2], vec![3]]);
        let mut b = a.clone();
        b.messages[0].push(99);
        assert_eq!(a.messages[0], vec![1, 2]);
        assert_eq!(b.messages[0], vec![1, 2, 99]);
    }
}
