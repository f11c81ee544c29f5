use std::ops::Deref;

use itertools::Itertools;

use crate::engine::predicates::Predicate;

/// A struct which represents a conjunction of [`Predicate`]s (e.g. it can represent `[x >= 5] /\ [y
/// <= 10]`).
///
/// Explanations produced by the relation cache are handed to the search engine in this form.
#[derive(Clone, Default, Eq)]
pub struct PropositionalConjunction {
    predicates_in_conjunction: Vec<Predicate>,
}

impl Deref for PropositionalConjunction {
    type Target = [Predicate];

    fn deref(&self) -> &Self::Target {
        &self.predicates_in_conjunction
    }
}

impl PropositionalConjunction {
    pub fn new(predicates_in_conjunction: Vec<Predicate>) -> Self {
        PropositionalConjunction {
            predicates_in_conjunction,
        }
    }

    pub fn as_slice(&self) -> &[Predicate] {
        self.predicates_in_conjunction.as_slice()
    }

    pub fn push(&mut self, predicate: Predicate) {
        self.predicates_in_conjunction.push(predicate);
    }

    pub fn extend_and_remove_duplicates(
        mut self,
        additional_elements: impl Iterator<Item = Predicate>,
    ) -> PropositionalConjunction {
        self.predicates_in_conjunction = self
            .predicates_in_conjunction
            .into_iter()
            .chain(additional_elements)
            .unique()
            .collect();
        self
    }
}

impl Extend<Predicate> for PropositionalConjunction {
    fn extend<T: IntoIterator<Item = Predicate>>(&mut self, iter: T) {
        self.predicates_in_conjunction.extend(iter);
    }
}

impl IntoIterator for PropositionalConjunction {
    type Item = Predicate;

    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.predicates_in_conjunction.into_iter()
    }
}

impl FromIterator<Predicate> for PropositionalConjunction {
    fn from_iter<T: IntoIterator<Item = Predicate>>(iter: T) -> Self {
        let vec = iter.into_iter().collect();
        PropositionalConjunction {
            predicates_in_conjunction: vec,
        }
    }
}

impl From<Vec<Predicate>> for PropositionalConjunction {
    fn from(vec: Vec<Predicate>) -> Self {
        PropositionalConjunction {
            predicates_in_conjunction: vec,
        }
    }
}

impl From<Predicate> for PropositionalConjunction {
    fn from(predicate: Predicate) -> Self {
        PropositionalConjunction {
            predicates_in_conjunction: vec![predicate],
        }
    }
}

impl std::fmt::Display for PropositionalConjunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.predicates_in_conjunction.is_empty() {
            write!(f, "{{empty}}")
        } else {
            write!(
                f,
                "{}",
                self.predicates_in_conjunction
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<String>>()
                    .join("; ")
            )
        }
    }
}

impl std::fmt::Debug for PropositionalConjunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

impl PartialEq for PropositionalConjunction {
    fn eq(&self, other: &Self) -> bool {
        if self.predicates_in_conjunction.len() != other.predicates_in_conjunction.len() {
            return false;
        }

        self.predicates_in_conjunction
            .iter()
            .all(|predicate| other.predicates_in_conjunction.contains(predicate))
    }
}
