use crate::engine::variables::DomainId;
use crate::predicate;

/// Representation of a bound on a domain, also known as an atomic constraint. It is a triple
/// ([`DomainId`], [`PredicateType`], value).
///
/// To create a [`Predicate`], use [Predicate::new] or the more concise [predicate!] macro.
#[derive(Clone, PartialEq, Eq, Copy, Hash, PartialOrd, Ord)]
pub struct Predicate {
    /// The two most significant bits of the id stored in the [`Predicate`] contains the type of
    /// predicate.
    id: u32,
    value: i64,
}

const LOWER_BOUND_CODE: u8 = 1;
const UPPER_BOUND_CODE: u8 = 2;

impl Predicate {
    /// Creates a new [`Predicate`] (also known as atomic constraint) which represents a bound on a
    /// domain.
    pub fn new(id: DomainId, predicate_type: PredicateType, value: i64) -> Self {
        let code = match predicate_type {
            PredicateType::LowerBound => LOWER_BOUND_CODE,
            PredicateType::UpperBound => UPPER_BOUND_CODE,
        };
        let id = id.id() | (code as u32) << 30;
        Self { id, value }
    }

    fn get_type_code(&self) -> u8 {
        (self.id >> 30) as u8
    }

    pub fn get_predicate_type(&self) -> PredicateType {
        if self.get_type_code() == LOWER_BOUND_CODE {
            PredicateType::LowerBound
        } else {
            PredicateType::UpperBound
        }
    }

    pub fn is_lower_bound_predicate(&self) -> bool {
        self.get_type_code() == LOWER_BOUND_CODE
    }

    pub fn is_upper_bound_predicate(&self) -> bool {
        self.get_type_code() == UPPER_BOUND_CODE
    }

    /// Returns the [`DomainId`] of the [`Predicate`]
    pub fn get_domain(&self) -> DomainId {
        DomainId::new(0b00111111_11111111_11111111_11111111 & self.id)
    }

    pub fn get_right_hand_side(&self) -> i64 {
        self.value
    }

    /// Returns true if `self` being true implies that `other` is true.
    pub fn implies(&self, other: Predicate) -> bool {
        if self.get_domain() != other.get_domain()
            || self.get_predicate_type() != other.get_predicate_type()
        {
            return false;
        }

        match self.get_predicate_type() {
            PredicateType::LowerBound => self.value >= other.value,
            PredicateType::UpperBound => self.value <= other.value,
        }
    }

    pub fn trivially_true() -> Predicate {
        // By convention, there is a dummy variable fixed to one at the root.
        // We use it to denote the trivially true predicate.
        let domain_id = DomainId::new(0);
        predicate!(domain_id >= 1)
    }

    pub fn trivially_false() -> Predicate {
        let domain_id = DomainId::new(0);
        predicate!(domain_id <= 0)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Copy, Hash)]
pub enum PredicateType {
    LowerBound,
    UpperBound,
}

impl std::ops::Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Self::Output {
        let domain_id = self.get_domain();
        let value = self.get_right_hand_side();

        match self.get_predicate_type() {
            PredicateType::LowerBound => predicate!(domain_id <= value.saturating_sub(1)),
            PredicateType::UpperBound => predicate!(domain_id >= value.saturating_add(1)),
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if *self == Predicate::trivially_true() {
            write!(f, "[True]")
        } else if *self == Predicate::trivially_false() {
            write!(f, "[False]")
        } else {
            let domain_id = self.get_domain();
            let rhs = self.get_right_hand_side();

            match self.get_predicate_type() {
                PredicateType::LowerBound => write!(f, "[{domain_id} >= {rhs}]"),
                PredicateType::UpperBound => write!(f, "[{domain_id} <= {rhs}]"),
            }
        }
    }
}

impl std::fmt::Debug for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod test {
    use super::Predicate;
    use crate::predicate;
    use crate::variables::DomainId;

    #[test]
    fn negating_trivially_true_predicate() {
        let trivially_true = Predicate::trivially_true();
        let trivially_false = Predicate::trivially_false();
        assert!(!trivially_true == trivially_false);
        assert!(!trivially_false == trivially_true);
    }

    #[test]
    fn tighter_bounds_imply_weaker_bounds() {
        let x = DomainId::new(3);

        assert!(predicate!(x >= 5).implies(predicate!(x >= 2)));
        assert!(!predicate!(x >= 2).implies(predicate!(x >= 5)));
        assert!(predicate!(x <= 2).implies(predicate!(x <= 5)));
        assert!(!predicate!(x <= 2).implies(predicate!(x >= 1)));

        let y = DomainId::new(4);
        assert!(!predicate!(x <= 2).implies(predicate!(y <= 5)));
    }

    #[test]
    fn large_right_hand_sides_are_preserved() {
        let x = DomainId::new(1);
        let predicate = predicate!(x <= i64::from(i32::MAX) * 4);

        assert_eq!(x, predicate.get_domain());
        assert_eq!(i64::from(i32::MAX) * 4, predicate.get_right_hand_side());
    }
}
