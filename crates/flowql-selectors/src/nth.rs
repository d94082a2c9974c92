// SPDX-License-Identifier: MIT OR Apache-2.0

/// An `An+B` expression, as used by `:nth-child` and its siblings (§4.1).
///
/// `even` parses to `Nth { a: 2, b: 0 }`, `odd` to `Nth { a: 2, b: 1 }`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nth {
    pub a: i64,
    pub b: i64,
}

impl Nth {
    pub const fn integer(b: i64) -> Self {
        Self { a: 0, b }
    }

    pub const EVEN: Self = Self { a: 2, b: 0 };
    pub const ODD: Self = Self { a: 2, b: 1 };

    /// True iff `pos` (1-based) satisfies this expression (§4.3 positional
    /// pseudo-classes): `(pos - B) / A` is a non-negative integer when
    /// `A != 0`, or `pos == B` when `A == 0`.
    pub fn matches(&self, pos: i64) -> bool {
        if self.a == 0 {
            return pos == self.b;
        }
        let diff = pos - self.b;
        if diff == 0 {
            return true;
        }
        diff.signum() == self.a.signum() && diff % self.a == 0
    }

    /// Parse the contents of an `An+B` expression, tolerant of internal
    /// whitespace (§4.1 `<nth>`). Accepts `even`, `odd`, a bare integer, or
    /// `An+B` / `An-B` / `-An+B` forms.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "even" => return Some(Self::EVEN),
            "odd" => return Some(Self::ODD),
            _ => {}
        }

        let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
        if let Some(n_index) = compact.to_ascii_lowercase().find('n') {
            let (a_part, rest) = compact.split_at(n_index);
            let a = match a_part {
                "" | "+" => 1,
                "-" => -1,
                other => other.parse().ok()?,
            };
            let b_part = &rest[1..];
            let b = if b_part.is_empty() {
                0
            } else {
                b_part.parse().ok()?
            };
            Some(Self { a, b })
        } else {
            compact.parse().ok().map(Self::integer)
        }
    }

    pub fn to_selector_string(self) -> String {
        if *self == Self::EVEN {
            "even".to_string()
        } else if *self == Self::ODD {
            "odd".to_string()
        } else if self.a == 0 {
            self.b.to_string()
        } else {
            match self.b.cmp(&0) {
                std::cmp::Ordering::Equal => format!("{}n", self.a),
                std::cmp::Ordering::Greater => format!("{}n+{}", self.a, self.b),
                std::cmp::Ordering::Less => format!("{}n{}", self.a, self.b),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_even_odd_and_an_plus_b() {
        assert_eq!(Nth::parse("even"), Some(Nth::EVEN));
        assert_eq!(Nth::parse("odd"), Some(Nth::ODD));
        assert_eq!(Nth::parse("2n+1"), Some(Nth { a: 2, b: 1 }));
        assert_eq!(Nth::parse(" 3n - 2 "), Some(Nth { a: 3, b: -2 }));
        assert_eq!(Nth::parse("5"), Some(Nth::integer(5)));
        assert_eq!(Nth::parse("-n+3"), Some(Nth { a: -1, b: 3 }));
    }

    #[test]
    fn matches_positions_per_formula() {
        assert!(Nth::EVEN.matches(2));
        assert!(!Nth::EVEN.matches(3));
        assert!(Nth::ODD.matches(1));
        assert!(Nth::integer(3).matches(3));
        assert!(!Nth::integer(3).matches(4));
        let an_plus_b = Nth { a: 2, b: 1 };
        assert!(an_plus_b.matches(1));
        assert!(an_plus_b.matches(3));
        assert!(!an_plus_b.matches(2));
    }
}
