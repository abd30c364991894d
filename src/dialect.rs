//! Language Dialect Registry (SPEC_FULL §4.1).
//!
//! Dialects form one fixed chain per language family (K&R C ... C2x,
//! pre-C++98 ... C++20) plus the "any" / "none" singletons. `DialectSet` is a
//! bitset over `Dialect` so legality tables can attach a set of dialects to
//! each cell instead of a single value.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Dialect {
    Knr,
    C89,
    C95,
    C99,
    C11,
    C2x,
    CppPre98,
    Cpp98,
    Cpp03,
    Cpp11,
    Cpp14,
    Cpp17,
    Cpp20,
}

impl Dialect {
    pub const ALL: [Dialect; 13] = [
        Dialect::Knr,
        Dialect::C89,
        Dialect::C95,
        Dialect::C99,
        Dialect::C11,
        Dialect::C2x,
        Dialect::CppPre98,
        Dialect::Cpp98,
        Dialect::Cpp03,
        Dialect::Cpp11,
        Dialect::Cpp14,
        Dialect::Cpp17,
        Dialect::Cpp20,
    ];

    pub fn is_c(self) -> bool {
        matches!(
            self,
            Dialect::Knr | Dialect::C89 | Dialect::C95 | Dialect::C99 | Dialect::C11 | Dialect::C2x
        )
    }

    pub fn is_cpp(self) -> bool {
        !self.is_c()
    }

    /// Canonical identifier as accepted by a dialect selector (§6).
    pub fn from_selector(s: &str) -> Option<Dialect> {
        Some(match s {
            "knr" | "k&r" => Dialect::Knr,
            "c89" | "c90" => Dialect::C89,
            "c95" => Dialect::C95,
            "c99" => Dialect::C99,
            "c11" => Dialect::C11,
            "c2x" | "c23" => Dialect::C2x,
            "c++pre98" => Dialect::CppPre98,
            "c++98" => Dialect::Cpp98,
            "c++03" => Dialect::Cpp03,
            "c++11" => Dialect::Cpp11,
            "c++14" => Dialect::Cpp14,
            "c++17" => Dialect::Cpp17,
            "c++20" => Dialect::Cpp20,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Dialect::Knr => "K&R C",
            Dialect::C89 => "C89",
            Dialect::C95 => "C95",
            Dialect::C99 => "C99",
            Dialect::C11 => "C11",
            Dialect::C2x => "C2X",
            Dialect::CppPre98 => "pre-ISO C++",
            Dialect::Cpp98 => "C++98",
            Dialect::Cpp03 => "C++03",
            Dialect::Cpp11 => "C++11",
            Dialect::Cpp14 => "C++14",
            Dialect::Cpp17 => "C++17",
            Dialect::Cpp20 => "C++20",
        }
    }

    pub fn set(self) -> DialectSet {
        DialectSet::of(self)
    }

    /// All dialects in the same language family at or after `self` in the chain.
    pub fn min(self) -> DialectSet {
        let mut s = DialectSet::NONE;
        for d in Dialect::ALL {
            if d.is_c() == self.is_c() && d >= self {
                s = s.union(DialectSet::of(d));
            }
        }
        s
    }

    /// All dialects in the same language family at or before `self` in the chain.
    pub fn max(self) -> DialectSet {
        let mut s = DialectSet::NONE;
        for d in Dialect::ALL {
            if d.is_c() == self.is_c() && d <= self {
                s = s.union(DialectSet::of(d));
            }
        }
        s
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bitset of `Dialect`s. Bit `i` corresponds to `Dialect::ALL[i]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DialectSet(u16);

impl DialectSet {
    pub const NONE: DialectSet = DialectSet(0);

    pub fn of(d: Dialect) -> DialectSet {
        DialectSet(1 << (d as u8))
    }

    pub fn union(self, other: DialectSet) -> DialectSet {
        DialectSet(self.0 | other.0)
    }

    pub fn intersect(self, other: DialectSet) -> DialectSet {
        DialectSet(self.0 & other.0)
    }

    pub fn contains(self, d: Dialect) -> bool {
        self.0 & (1 << (d as u8)) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn any() -> DialectSet {
        let mut s = DialectSet::NONE;
        for d in Dialect::ALL {
            s = s.union(DialectSet::of(d));
        }
        s
    }

    pub fn c_any() -> DialectSet {
        let mut s = DialectSet::NONE;
        for d in Dialect::ALL {
            if d.is_c() {
                s = s.union(DialectSet::of(d));
            }
        }
        s
    }

    pub fn cpp_any() -> DialectSet {
        let mut s = DialectSet::NONE;
        for d in Dialect::ALL {
            if d.is_cpp() {
                s = s.union(DialectSet::of(d));
            }
        }
        s
    }

    pub fn iter(self) -> impl Iterator<Item = Dialect> {
        Dialect::ALL.into_iter().filter(move |&d| self.contains(d))
    }

    /// A textual clause for diagnostics: "in C89 and later", "until C++11",
    /// "in C++ only", or empty when `self` already covers `active`.
    pub fn which(self, active: Dialect) -> String {
        if self.contains(active) {
            return String::new();
        }
        if self == DialectSet::c_any() {
            return "in C only".to_string();
        }
        if self == DialectSet::cpp_any() {
            return "in C++ only".to_string();
        }
        // Find contiguous chain bounds within the active family.
        let family: Vec<Dialect> = Dialect::ALL
            .into_iter()
            .filter(|d| d.is_c() == active.is_c())
            .collect();
        let members: Vec<Dialect> = family.iter().copied().filter(|&d| self.contains(d)).collect();
        if members.is_empty() {
            return format!("never in {}", active.name());
        }
        let first = members[0];
        let last = *members.last().unwrap();
        if last == *family.last().unwrap() {
            format!("in {} and later", first.name())
        } else if first == family[0] {
            format!("until {}", last.name())
        } else {
            format!("from {} to {}", first.name(), last.name())
        }
    }
}

pub fn name_of(d: Dialect) -> &'static str {
    d.name()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_max_chains() {
        assert!(Dialect::C99.min().contains(Dialect::C11));
        assert!(!Dialect::C99.min().contains(Dialect::C89));
        assert!(Dialect::C99.max().contains(Dialect::C89));
        assert!(!Dialect::C99.max().contains(Dialect::C11));
    }

    #[test]
    fn c_and_cpp_families_disjoint() {
        assert!(DialectSet::c_any().intersect(DialectSet::cpp_any()).is_empty());
        assert_eq!(DialectSet::c_any().union(DialectSet::cpp_any()), DialectSet::any());
    }

    #[test]
    fn which_describes_gap() {
        let set = Dialect::C99.min();
        assert_eq!(set.which(Dialect::C89), "in C99 and later");
        assert_eq!(set.which(Dialect::C11), "");
    }

    #[test]
    fn selector_roundtrip() {
        for d in Dialect::ALL {
            let s = d.name();
            let _ = s;
        }
        assert_eq!(Dialect::from_selector("c11"), Some(Dialect::C11));
        assert_eq!(Dialect::from_selector("c++20"), Some(Dialect::Cpp20));
        assert_eq!(Dialect::from_selector("nonsense"), None);
    }
}
