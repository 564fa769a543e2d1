//! Relationship reference resolution.
//!
//! Organizers enter constraints informally: sometimes by id, sometimes by
//! name. Every reference is normalized to a pool index exactly once, before
//! clustering; nothing downstream sees raw references.
//!
//! # Rules
//! 1. Exact id match (then whitespace-trimmed id match).
//! 2. Name match, trimmed and case-insensitive, if exactly one eligible
//!    individual carries that name.
//! 3. Anything else is unresolved (unknown or ambiguous) and ignored.

use std::collections::HashMap;

use crate::models::Individual;

/// Outcome of resolving one reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Pool index of the referenced individual.
    Resolved(usize),
    /// No eligible individual matches.
    Unknown,
    /// Several eligible individuals share the referenced name.
    Ambiguous,
}

#[derive(Debug, Clone, Copy)]
enum NameEntry {
    Unique(usize),
    Ambiguous,
}

/// Lookup tables over the eligible pool.
#[derive(Debug)]
pub struct ReferenceResolver<'a> {
    by_id: HashMap<&'a str, usize>,
    by_name: HashMap<String, NameEntry>,
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl<'a> ReferenceResolver<'a> {
    /// Indexes the pool by id and by normalized name.
    pub fn new(pool: &[&'a Individual]) -> Self {
        let mut by_id = HashMap::with_capacity(pool.len());
        let mut by_name: HashMap<String, NameEntry> = HashMap::with_capacity(pool.len());

        for (idx, individual) in pool.iter().enumerate() {
            by_id.insert(individual.id.as_str(), idx);

            let key = name_key(&individual.name);
            if key.is_empty() {
                continue;
            }
            by_name
                .entry(key)
                .and_modify(|e| *e = NameEntry::Ambiguous)
                .or_insert(NameEntry::Unique(idx));
        }

        Self { by_id, by_name }
    }

    /// Resolves a reference to a pool index.
    pub fn resolve(&self, reference: &str) -> Resolution {
        if let Some(&idx) = self.by_id.get(reference) {
            return Resolution::Resolved(idx);
        }
        let trimmed = reference.trim();
        if let Some(&idx) = self.by_id.get(trimmed) {
            return Resolution::Resolved(idx);
        }
        match self.by_name.get(&name_key(trimmed)) {
            Some(NameEntry::Unique(idx)) => Resolution::Resolved(*idx),
            Some(NameEntry::Ambiguous) => Resolution::Ambiguous,
            None => Resolution::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Individual> {
        vec![
            Individual::new("10", 5.0).with_name("Shira"),
            Individual::new("11", 6.0).with_name("Eli"),
            Individual::new("12", 7.0).with_name("eli "),
            Individual::new("13", 8.0).with_name("Maya"),
        ]
    }

    #[test]
    fn test_resolve_by_id() {
        let r = roster();
        let pool: Vec<&Individual> = r.iter().collect();
        let resolver = ReferenceResolver::new(&pool);
        assert_eq!(resolver.resolve("13"), Resolution::Resolved(3));
        assert_eq!(resolver.resolve(" 10 "), Resolution::Resolved(0));
    }

    #[test]
    fn test_resolve_by_name_case_insensitive() {
        let r = roster();
        let pool: Vec<&Individual> = r.iter().collect();
        let resolver = ReferenceResolver::new(&pool);
        assert_eq!(resolver.resolve("maya"), Resolution::Resolved(3));
        assert_eq!(resolver.resolve("  SHIRA"), Resolution::Resolved(0));
    }

    #[test]
    fn test_ambiguous_name() {
        let r = roster();
        let pool: Vec<&Individual> = r.iter().collect();
        let resolver = ReferenceResolver::new(&pool);
        assert_eq!(resolver.resolve("Eli"), Resolution::Ambiguous);
    }

    #[test]
    fn test_unknown_reference() {
        let r = roster();
        let pool: Vec<&Individual> = r.iter().collect();
        let resolver = ReferenceResolver::new(&pool);
        assert_eq!(resolver.resolve("99"), Resolution::Unknown);
        assert_eq!(resolver.resolve(""), Resolution::Unknown);
    }

    #[test]
    fn test_id_takes_precedence_over_name() {
        let r = vec![
            Individual::new("Noa", 5.0).with_name("Someone"),
            Individual::new("2", 6.0).with_name("Noa"),
        ];
        let pool: Vec<&Individual> = r.iter().collect();
        let resolver = ReferenceResolver::new(&pool);
        assert_eq!(resolver.resolve("Noa"), Resolution::Resolved(0));
    }
}
