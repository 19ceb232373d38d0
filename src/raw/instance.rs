// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! This module instantiates the sorts of the symbol environment
//!
//! Sorts known to the environment are hashconsed and managed by a memory [Arena]. There are a
//! number of advantages to use hashconsing:
//! * A sort is globally uniquely allocated in the one arena at most once.
//! * A hashconsed sort is cheap to represent, compare, hash, and clone.
//! * Two sorts are structurally equal iff they are the same object, which coincides with their
//!   canonical renderings being equal.
//!
//! Sort parameters of parametric declarations are represented as nullary sorts carrying the
//! parameter name; the declaration that introduces them tells them apart.

use crate::allocator::{SortAllocator, StrAllocator};
use crate::instantiate_sorts;
use crate::traits::{Allocatable, Contains};
use crate::untyped as u;
use hashconsing::{HConsed, HConsign, HashConsign};
use std::collections::HashMap;

type P<T> = HConsed<T>;

impl<T> Contains for P<T> {
    type T = T;

    #[inline]
    fn inner(&self) -> &Self::T {
        self.get()
    }
}

instantiate_sorts!(P);

/// A substitution of sort parameters, keyed by parameter name
pub type SortSubst = HashMap<String, Sort>;

/// The arena for allocating interned strings and sorts
pub struct Arena {
    string: HConsign<String>,
    sort: HConsign<RSort>,
}

impl Arena {
    pub fn new() -> Self {
        Self {
            string: HConsign::empty(),
            sort: HConsign::empty(),
        }
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl StrAllocator for Arena {
    type Str = Str;

    fn allocate_str(&mut self, s: &str) -> Self::Str {
        self.string.mk(s.into())
    }

    fn allocate_string(&mut self, s: String) -> Self::Str {
        self.string.mk(s)
    }
}

impl SortAllocator<Str, Sort> for Arena {
    fn allocate_sort(&mut self, s: crate::raw::alg::Sort<Str, Sort>) -> Sort {
        self.sort.mk(s.into())
    }
}

/// This trait returns a mutable reference to the underlying [Arena], but it avoids [Arena] itself
/// being an instance.
pub trait HasArena {
    fn arena(&mut self) -> &mut Arena;
}

impl<T> StrAllocator for T
where
    T: HasArena,
{
    type Str = Str;

    fn allocate_str(&mut self, s: &str) -> Self::Str {
        self.arena().allocate_str(s)
    }

    fn allocate_string(&mut self, s: String) -> Self::Str {
        self.arena().allocate_string(s)
    }
}

impl<T> SortAllocator<Str, Sort> for T
where
    T: HasArena,
{
    fn allocate_sort(&mut self, s: crate::raw::alg::Sort<Str, Sort>) -> Sort {
        self.arena().allocate_sort(s)
    }
}

impl<Env: HasArena> Allocatable<Env> for u::Str {
    type Out = Str;

    fn allocate(&self, env: &mut Env) -> Self::Out {
        env.arena().allocate_str(self.as_str())
    }
}

fn allocate_index<Env: HasArena>(idx: &u::Index, env: &mut Env) -> Index {
    match idx {
        u::Index::Numeral(n) => Index::Numeral(n.clone()),
        u::Index::Symbol(s) => Index::Symbol(s.allocate(env)),
    }
}

impl<Env: HasArena> Allocatable<Env> for u::Identifier {
    type Out = Identifier;

    fn allocate(&self, env: &mut Env) -> Self::Out {
        Identifier {
            symbol: self.symbol.allocate(env),
            indices: self.indices.iter().map(|i| allocate_index(i, env)).collect(),
        }
    }
}

/// Intern a located sort as it is written, i.e. without alias expansion
impl<Env: HasArena> Allocatable<Env> for u::Sort {
    type Out = Sort;

    fn allocate(&self, env: &mut Env) -> Self::Out {
        let id = self.identifier().allocate(env);
        let args = self.args().iter().map(|s| s.allocate(env)).collect();
        env.arena().sort(id, args)
    }
}

impl RSort {
    /// The key under which the head of this sort is kept in a symbol table
    pub fn name(&self) -> String {
        self.identifier().to_string()
    }

    pub(crate) fn is_atom(&self) -> bool {
        !self.identifier().is_indexed() && self.args().is_empty()
    }

    /// Check whether this sort is a bare parameter among the given ones
    pub fn as_param<'a>(&self, params: &'a [String]) -> Option<&'a String> {
        if self.is_atom() {
            params.iter().find(|p| p.as_str() == self.sort_name().as_str())
        } else {
            None
        }
    }

    /// Check whether the given parameter occurs in this sort
    pub fn mentions(&self, param: &str) -> bool {
        (self.is_atom() && self.sort_name().as_str() == param)
            || self.args().iter().any(|s| s.mentions(param))
    }
}

/// Try to extend `subst` such that `pattern[subst] == concrete`. Only the names in `params` are
/// unifiable; every other node has to agree structurally.
///
/// `subst` is left in an unspecified state if the unification fails.
pub fn sort_unification(
    params: &[String],
    pattern: &Sort,
    concrete: &Sort,
    subst: &mut SortSubst,
) -> bool {
    if let Some(p) = pattern.as_param(params) {
        return match subst.get(p) {
            Some(bound) => bound == concrete,
            None => {
                subst.insert(p.clone(), concrete.clone());
                true
            }
        };
    }
    pattern.identifier() == concrete.identifier()
        && pattern.args().len() == concrete.args().len()
        && pattern
            .args()
            .iter()
            .zip(concrete.args().iter())
            .all(|(a, b)| sort_unification(params, a, b, subst))
}

/// Return the parameters that `subst` does not map
pub fn subst_missed_vars<'a>(params: &'a [String], subst: &SortSubst) -> Vec<&'a String> {
    params.iter().filter(|p| !subst.contains_key(*p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::ObjectAllocatorExt;

    #[test]
    fn test_hashconsing() {
        let mut arena = Arena::new();
        let int1: Sort = arena.simple_sort("Int");
        let int2: Sort = arena.simple_sort("Int");
        assert_eq!(int1, int2);
        let arr = arena.allocate_str("Array");
        let a = arena.sort_n(arr.clone(), vec![int1.clone(), int2.clone()]);
        let b = arena.sort_n(arr, vec![int2, int1]);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "(Array Int Int)");
    }

    #[test]
    fn test_unification() {
        let mut arena = Arena::new();
        let params = vec!["X".to_string(), "Y".to_string()];
        let x: Sort = arena.simple_sort("X");
        let y: Sort = arena.simple_sort("Y");
        let int: Sort = arena.simple_sort("Int");
        let boolean: Sort = arena.bool_sort();
        let arr = arena.allocate_str("Array");
        let pattern = arena.sort_n(arr.clone(), vec![x.clone(), y]);
        let concrete = arena.sort_n(arr.clone(), vec![int.clone(), boolean.clone()]);
        let mut subst = SortSubst::new();
        assert!(sort_unification(&params, &pattern, &concrete, &mut subst));
        assert_eq!(subst.get("X"), Some(&int));
        assert_eq!(subst.get("Y"), Some(&boolean));
        assert!(subst_missed_vars(&params, &subst).is_empty());

        let pattern = arena.sort_n(arr.clone(), vec![x.clone(), x]);
        let mut subst = SortSubst::new();
        assert!(!sort_unification(&params, &pattern, &concrete, &mut subst));
        assert_eq!(subst_missed_vars(&params, &subst), vec!["Y"]);
    }
}
