// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Allocator traits for an arena
//!
//! These traits are responsible for object allocations **only**. Whether an allocated sort is
//! known to the symbol environment is checked elsewhere.

use crate::raw::alg::*;
use crate::statics::BOOL;

/// The ability to allocate strings
pub trait StrAllocator {
    type Str;

    /// The underlying machinery to hash cons a string
    fn allocate_str(&mut self, s: &str) -> Self::Str;
    /// The underlying machinery to hash cons a string
    fn allocate_string(&mut self, s: String) -> Self::Str;
}

/// The ability to allocate sorts
pub trait SortAllocator<Str, So> {
    fn allocate_sort(&mut self, s: Sort<Str, So>) -> So;

    fn sort(&mut self, id: Identifier<Str>, ss: Vec<So>) -> So {
        self.allocate_sort(Sort(id, ss))
    }

    fn sort0(&mut self, s: Str) -> So {
        self.sort_n(s, vec![])
    }

    fn sort_n(&mut self, s: Str, ss: Vec<So>) -> So {
        self.allocate_sort(Sort(Identifier::simple(s), ss))
    }
}

/// Extension trait for more functions
pub trait ObjectAllocatorExt<So>: StrAllocator + SortAllocator<Self::Str, So> {
    fn simple_sort(&mut self, s: &str) -> So {
        let s = self.allocate_str(s);
        self.sort0(s)
    }

    fn bool_sort(&mut self) -> So {
        self.simple_sort(BOOL)
    }
}

impl<So, X> ObjectAllocatorExt<So> for X where X: StrAllocator + SortAllocator<Self::Str, So> {}
