// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

/// Instantiate the sort fragment of the algebra with a wrapper type; both the located AST and the
/// interned sorts of the symbol environment share it.
#[macro_export]
macro_rules! instantiate_sorts {
    ($Wrapper: ident) => {
        use $crate::wrapper_type;

        pub type Str = $Wrapper<String>;

        pub type Constant = $crate::raw::alg::Constant<Str>;

        pub type Index = $crate::raw::alg::Index<Str>;

        pub type Identifier = $crate::raw::alg::Identifier<Str>;

        pub type Sort = $Wrapper<RSort>;

        wrapper_type!(RSort, $crate::raw::alg::Sort<Str, Sort>);
    };
}
