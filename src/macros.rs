// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

/// Tie the recursive knot of an algebra: `$N` is a newtype around `$T`, which may mention
/// a fixpoint built from `$N` itself.
#[macro_export]
macro_rules! wrapper_type {
    ($N:ident, $T:ty) => {
        #[derive(Clone, PartialEq, Eq, Hash)]
        pub struct $N(pub $T);

        impl std::ops::Deref for $N {
            type Target = $T;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl $crate::traits::Repr for $N {
            type T = $T;

            fn repr(&self) -> &$T {
                &self.0
            }
        }

        impl $crate::traits::Contains for $N {
            type T = $T;

            #[inline]
            fn inner(&self) -> &$T {
                &self.0
            }
        }

        impl From<$T> for $N {
            fn from(x: $T) -> Self {
                Self(x)
            }
        }

        impl std::fmt::Display for $N {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl std::fmt::Debug for $N {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Debug::fmt(&self.0, f)
            }
        }
    };
}

/// Declare located node kinds: each `$R => $N: $T` introduces the representation `$R` of `$T`
/// and the located node type `$N`.
#[macro_export]
macro_rules! located_types {
    ($wrap:ident; $($R:ident => $N:ident : $T:ty),* $(,)?) => {
        $(
            $crate::wrapper_type!($R, $T);
            pub type $N = $wrap<$R>;
        )*
    };
}
