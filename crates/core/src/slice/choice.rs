// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-set string enums
//!
//! The `NAMES` table generated for each enum is what the schemas point at,
//! so the serialized names and the validator's allowed set cannot drift.

use thiserror::Error;

/// A string that is not a member of a choice enum
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}' (expected one of {expected})")]
pub struct UnknownChoice {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident default $default:ident {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $text)] $variant),+
        }

        impl $name {
            /// Serialized names, in declaration order
            pub const NAMES: &'static [&'static str] = &[$($text),+];
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::slice::UnknownChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err($crate::slice::UnknownChoice {
                        kind: stringify!($name),
                        value: other.to_string(),
                        expected: Self::NAMES.join("|"),
                    }),
                }
            }
        }
    };
}
