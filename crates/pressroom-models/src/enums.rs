use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{value}` is not a valid {type_name} (expected one of: {expected})")]
pub struct ParseEnumError {
    pub type_name: &'static str,
    pub value: String,
    pub expected: String,
}

/// Declares a closed string enum stored as its lowercase literal.
///
/// Generates `VALUES`, `as_str`, `Display`, `FromStr` and serde impls that
/// reject every literal outside the declared set.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $literal:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $literal)]
                $variant,
            )+
        }

        impl $name {
            /// Storable literals in declaration order.
            pub const VALUES: &'static [&'static str] = &[$($literal),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $literal, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::enums::ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $literal => Ok($name::$variant), )+
                    other => Err($crate::enums::ParseEnumError {
                        type_name: stringify!($name),
                        value: other.to_string(),
                        expected: Self::VALUES.join(", "),
                    }),
                }
            }
        }
    };
}

pub(crate) use string_enum;
