//! Enumeration types for constrained column values.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when text does not name a variant of a closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    /// Name of the enumeration that was being parsed.
    pub kind: &'static str,
    /// Text that matched no variant.
    pub value: String,
}

/// Defines a closed enumeration whose wire form is an exact, case-sensitive
/// string, with `ALL`, `as_str`, `FromStr` and `Display`.
macro_rules! define_text_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the exact wire text of this variant.
            #[inline]
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            #[inline]
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(UnknownVariant {
                        kind: $kind,
                        value: s.to_owned(),
                    }),
                }
            }
        }

        impl core::fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_text_enum! {
    /// Classification of a ledger entry, shared with account categories.
    TransactionType, "transaction type" {
        /// Asset entry.
        Asset => "ASSET",
        /// Liability entry.
        Liability => "LIABILITY",
        /// Equity entry.
        Equity => "EQUITY",
        /// Income entry.
        Income => "INCOME",
        /// Expense entry.
        Expense => "EXPENSE",
    }
}

define_text_enum! {
    /// Region a transaction is booked against.
    ///
    /// Only these names are accepted by the importer; matching is exact.
    Region, "region" {
        /// Jakarta Pusat.
        JakartaPusat => "Jakarta Pusat",
        /// Jakarta Barat.
        JakartaBarat => "Jakarta Barat",
        /// Jakarta Selatan.
        JakartaSelatan => "Jakarta Selatan",
        /// Jakarta Timur.
        JakartaTimur => "Jakarta Timur",
        /// Jakarta Utara.
        JakartaUtara => "Jakarta Utara",
        /// Bandung.
        Bandung => "Bandung",
        /// Surabaya.
        Surabaya => "Surabaya",
        /// Medan.
        Medan => "Medan",
        /// Semarang.
        Semarang => "Semarang",
        /// Makassar.
        Makassar => "Makassar",
        /// Palembang.
        Palembang => "Palembang",
        /// Bali.
        Bali => "Bali",
        /// Yogyakarta.
        Yogyakarta => "Yogyakarta",
        /// Tangerang.
        Tangerang => "Tangerang",
        /// Bekasi.
        Bekasi => "Bekasi",
        /// Depok.
        Depok => "Depok",
        /// Bogor.
        Bogor => "Bogor",
        /// Malang.
        Malang => "Malang",
        /// Padang.
        Padang => "Padang",
        /// Pontianak.
        Pontianak => "Pontianak",
        /// Banjarmasin.
        Banjarmasin => "Banjarmasin",
        /// Lampung.
        Lampung => "Lampung",
        /// Aceh.
        Aceh => "Aceh",
        /// Manado.
        Manado => "Manado",
        /// Papua.
        Papua => "Papua",
        /// Riau.
        Riau => "Riau",
        /// Jambi.
        Jambi => "Jambi",
    }
}

/// Joins the wire names of all variants with `", "`.
pub(crate) fn joined_names<T: Copy>(all: &[T], name: fn(T) -> &'static str) -> String {
    all.iter().map(|v| name(*v)).collect::<Vec<_>>().join(", ")
}
