//! Language tags understood by the detector and the toolchain registry

/// Declares a closed tag enum with a stable serde name, a display name and
/// optional lookup aliases.
#[macro_export]
macro_rules! define_tag_enum {
    (
        $(#[$enum_meta:meta])*
        $enum_name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $serde_name:literal : $display_name:literal
                $( | $alias:literal )*
            ),* $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $enum_name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
        }

        impl serde::Serialize for $enum_name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.serde_name())
            }
        }

        impl<'de> serde::Deserialize<'de> for $enum_name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                match s.as_str() {
                    $(
                        $serde_name => Ok(Self::$variant),
                    )*
                    other => Err(serde::de::Error::custom(format!(
                        "unknown {}: {}",
                        stringify!($enum_name),
                        other
                    ))),
                }
            }
        }

        impl $enum_name {
            pub fn name(&self) -> &'static str {
                match self {
                    $(
                        Self::$variant => $display_name,
                    )*
                }
            }

            pub fn serde_name(&self) -> &'static str {
                match self {
                    $(
                        Self::$variant => $serde_name,
                    )*
                }
            }

            /// Case-insensitive lookup by display name, serde name or alias
            pub fn from_name(name: &str) -> Option<Self> {
                let lower = name.to_lowercase();
                $(
                    if lower == $display_name.to_lowercase()
                        || lower == $serde_name
                        $(|| lower == $alias)*
                    {
                        return Some(Self::$variant);
                    }
                )*
                None
            }

            pub fn all_variants() -> &'static [Self] {
                &[
                    $(
                        Self::$variant,
                    )*
                ]
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.name())
            }
        }
    };
}

define_tag_enum! {
    /// A language the catalog knows how to recognise
    LanguageTag {
        Java => "java" : "Java",
        Python => "python" : "Python" | "py" | "python3",
        JavaScript => "javascript" : "JavaScript" | "js" | "node",
        R => "r" : "R" | "rscript",
        Kotlin => "kotlin" : "Kotlin" | "kt",
        /// Python-syntax variant run by its own interpreter
        MicroPython => "micropython" : "MicroPython" | "upy",
    }
}
