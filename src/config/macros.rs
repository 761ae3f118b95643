//! Configuration macros for single-declaration config sections
//!
//! `config_struct!` declares a section struct together with its defaults and
//! per-field checks, so the TOML schema, the Rust type, the fallback values and
//! the accepted range live in one place.

/// Define a configuration section with embedded defaults and field checks
///
/// A field may name a check after `=>`. The check is any function taking the
/// dotted field path and a reference to the value, returning
/// `Result<(), CurvepadError>`.
///
/// # Example
/// ```ignore
/// curvepad::config_struct! {
///     pub struct ScanSection {
///         chunk_size: u64 = 100,
///         max_window_attempts: u32 = 3 => at_least_one,
///     }
/// }
///
/// let section = ScanSection::default();
/// assert_eq!(section.chunk_size, 100);
/// assert!(section.check_fields("scan").is_ok());
/// ```
///
/// This generates:
/// - A struct with public fields
/// - A Default implementation with the specified values
/// - Serde support with `#[serde(default)]`, so partial TOML tables are accepted
/// - `check_fields(section)`, running the declared checks in field order
#[macro_export]
macro_rules! config_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_name:ident: $field_type:ty = $default_value:expr $(=> $check:path)?
            ),*
            $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field_name: $field_type,
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $(
                        $field_name: $default_value,
                    )*
                }
            }
        }

        impl $name {
            /// Run the declared field checks, reporting paths under `section`
            #[allow(unused_variables)]
            pub fn check_fields(&self, section: &str) -> Result<(), $crate::errors::CurvepadError> {
                $(
                    $(
                        $check(
                            &format!("{}.{}", section, stringify!($field_name)),
                            &self.$field_name,
                        )?;
                    )?
                )*
                Ok(())
            }
        }
    };
}
