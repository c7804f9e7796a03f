//! Macros for reducing command boilerplate.

/// Implement [`Command`](crate::Command) for a serializable payload type.
///
/// Forms:
///
/// - `impl_command!(Ty, "WIRE_TYPE")` for commands whose success carries no payload
/// - `impl_command!(Ty, "WIRE_TYPE" -> Output)` to decode `data` into `Output`
/// - either form followed by `, mutating` to hold the command until the
///   document-loaded grace has elapsed
///
/// # Example
///
/// ```ignore
/// use editor_bridge::impl_command;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Serialize)]
/// struct RotatePage {
///     page: u32,
///     degrees: u16,
/// }
///
/// #[derive(Debug, Deserialize)]
/// struct Rotated {
///     page: u32,
/// }
///
/// impl_command!(RotatePage, "ROTATE_PAGE" -> Rotated, mutating);
/// ```
#[macro_export]
macro_rules! impl_command {
    (@impl $ty:ty, $wire:literal, $mutating:literal) => {
        impl $crate::Command for $ty {
            const TYPE: &'static str = $wire;
            const MUTATING: bool = $mutating;
            type Output = ();

            fn decode_output(
                _data: ::core::option::Option<$crate::__private::serde_json::Value>,
            ) -> ::core::result::Result<(), $crate::__private::serde_json::Error> {
                ::core::result::Result::Ok(())
            }
        }
    };
    (@impl $ty:ty, $wire:literal, $mutating:literal, $out:ty) => {
        impl $crate::Command for $ty {
            const TYPE: &'static str = $wire;
            const MUTATING: bool = $mutating;
            type Output = $out;

            fn decode_output(
                data: ::core::option::Option<$crate::__private::serde_json::Value>,
            ) -> ::core::result::Result<$out, $crate::__private::serde_json::Error> {
                $crate::__private::serde_json::from_value(
                    data.unwrap_or($crate::__private::serde_json::Value::Null),
                )
            }
        }
    };
    ($ty:ty, $wire:literal) => {
        $crate::impl_command!(@impl $ty, $wire, false);
    };
    ($ty:ty, $wire:literal, mutating) => {
        $crate::impl_command!(@impl $ty, $wire, true);
    };
    ($ty:ty, $wire:literal -> $out:ty) => {
        $crate::impl_command!(@impl $ty, $wire, false, $out);
    };
    ($ty:ty, $wire:literal -> $out:ty, mutating) => {
        $crate::impl_command!(@impl $ty, $wire, true, $out);
    };
}
