// structcast-derive: structural reflection glue for plain aggregates
//
// Provides the #[derive(Aggregate)] macro. The field count, the ordered
// field type list and the aggregate <-> sequence bridge are all read off
// the struct declaration; nothing is registered by hand.
//
// Example:
// ```
// use structcast::Aggregate;
//
// #[derive(Aggregate)]
// struct Person {
//     pub age: i32,
//     pub name: String,
// }
// ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod aggregate;
mod codegen;
mod shape;

/// Derives `structcast::Aggregate` for a plain struct.
///
/// Generates:
/// - `ARITY`, the number of declared fields
/// - `Fields`, the tuple of field types in declaration order
/// - `FIELD_NAMES` and `FIELD_KINDS`, the runtime view of the type list
/// - `decompose`/`compose` between the struct and its field tuple, and
///   `decompose_ref` for a tuple of field references
/// - `to_row`/`to_text_row`/`from_row_with` through each field's `Storable` impl
///
/// The struct must be a plain aggregate: every field visible outside the
/// type (`pub(self)` counts as private), no `#[non_exhaustive]`, not an enum
/// or union. Violations are compile errors starting `unsupported aggregate:`.
///
/// Every field type must implement `structcast::Storable`. The derive adds a
/// `FieldType: ::structcast::Storable` bound per field, so a field outside
/// the storage-safe set fails the build at the derive site:
///
/// ```ignore
/// #[derive(Aggregate)]
/// pub struct Pixel {
///     pub level: u8, // error[E0277]: the trait bound `u8: Storable` is not satisfied
/// }
/// ```
///
/// Zero-field structs, generic ones included, also get a compile-time check
/// that the type is zero-sized.
///
/// # Example
///
/// ```ignore
/// #[derive(Aggregate)]
/// pub struct Reading(pub i64, pub f64);
///
/// assert_eq!(Reading::ARITY, 2);
/// ```
#[proc_macro_derive(Aggregate)]
pub fn derive_aggregate(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    aggregate::expand_aggregate(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
