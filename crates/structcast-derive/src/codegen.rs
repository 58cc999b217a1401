// Per-field code generation helpers for #[derive(Aggregate)]
//
// Every field is dispatched through the `Storable` trait, so a field type
// outside the storage-safe set fails to compile at the derive site.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{parse_quote, Generics, Ident};

use crate::shape::AggregateField;

/// Generates the `StorageKind` entry of a field for `FIELD_KINDS`.
pub fn generate_kind(field: &AggregateField) -> TokenStream {
    let ty = &field.ty;
    quote! {
        <#ty as ::structcast::Storable>::KIND
    }
}

/// Generates `Storable::to_storage` for one field of `self`.
pub fn generate_encode(field: &AggregateField) -> TokenStream {
    let member = &field.member;
    quote! {
        ::structcast::Storable::to_storage(&self.#member)
    }
}

/// Generates `Storable::to_storage_text` for one field of `self`.
pub fn generate_text_encode(field: &AggregateField) -> TokenStream {
    let member = &field.member;
    quote! {
        ::structcast::Storable::to_storage_text(&self.#member)
    }
}

/// Generates the struct-literal entry that decodes one field from a row.
///
/// Struct literal fields are evaluated in source order, which is the
/// declaration order the row was checked against.
pub fn generate_decode(field: &AggregateField, decoder: &Ident) -> TokenStream {
    let member = &field.member;
    let ty = &field.ty;
    quote! {
        #member: #decoder.decode::<#ty>()?
    }
}

/// Adds a `Storable` bound for every field type to the type's generics.
pub fn generate_storable_bounds(generics: &Generics, fields: &[AggregateField]) -> Generics {
    let mut generics = generics.clone();
    let where_clause = generics.make_where_clause();
    for field in fields {
        let ty = &field.ty;
        where_clause
            .predicates
            .push(parse_quote!(#ty: ::structcast::Storable));
    }
    generics
}

/// Associated const holding the zero-size check.
pub fn empty_assertion_ident() -> Ident {
    Ident::new("__STRUCTCAST_ASSERT_EMPTY", Span::call_site())
}

/// Generates the check that an aggregate of arity 0 is zero-sized.
///
/// Emitted as an associated const of an inherent impl so generic parameters
/// stay in scope; `compose` reads it, which forces the check for every
/// concrete instantiation.
pub fn generate_empty_assertion(name: &Ident, generics: &Generics) -> TokenStream {
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let assertion = empty_assertion_ident();
    quote! {
        #[automatically_derived]
        impl #impl_generics #name #ty_generics #where_clause {
            #[doc(hidden)]
            const #assertion: () = ::core::assert!(
                ::core::mem::size_of::<Self>() == 0,
                "aggregate with no fields must be zero-sized"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::aggregate_fields;
    use syn::DeriveInput;

    #[test]
    fn test_storable_bound_per_field() {
        let input: DeriveInput = parse_quote! {
            struct Sample<T> { pub id: i64, pub value: T }
        };
        let fields = aggregate_fields(&input).unwrap();
        let generics = generate_storable_bounds(&input.generics, &fields);
        let where_clause = generics.where_clause.unwrap();
        assert_eq!(where_clause.predicates.len(), 2);
    }

    #[test]
    fn test_unsupported_field_type_is_bounded() {
        // `u8` has no Storable impl, so this bound fails at the derive site
        let input: DeriveInput = parse_quote! {
            struct Pixel { pub level: u8 }
        };
        let fields = aggregate_fields(&input).unwrap();
        let generics = generate_storable_bounds(&input.generics, &fields);
        let where_clause = generics.where_clause.unwrap();
        let bounds: Vec<String> = where_clause
            .predicates
            .iter()
            .map(|predicate| quote!(#predicate).to_string())
            .collect();
        assert_eq!(bounds, ["u8 : :: structcast :: Storable"]);
    }

    #[test]
    fn test_decode_uses_member_and_type() {
        let input: DeriveInput = parse_quote! {
            struct Pair(pub i32, pub String);
        };
        let fields = aggregate_fields(&input).unwrap();
        let decoder: Ident = parse_quote!(decoder);
        let tokens = generate_decode(&fields[1], &decoder).to_string();
        assert!(tokens.starts_with("1 :"));
        assert!(tokens.contains("String"));
    }
}
