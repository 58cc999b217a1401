// #[derive(Aggregate)] implementation
//
// Counts the declared fields and emits the arity, the ordered type list and
// the aggregate <-> sequence bridge for a plain struct.

use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{DeriveInput, Result};

use crate::codegen::{
    empty_assertion_ident, generate_decode, generate_empty_assertion, generate_encode,
    generate_kind, generate_storable_bounds, generate_text_encode,
};
use crate::shape::aggregate_fields;

/// Expands the #[derive(Aggregate)] macro.
///
/// Example expansion:
/// ```ignore
/// // Input:
/// #[derive(Aggregate)]
/// struct Person {
///     pub age: i32,
///     pub name: String,
/// }
///
/// // Output (abridged):
/// impl ::structcast::Aggregate for Person {
///     const NAME: &'static str = "Person";
///     const ARITY: usize = 2usize;
///     const FIELD_NAMES: &'static [&'static str] = &["age", "name"];
///     const FIELD_KINDS: &'static [::structcast::StorageKind] =
///         &[<i32 as Storable>::KIND, <String as Storable>::KIND];
///     type Fields = (i32, String,);
///     type FieldRefs<'__structcast> = (&'__structcast i32, &'__structcast String,)
///     where
///         Self: '__structcast;
///
///     fn decompose(self) -> Self::Fields {
///         let Self { age: __field0, name: __field1 } = self;
///         (__field0, __field1,)
///     }
///
///     fn decompose_ref(&self) -> Self::FieldRefs<'_> {
///         (&self.age, &self.name,)
///     }
///
///     fn compose(fields: Self::Fields) -> Self {
///         let (__field0, __field1,) = fields;
///         Self { age: __field0, name: __field1 }
///     }
///
///     // to_row / to_text_row / from_row_with
/// }
/// ```
pub fn expand_aggregate(input: DeriveInput) -> Result<TokenStream> {
    let fields = aggregate_fields(&input)?;

    let name = &input.ident;
    let display_name = name.unraw().to_string();
    let arity = fields.len();

    let generics = generate_storable_bounds(&input.generics, &fields);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let types: Vec<_> = fields.iter().map(|f| &f.ty).collect();
    let members: Vec<_> = fields.iter().map(|f| &f.member).collect();
    let bindings: Vec<_> = fields.iter().map(|f| &f.binding).collect();
    let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();

    let kinds = fields.iter().map(generate_kind);
    let encodes = fields.iter().map(generate_encode);
    let text_encodes = fields.iter().map(generate_text_encode);

    let decoder = format_ident!("decoder");
    let decodes = fields.iter().map(|f| generate_decode(f, &decoder));

    let (empty_assertion, empty_check) = if arity == 0 {
        let assertion = empty_assertion_ident();
        (
            generate_empty_assertion(name, &input.generics),
            quote! { let () = Self::#assertion; },
        )
    } else {
        (quote! {}, quote! {})
    };
    let ref_lifetime = syn::Lifetime::new("'__structcast", Span::call_site());

    let expanded = quote! {
        #[automatically_derived]
        impl #impl_generics ::structcast::Aggregate for #name #ty_generics #where_clause {
            const NAME: &'static str = #display_name;
            const ARITY: usize = #arity;
            const FIELD_NAMES: &'static [&'static str] = &[#(#names),*];
            const FIELD_KINDS: &'static [::structcast::StorageKind] = &[#(#kinds),*];

            type Fields = (#(#types,)*);
            type FieldRefs<#ref_lifetime> = (#(&#ref_lifetime #types,)*)
            where
                Self: #ref_lifetime;

            fn decompose(self) -> Self::Fields {
                let Self { #(#members: #bindings),* } = self;
                (#(#bindings,)*)
            }

            fn decompose_ref(&self) -> Self::FieldRefs<'_> {
                (#(&self.#members,)*)
            }

            fn compose(fields: Self::Fields) -> Self {
                #empty_check
                let (#(#bindings,)*) = fields;
                Self { #(#members: #bindings),* }
            }

            fn to_row(&self) -> ::structcast::Row {
                ::std::vec![#(#encodes),*]
            }

            fn to_text_row(&self) -> ::std::vec::Vec<::std::string::String> {
                ::std::vec![#(#text_encodes),*]
            }

            fn from_row_with(
                row: ::structcast::Row,
                policy: ::structcast::DecodePolicy,
            ) -> ::structcast::Result<Self> {
                #[allow(unused_mut)]
                let mut #decoder = ::structcast::RowDecoder::new::<Self>(row, policy)?;
                let value = Self { #(#decodes),* };
                #decoder.finish()?;
                ::std::result::Result::Ok(value)
            }
        }

        #empty_assertion
    };

    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::{parse_quote, ImplItem, ItemImpl};

    fn expand_impl(input: DeriveInput) -> ItemImpl {
        let tokens = expand_aggregate(input).unwrap();
        let file: syn::File = syn::parse2(tokens).unwrap();
        file.items
            .into_iter()
            .find_map(|item| match item {
                syn::Item::Impl(item) => Some(item),
                _ => None,
            })
            .unwrap()
    }

    fn arity_of(item: &ItemImpl) -> usize {
        item.items
            .iter()
            .find_map(|item| match item {
                ImplItem::Const(c) if c.ident == "ARITY" => match &c.expr {
                    syn::Expr::Lit(syn::ExprLit {
                        lit: syn::Lit::Int(lit),
                        ..
                    }) => Some(lit.base10_parse::<usize>().unwrap()),
                    _ => None,
                },
                _ => None,
            })
            .unwrap()
    }

    fn fields_type(item: &ItemImpl) -> syn::TypeTuple {
        item.items
            .iter()
            .find_map(|item| match item {
                ImplItem::Type(t) if t.ident == "Fields" => match &t.ty {
                    syn::Type::Tuple(tuple) => Some(tuple.clone()),
                    _ => None,
                },
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_expand_named_struct() {
        let item = expand_impl(parse_quote! {
            struct Person { pub age: i32, pub name: String }
        });
        assert_eq!(arity_of(&item), 2);
        assert_eq!(fields_type(&item).elems.len(), 2);
    }

    #[test]
    fn test_expand_single_field_tuple_struct() {
        let item = expand_impl(parse_quote! {
            struct Id(pub i64);
        });
        assert_eq!(arity_of(&item), 1);
        // (i64,) keeps its trailing comma so it stays a tuple
        assert!(fields_type(&item).elems.trailing_punct());
    }

    #[test]
    fn test_expand_unit_struct_emits_empty_assertion() {
        let tokens = expand_aggregate(parse_quote! { struct Marker; }).unwrap();
        let file: syn::File = syn::parse2(tokens).unwrap();
        assert_eq!(file.items.len(), 2);
        assert!(matches!(&file.items[1], syn::Item::Impl(item) if item.trait_.is_none()));

        let item = expand_impl(parse_quote! { struct Marker; });
        assert_eq!(arity_of(&item), 0);
        assert!(fields_type(&item).elems.is_empty());
    }

    #[test]
    fn test_empty_assertion_keeps_generics() {
        let tokens = expand_aggregate(parse_quote! { struct Tagged<const N: usize>; }).unwrap();
        let file: syn::File = syn::parse2(tokens).unwrap();
        let inherent = match &file.items[1] {
            syn::Item::Impl(item) => item,
            other => panic!("expected inherent impl, got {other:?}"),
        };
        assert_eq!(inherent.generics.params.len(), 1);
        let self_ty = &inherent.self_ty;
        assert_eq!(quote!(#self_ty).to_string(), "Tagged < N >");

        // compose reads the assertion so it is evaluated per instantiation
        let item = expand_impl(parse_quote! { struct Tagged<const N: usize>; });
        let compose = item
            .items
            .iter()
            .find_map(|item| match item {
                ImplItem::Fn(f) if f.sig.ident == "compose" => Some(f),
                _ => None,
            })
            .unwrap();
        assert!(quote!(#compose).to_string().contains("__STRUCTCAST_ASSERT_EMPTY"));
    }

    #[test]
    fn test_expand_emits_borrowed_decompose() {
        let item = expand_impl(parse_quote! {
            struct Person { pub age: i32, pub name: String }
        });
        let refs = item
            .items
            .iter()
            .find_map(|item| match item {
                ImplItem::Type(t) if t.ident == "FieldRefs" => Some(t),
                _ => None,
            })
            .unwrap();
        assert_eq!(refs.generics.params.len(), 1);
        match &refs.ty {
            syn::Type::Tuple(tuple) => {
                assert_eq!(tuple.elems.len(), 2);
                assert!(tuple.elems.iter().all(|ty| matches!(ty, syn::Type::Reference(_))));
            }
            other => panic!("expected tuple, got {other:?}"),
        }
        assert!(item
            .items
            .iter()
            .any(|item| matches!(item, ImplItem::Fn(f) if f.sig.ident == "decompose_ref")));
    }

    #[test]
    fn test_expand_generic_struct_adds_bounds() {
        let item = expand_impl(parse_quote! {
            struct Tagged<T> { pub tag: String, pub value: T }
        });
        let predicates = &item.generics.where_clause.as_ref().unwrap().predicates;
        assert_eq!(predicates.len(), 2);
    }

    #[test]
    fn test_expand_many_fields() {
        let input: DeriveInput = parse_quote! {
            struct Wide {
                pub a0: i32, pub a1: i32, pub a2: i32, pub a3: i32,
                pub a4: i32, pub a5: i32, pub a6: i32, pub a7: i32,
            }
        };
        assert_eq!(arity_of(&expand_impl(input)), 8);
    }

    #[test]
    fn test_expand_rejects_enum() {
        let err = expand_aggregate(parse_quote! { enum E { A } }).unwrap_err();
        assert!(err.to_string().starts_with("unsupported aggregate"));
    }
}
