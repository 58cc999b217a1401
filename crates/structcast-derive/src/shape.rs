// Structural prerequisites for #[derive(Aggregate)]
//
// A plain aggregate is a struct whose whole state is its ordered field list:
// every field reachable from outside the type, nothing hidden behind a
// constructor. Anything else is rejected here, before any code is generated.

use proc_macro2::Span;
use quote::format_ident;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Ident, Member, Result, Type, Visibility};

/// One field of the aggregate, in declaration order.
pub struct AggregateField {
    /// `self.<member>` accessor: ident for named structs, index for tuple structs
    pub member: Member,
    /// Local binding used when destructuring
    pub binding: Ident,
    /// Declared field type
    pub ty: Type,
    /// Name exposed through `FIELD_NAMES`
    pub name: String,
}

/// Validates that `input` is a plain aggregate and returns its fields.
///
/// Rejects:
/// - enums and unions (no single ordered field list)
/// - `#[non_exhaustive]` structs (cannot be built positionally)
/// - private fields, including `pub(self)` (state hidden from positional
///   construction)
///
/// Named, tuple and unit structs are all accepted; a unit struct has arity 0.
pub fn aggregate_fields(input: &DeriveInput) -> Result<Vec<AggregateField>> {
    let data = match &input.data {
        Data::Struct(data) => data,
        Data::Enum(data) => {
            return Err(syn::Error::new_spanned(
                data.enum_token,
                "unsupported aggregate: enums have no fixed field list",
            ));
        }
        Data::Union(data) => {
            return Err(syn::Error::new_spanned(
                data.union_token,
                "unsupported aggregate: unions do not own all of their fields",
            ));
        }
    };

    if let Some(attr) = input
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("non_exhaustive"))
    {
        return Err(syn::Error::new_spanned(
            attr,
            "unsupported aggregate: #[non_exhaustive] structs cannot be built positionally",
        ));
    }

    let declared: Vec<&syn::Field> = match &data.fields {
        Fields::Named(fields) => fields.named.iter().collect(),
        Fields::Unnamed(fields) => fields.unnamed.iter().collect(),
        Fields::Unit => Vec::new(),
    };

    declared
        .into_iter()
        .enumerate()
        .map(|(index, field)| {
            if is_private(&field.vis) {
                return Err(syn::Error::new_spanned(
                    field,
                    "unsupported aggregate: private fields cannot be set positionally, \
                     mark the field `pub`",
                ));
            }

            let (member, name) = match &field.ident {
                Some(ident) => (Member::Named(ident.clone()), ident.unraw().to_string()),
                None => (
                    Member::Unnamed(syn::Index {
                        index: index as u32,
                        span: Span::call_site(),
                    }),
                    index.to_string(),
                ),
            };

            Ok(AggregateField {
                member,
                binding: format_ident!("__field{}", index),
                ty: field.ty.clone(),
                name,
            })
        })
        .collect()
}

/// No visibility, or `pub(self)`, which means the same thing.
fn is_private(vis: &Visibility) -> bool {
    match vis {
        Visibility::Inherited => true,
        Visibility::Restricted(restricted) => restricted.path.is_ident("self"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn error_of(input: DeriveInput) -> String {
        match aggregate_fields(&input) {
            Ok(_) => panic!("expected rejection"),
            Err(e) => e.to_string(),
        }
    }

    #[test]
    fn test_named_struct_fields() {
        let input: DeriveInput = parse_quote! {
            struct Person {
                pub age: i32,
                pub name: String,
            }
        };
        let fields = aggregate_fields(&input).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "age");
        assert_eq!(fields[1].name, "name");
        assert_eq!(fields[1].binding, "__field1");
        assert!(matches!(&fields[0].member, Member::Named(id) if id == "age"));
    }

    #[test]
    fn test_tuple_struct_fields_named_by_index() {
        let input: DeriveInput = parse_quote! {
            pub struct Pair(pub i64, pub(crate) bool);
        };
        let fields = aggregate_fields(&input).unwrap();
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["0", "1"]);
        assert!(matches!(&fields[1].member, Member::Unnamed(idx) if idx.index == 1));
    }

    #[test]
    fn test_unit_and_empty_structs_have_no_fields() {
        let unit: DeriveInput = parse_quote! { struct Marker; };
        let braced: DeriveInput = parse_quote! { struct Marker {} };
        let paren: DeriveInput = parse_quote! { struct Marker(); };
        assert!(aggregate_fields(&unit).unwrap().is_empty());
        assert!(aggregate_fields(&braced).unwrap().is_empty());
        assert!(aggregate_fields(&paren).unwrap().is_empty());
    }

    #[test]
    fn test_raw_identifier_name() {
        let input: DeriveInput = parse_quote! {
            struct Column { pub r#type: String }
        };
        let fields = aggregate_fields(&input).unwrap();
        assert_eq!(fields[0].name, "type");
    }

    #[test]
    fn test_reject_enum() {
        let msg = error_of(parse_quote! {
            enum Shape { Circle(f64), Square(f64) }
        });
        assert!(msg.contains("unsupported aggregate"));
        assert!(msg.contains("enums"));
    }

    #[test]
    fn test_reject_union() {
        let msg = error_of(parse_quote! {
            union Bits { pub i: i32, pub f: f32 }
        });
        assert!(msg.contains("unions"));
    }

    #[test]
    fn test_reject_private_field() {
        let msg = error_of(parse_quote! {
            struct Account { pub id: i64, balance: f64 }
        });
        assert!(msg.contains("private fields"));
    }

    #[test]
    fn test_reject_private_tuple_field() {
        let msg = error_of(parse_quote! {
            struct Wrapper(i32);
        });
        assert!(msg.contains("private fields"));
    }

    #[test]
    fn test_reject_pub_self_field() {
        let msg = error_of(parse_quote! {
            pub struct Account { pub id: i64, pub(self) secret: i64 }
        });
        assert!(msg.contains("private fields"));

        let msg = error_of(parse_quote! {
            pub struct Account { pub id: i64, pub(in self) secret: i64 }
        });
        assert!(msg.contains("private fields"));
    }

    #[test]
    fn test_accept_restricted_visibility() {
        let input: DeriveInput = parse_quote! {
            pub struct Account { pub(crate) id: i64, pub(super) owner: String }
        };
        assert_eq!(aggregate_fields(&input).unwrap().len(), 2);
    }

    #[test]
    fn test_reject_non_exhaustive() {
        let msg = error_of(parse_quote! {
            #[non_exhaustive]
            pub struct Config { pub retries: i32 }
        });
        assert!(msg.contains("non_exhaustive"));
    }
}
