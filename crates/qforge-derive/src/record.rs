//! Record derive macro implementation
//!
//! ## Module Structure
//!
//! - `attrs`: Struct and field attribute parsing
//!
//! The generated `describe()` mirrors the struct declaration; `value_at()`
//! reads the field at the same index. The value helper is picked from the
//! field type:
//!
//! | type                      | shape  | helper                   |
//! |---------------------------|--------|--------------------------|
//! | `bool`                    | Flag   | `FieldValue::Flag`       |
//! | `Option<Vec<T>>`/`Vec<T>` | List   | `opt_list` / `list`      |
//! | `Option<(T, T)>`          | Range  | `opt_range`              |
//! | `Option<Q>` + `filter`    | Filter | `opt_filter`             |
//! | `Option<T>` / `T`         | Scalar | `opt` / `scalar`         |

mod attrs;

use crate::common::syn_types::{is_bool, is_pair, option_inner, vec_inner};
use attrs::{FieldAttr, NestedAttr, SubqueryAttr};
use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Result};

struct DescribedField {
    builder: TokenStream,
    value: TokenStream,
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let name_str = name.to_string();

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Record cannot be derived for generic types",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Record can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Record can only be derived for structs",
            ));
        }
    };

    let table = attrs::table_template(&input.attrs)?;
    let table_call = table.map(|lit| quote! { .table(#lit) });

    let mut described = Vec::new();
    let mut page_fn = None;
    for field in fields {
        let attr = attrs::field_attr(&field.attrs)?;
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;

        if attr.page {
            if page_fn.is_some() {
                return Err(syn::Error::new_spanned(field, "only one `page` field is allowed"));
            }
            page_fn = Some(page_method(field, ident)?);
            continue;
        }
        described.push(describe_field(field, ident, attr)?);
    }

    let builders = described.iter().map(|d| &d.builder);
    let arms = described.iter().enumerate().map(|(i, d)| {
        let value = &d.value;
        quote! { #i => #value, }
    });

    Ok(quote! {
        impl ::qforge::Record for #name {
            fn describe() -> ::qforge::OrmResult<::qforge::RecordDescriptor> {
                ::qforge::RecordDescriptor::builder(#name_str)
                    #table_call
                    #( .field(#builders) )*
                    .build()
            }

            fn value_at(&self, index: usize) -> ::qforge::FieldValue<'_> {
                match index {
                    #( #arms )*
                    _ => ::qforge::FieldValue::Null,
                }
            }

            #page_fn
        }
    })
}

fn page_method(field: &syn::Field, ident: &syn::Ident) -> Result<TokenStream> {
    let ty = &field.ty;
    let is_page = |ty: &syn::Type| {
        matches!(ty, syn::Type::Path(p) if p.path.segments.last().is_some_and(|s| s.ident == "PageQuery"))
    };
    if is_page(ty) {
        return Ok(quote! {
            fn page(&self) -> ::core::option::Option<&::qforge::PageQuery> {
                ::core::option::Option::Some(&self.#ident)
            }
        });
    }
    if option_inner(ty).is_some_and(is_page) {
        return Ok(quote! {
            fn page(&self) -> ::core::option::Option<&::qforge::PageQuery> {
                self.#ident.as_ref()
            }
        });
    }
    Err(syn::Error::new_spanned(
        ty,
        "`page` field must be `PageQuery` or `Option<PageQuery>`",
    ))
}

fn describe_field(field: &syn::Field, ident: &syn::Ident, attr: FieldAttr) -> Result<DescribedField> {
    let field_name = ident.unraw().to_string();
    let ty = &field.ty;

    let (shape, value) = if attr.filter {
        if option_inner(ty).is_none() {
            return Err(syn::Error::new_spanned(ty, "`filter` field must be `Option<Q>`"));
        }
        (
            quote! { Filter },
            quote! { ::qforge::FieldValue::opt_filter(&self.#ident) },
        )
    } else if is_bool(ty) {
        (quote! { Flag }, quote! { ::qforge::FieldValue::Flag(self.#ident) })
    } else if let Some(inner) = option_inner(ty) {
        if vec_inner(inner).is_some() {
            (quote! { List }, quote! { ::qforge::FieldValue::opt_list(&self.#ident) })
        } else if is_pair(inner) {
            (quote! { Range }, quote! { ::qforge::FieldValue::opt_range(&self.#ident) })
        } else {
            (quote! { Scalar }, quote! { ::qforge::FieldValue::opt(&self.#ident) })
        }
    } else if vec_inner(ty).is_some() {
        (quote! { List }, quote! { ::qforge::FieldValue::list(&self.#ident) })
    } else {
        (quote! { Scalar }, quote! { ::qforge::FieldValue::scalar(&self.#ident) })
    };

    let mut calls = Vec::new();
    if attr.id {
        calls.push(quote! { .id() });
    }
    if attr.transient {
        calls.push(quote! { .transient() });
    }
    if let Some(column) = &attr.column {
        calls.push(quote! { .column(#column) });
    }
    if let Some(alias) = &attr.alias {
        calls.push(quote! { .alias(#alias) });
    }
    if let Some(literal) = &attr.literal {
        calls.push(quote! { .literal(#literal) });
    }
    if let Some(subquery) = &attr.subquery {
        let spec = subquery_tokens(subquery);
        calls.push(quote! { .subquery(#spec) });
    }
    if let Some(nested) = &attr.nested {
        let chain = nested_tokens(nested);
        calls.push(quote! { .nested(#chain) });
    }

    Ok(DescribedField {
        builder: quote! {
            ::qforge::FieldDescriptor::builder(#field_name, ::qforge::ValueShape::#shape)
                #( #calls )*
        },
        value,
    })
}

fn subquery_tokens(sub: &SubqueryAttr) -> TokenStream {
    let SubqueryAttr {
        column,
        op,
        select,
        from,
        extra,
    } = sub;
    let op = op.as_ref().map(|op| quote! { .with_op(#op) });
    let extra = extra.as_ref().map(|extra| quote! { .with_extra(#extra) });
    quote! {
        ::qforge::Subquery::new(#column, #select, #from) #op #extra
    }
}

fn nested_tokens(nested: &NestedAttr) -> TokenStream {
    let column = &nested.column;
    let append_where = nested.append_where;
    let op = nested.op.as_ref().map(|op| quote! { .with_op(#op) });
    let levels = nested.levels.iter().map(|level| {
        let left = &level.left;
        let from = &level.from;
        let op = level.op.as_ref().map(|op| quote! { .with_op(#op) });
        let extra = level.extra.as_ref().map(|extra| quote! { .with_extra(#extra) });
        quote! {
            .level(::qforge::NestedLevel::new(#left, #from) #op #extra)
        }
    });
    quote! {
        ::qforge::NestedChain::new(#column)
            #op
            .append_where(#append_where)
            #( #levels )*
    }
}
