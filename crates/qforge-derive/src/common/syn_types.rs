//! Type helper utilities for syn type analysis.

/// Extract the inner type T from Option<T>, or return None if not an Option type.
///
/// Recognizes `Option<T>`, `std::option::Option<T>`, and `core::option::Option<T>`.
pub fn option_inner(ty: &syn::Type) -> Option<&syn::Type> {
    single_generic(ty, "Option")
}

/// Extract the inner type T from Vec<T>, or return None if not a Vec type.
///
/// Recognizes `Vec<T>` and `std::vec::Vec<T>`.
pub fn vec_inner(ty: &syn::Type) -> Option<&syn::Type> {
    single_generic(ty, "Vec")
}

/// Whether the type is a two-element tuple `(A, B)`.
pub fn is_pair(ty: &syn::Type) -> bool {
    matches!(ty, syn::Type::Tuple(t) if t.elems.len() == 2)
}

/// Whether the type is a plain `bool`.
pub fn is_bool(ty: &syn::Type) -> bool {
    let syn::Type::Path(type_path) = ty else {
        return false;
    };
    type_path.qself.is_none() && type_path.path.is_ident("bool")
}

fn single_generic<'a>(ty: &'a syn::Type, name: &str) -> Option<&'a syn::Type> {
    let syn::Type::Path(type_path) = ty else {
        return None;
    };
    let seg = type_path.path.segments.last()?;
    if seg.ident != name {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &seg.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    let syn::GenericArgument::Type(inner) = args.args.first()? else {
        return None;
    };
    Some(inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_option_inner() {
        let ty: syn::Type = parse_quote!(Option<String>);
        assert!(option_inner(&ty).is_some());

        let ty: syn::Type = parse_quote!(std::option::Option<i32>);
        assert!(option_inner(&ty).is_some());

        let ty: syn::Type = parse_quote!(String);
        assert!(option_inner(&ty).is_none());

        let ty: syn::Type = parse_quote!(Vec<String>);
        assert!(option_inner(&ty).is_none());
    }

    #[test]
    fn test_vec_inner() {
        let ty: syn::Type = parse_quote!(Vec<String>);
        assert!(vec_inner(&ty).is_some());

        let ty: syn::Type = parse_quote!(std::vec::Vec<i32>);
        assert!(vec_inner(&ty).is_some());

        let ty: syn::Type = parse_quote!(Option<String>);
        assert!(vec_inner(&ty).is_none());
    }

    #[test]
    fn test_pair_and_bool() {
        let ty: syn::Type = parse_quote!((i32, i32));
        assert!(is_pair(&ty));
        let ty: syn::Type = parse_quote!((i32, i32, i32));
        assert!(!is_pair(&ty));

        let ty: syn::Type = parse_quote!(bool);
        assert!(is_bool(&ty));
        let ty: syn::Type = parse_quote!(Option<bool>);
        assert!(!is_bool(&ty));
    }
}
