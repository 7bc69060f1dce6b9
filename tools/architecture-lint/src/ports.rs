//! Shape of the traits declared under `domain/ports`.
//!
//! Services and adapters meet only through these traits, so each one must be
//! an `#[async_trait]`, require `Send + Sync`, and get a mockall double under
//! `cfg(test)`.

use syn::punctuated::Punctuated;

/// Problems with the public traits declared directly in `file`.
pub(crate) fn port_shape_problems(file: &syn::File) -> Vec<String> {
    file.items
        .iter()
        .filter_map(|item| match item {
            syn::Item::Trait(port) if matches!(port.vis, syn::Visibility::Public(_)) => Some(port),
            _ => None,
        })
        .flat_map(trait_problems)
        .collect()
}

fn trait_problems(port: &syn::ItemTrait) -> Vec<String> {
    let name = &port.ident;
    let mut problems = Vec::new();
    if !port.attrs.iter().any(is_async_trait) {
        problems.push(format!("port trait `{name}` must be declared with #[async_trait]"));
    }
    if !port.attrs.iter().any(is_test_automock) {
        problems.push(format!(
            "port trait `{name}` must carry #[cfg_attr(test, mockall::automock)]"
        ));
    }
    for marker in ["Send", "Sync"] {
        if !has_supertrait(port, marker) {
            problems.push(format!("port trait `{name}` must require `{marker}`"));
        }
    }
    problems
}

fn last_ident_is(path: &syn::Path, ident: &str) -> bool {
    path.segments
        .last()
        .is_some_and(|segment| segment.ident == ident)
}

fn is_async_trait(attr: &syn::Attribute) -> bool {
    last_ident_is(attr.path(), "async_trait")
}

fn is_test_automock(attr: &syn::Attribute) -> bool {
    if !attr.path().is_ident("cfg_attr") {
        return false;
    }
    let Ok(metas) =
        attr.parse_args_with(Punctuated::<syn::Meta, syn::Token![,]>::parse_terminated)
    else {
        return false;
    };
    let mut metas = metas.iter();
    let gated_on_test = metas
        .next()
        .is_some_and(|condition| condition.path().is_ident("test"));
    gated_on_test && metas.any(|meta| last_ident_is(meta.path(), "automock"))
}

fn has_supertrait(port: &syn::ItemTrait, marker: &str) -> bool {
    port.supertraits.iter().any(|bound| match bound {
        syn::TypeParamBound::Trait(bound) => last_ident_is(&bound.path, marker),
        _ => false,
    })
}
