//! `#[derive(Record)]` for flagbind.
//!
//! Generates a `flagbind::Record` impl that hands every public field of a
//! struct to the visitor in declaration order. Field attributes:
//!
//! - `#[bind(flag = "name")]`: argument namespace segment (default: the
//!   lower-cased field name).
//! - `#[bind(file = "name")]`: config file key (default: the field name).
//! - `#[bind(desc = "...")]`: description (default: the doc comment).
//! - `#[bind(nested)]`: the field is itself a record (`T`, `Option<T>`,
//!   `Box<T>`).
//! - `#[bind(flatten)]`: a nested record whose leaves live in the parent's
//!   namespace.
//! - `#[bind(skip)]`, or `"-"` as either name: never bound.
//!
//! Private fields are never bound.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{
    Attribute, Data, DeriveInput, Expr, ExprLit, Field, Fields, Lit, LitStr, Meta, Type,
    Visibility, parse_macro_input,
};

#[proc_macro_derive(Record, attributes(bind))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Record can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Record can only be derived for structs",
            ));
        }
    };

    let mut calls = Vec::new();
    for field in fields {
        if let Some(call) = field_call(field)? {
            calls.push(call);
        }
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::flagbind::Record for #name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn visit<'__flagbind>(
                &'__flagbind mut self,
                visitor: &mut dyn ::flagbind::Visitor<'__flagbind>,
            ) -> ::core::result::Result<(), ::flagbind::SchemaError> {
                #(#calls)*
                ::core::result::Result::Ok(())
            }
        }
    })
}

/// How the field is handed to the visitor.
#[derive(Clone, Copy, PartialEq)]
enum Shape {
    Leaf,
    Nested,
    Flatten,
}

struct FieldAttrs {
    flag: Option<LitStr>,
    file: Option<LitStr>,
    desc: Option<String>,
    shape: Shape,
    skip: bool,
}

impl FieldAttrs {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = FieldAttrs {
            flag: None,
            file: None,
            desc: None,
            shape: Shape::Leaf,
            skip: false,
        };
        let mut doc_lines = Vec::new();

        for attr in attrs {
            if attr.path().is_ident("doc") {
                if let Meta::NameValue(nv) = &attr.meta
                    && let Expr::Lit(ExprLit {
                        lit: Lit::Str(s), ..
                    }) = &nv.value
                {
                    doc_lines.push(s.value());
                }
                continue;
            }
            if !attr.path().is_ident("bind") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("flag") {
                    out.flag = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("file") {
                    out.file = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("desc") {
                    let lit: LitStr = meta.value()?.parse()?;
                    out.desc = Some(lit.value());
                } else if meta.path.is_ident("nested") {
                    if out.shape == Shape::Leaf {
                        out.shape = Shape::Nested;
                    }
                } else if meta.path.is_ident("flatten") {
                    out.shape = Shape::Flatten;
                } else if meta.path.is_ident("skip") {
                    out.skip = true;
                } else {
                    return Err(meta.error("unknown bind attribute"));
                }
                Ok(())
            })?;
        }

        if out.desc.is_none() {
            out.desc = first_paragraph(&doc_lines);
        }
        let excluded = |name: &Option<LitStr>| name.as_ref().is_some_and(|n| n.value() == "-");
        if excluded(&out.flag) || excluded(&out.file) {
            out.skip = true;
        }
        Ok(out)
    }
}

/// Doc comment text up to the first blank line, joined into one line.
fn first_paragraph(lines: &[String]) -> Option<String> {
    let text = lines
        .iter()
        .map(|line| line.trim())
        .skip_while(|line| line.is_empty())
        .take_while(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!text.is_empty()).then_some(text)
}

fn field_call(field: &Field) -> syn::Result<Option<TokenStream2>> {
    let attrs = FieldAttrs::parse(&field.attrs)?;
    if attrs.skip || matches!(field.vis, Visibility::Inherited) {
        return Ok(None);
    }
    let Some(ident) = &field.ident else {
        return Ok(None);
    };

    let name = ident.unraw().to_string();
    let mut meta = quote!(::flagbind::FieldMeta::new(#name));
    if let Some(flag) = &attrs.flag {
        meta = quote!(#meta.flag(#flag));
    }
    if let Some(file) = &attrs.file {
        meta = quote!(#meta.file(#file));
    }
    if let Some(desc) = &attrs.desc {
        meta = quote!(#meta.description(#desc));
    }
    if attrs.shape == Shape::Flatten {
        meta = quote!(#meta.embedded());
    }

    let call = match attrs.shape {
        Shape::Leaf if never_bindable(&field.ty) => {
            let type_name = type_name(&field.ty);
            quote!(visitor.unsupported(&#meta, #type_name)?;)
        }
        Shape::Leaf => quote!(visitor.leaf(&#meta, &mut self.#ident)?;),
        Shape::Nested | Shape::Flatten => quote!(visitor.record(&#meta, &mut self.#ident)?;),
    };
    Ok(Some(call))
}

/// Types that can never implement `Setting` in a useful way. Rejecting them
/// here turns a confusing trait-bound error into a schema error naming the
/// field.
fn never_bindable(ty: &Type) -> bool {
    match ty {
        Type::Paren(inner) => never_bindable(&inner.elem),
        Type::Group(inner) => never_bindable(&inner.elem),
        Type::Tuple(_)
        | Type::Array(_)
        | Type::Slice(_)
        | Type::Reference(_)
        | Type::Ptr(_)
        | Type::BareFn(_)
        | Type::TraitObject(_)
        | Type::Never(_) => true,
        _ => false,
    }
}

fn type_name(ty: &Type) -> String {
    quote!(#ty)
        .to_string()
        .replace(" ,", ",")
        .replace("( ", "(")
        .replace(" )", ")")
        .replace("[ ", "[")
        .replace(" ]", "]")
        .replace(" ;", ";")
        .replace("& ", "&")
}
