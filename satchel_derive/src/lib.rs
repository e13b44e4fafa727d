use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Meta, parse_macro_input};

#[proc_macro_derive(Serializable, attributes(satchel))]
pub fn derive_serializable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    derive_serializable_expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn derive_serializable_expand(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    match &input.data {
        Data::Struct(data_struct) => impl_serializable_struct(name, data_struct),
        Data::Enum(_) => Err(syn::Error::new_spanned(
            name,
            "Enums are not supported: the wire format is positional and carries no discriminant",
        )),
        Data::Union(_) => Err(syn::Error::new_spanned(
            name,
            "Union types are not supported",
        )),
    }
}

enum FieldKind {
    Plain,
    Nested,
    Skip,
}

fn impl_serializable_struct(
    name: &syn::Ident,
    data: &syn::DataStruct,
) -> syn::Result<proc_macro2::TokenStream> {
    let fields = match &data.fields {
        Fields::Named(fields) => &fields.named,
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Only named fields are supported",
            ));
        }
    };

    let mut field_info = Vec::new();

    for field in fields {
        let field_name = field.ident.as_ref().unwrap();

        let mut kind = FieldKind::Plain;

        for attr in &field.attrs {
            if attr.path().is_ident("satchel")
                && let Meta::List(meta_list) = &attr.meta
            {
                let tokens_str = meta_list.tokens.to_string();

                match tokens_str.as_str() {
                    "nested" => kind = FieldKind::Nested,
                    "skip" => kind = FieldKind::Skip,
                    other => {
                        return Err(syn::Error::new_spanned(
                            attr,
                            format!(
                                "Unknown satchel attribute '{other}': expected 'nested' or 'skip'",
                            ),
                        ));
                    }
                }
            }
        }

        field_info.push((field_name.clone(), kind));
    }

    let encode_stmts: Vec<_> = field_info
        .iter()
        .filter_map(|(field_name, kind)| match kind {
            FieldKind::Plain => Some(quote! {
                buf.push(&self.#field_name)?;
            }),
            FieldKind::Nested => Some(quote! {
                buf.push(&satchel::Serializable::serialize(&self.#field_name)?)?;
            }),
            FieldKind::Skip => None,
        })
        .collect();

    let decode_stmts: Vec<_> = field_info
        .iter()
        .filter_map(|(field_name, kind)| match kind {
            FieldKind::Plain => Some(quote! {
                self.#field_name = buf.pop()?;
            }),
            FieldKind::Nested => Some(quote! {
                satchel::Serializable::decode(
                    &mut self.#field_name,
                    &mut buf.pop::<satchel::Buffer>()?,
                )?;
            }),
            FieldKind::Skip => None,
        })
        .collect();

    // A struct with no encoded fields leaves the buffer parameter unused.
    let silence_unused = if encode_stmts.is_empty() {
        quote! { let _ = &buf; }
    } else {
        quote! {}
    };

    let expanded = quote! {
        impl satchel::Serializable for #name {
            fn encode(&self, buf: &mut satchel::Buffer) -> satchel::EncodeResult<()> {
                #silence_unused
                #(#encode_stmts)*
                Ok(())
            }

            fn decode(&mut self, buf: &mut satchel::Buffer) -> satchel::DecodeResult<()> {
                #silence_unused
                #(#decode_stmts)*
                Ok(())
            }
        }
    };

    Ok(expanded)
}
