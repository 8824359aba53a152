use proc_macro::TokenStream;
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use proc_macro_crate::{FoundCrate, crate_name};
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Field, Fields, LitStr, Type, parse_macro_input};

#[proc_macro_derive(FormModel, attributes(form))]
pub fn derive_form_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[derive(Default)]
struct FieldOptions {
    required: bool,
    email: bool,
    description: Option<LitStr>,
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            input.ident,
            "FormModel derive currently supports only non-generic structs",
        ));
    }

    let model_ident = input.ident;
    let fields_struct_ident = format_ident!("{model_ident}Fields");

    let named_fields = match input.data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => fields.named,
            _ => {
                return Err(syn::Error::new(
                    model_ident.span(),
                    "FormModel derive requires a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new(
                model_ident.span(),
                "FormModel derive is only supported on structs",
            ));
        }
    };

    let boundform = boundform_path();
    let mut field_methods = Vec::new();
    let mut field_specs = Vec::new();
    let mut record_fields = Vec::new();

    for field in named_fields {
        ensure_string_field(&field)?;
        let options = parse_field_options(&field)?;
        let Some(field_ident) = field.ident else {
            continue;
        };
        let field_name = field_ident.unraw().to_string();

        field_methods.push(quote! {
            pub const fn #field_ident(&self) -> #boundform::form::FieldKey {
                #boundform::form::FieldKey::new(#field_name)
            }
        });

        let mut modifiers = Vec::new();
        if options.required {
            modifiers.push(quote!(.required()));
        }
        if options.email {
            modifiers.push(quote!(.rule(#boundform::form::rules::email)));
        }
        if let Some(description) = options.description {
            modifiers.push(quote!(.description(#description)));
        }
        field_specs.push(quote! {
            .field(
                #boundform::form::FieldSpec::new(#boundform::form::FieldKey::new(#field_name))
                    #(#modifiers)*
            )
        });

        record_fields.push(quote! {
            #field_ident: ::std::string::ToString::to_string(record.value(#field_name))
        });
    }

    Ok(quote! {
        #[derive(Clone, Copy, Debug, Default)]
        pub struct #fields_struct_ident;

        impl #fields_struct_ident {
            #(#field_methods)*
        }

        impl #boundform::form::FormModel for #model_ident {
            type Fields = #fields_struct_ident;

            fn fields() -> Self::Fields {
                #fields_struct_ident
            }

            fn schema() -> #boundform::form::FormSchema {
                #boundform::form::FormSchema::new()
                    #(#field_specs)*
            }

            fn from_record(record: &#boundform::form::SubmittedRecord) -> Self {
                Self {
                    #(#record_fields,)*
                }
            }
        }
    })
}

fn ensure_string_field(field: &Field) -> syn::Result<()> {
    let is_string = match &field.ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "String" && segment.arguments.is_none()),
        _ => false,
    };
    if is_string {
        Ok(())
    } else {
        Err(syn::Error::new_spanned(
            &field.ty,
            "FormModel fields must be of type `String`",
        ))
    }
}

fn parse_field_options(field: &Field) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();
    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("form")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("required") {
                options.required = true;
                Ok(())
            } else if meta.path.is_ident("email") {
                options.email = true;
                Ok(())
            } else if meta.path.is_ident("description") {
                options.description = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error(
                    "unsupported form attribute, expected `required`, `email` or `description`",
                ))
            }
        })?;
    }
    Ok(options)
}

fn boundform_path() -> TokenStream2 {
    match crate_name("boundform") {
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Ok(FoundCrate::Itself) | Err(_) => quote!(::boundform),
    }
}
