use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DataStruct, DeriveInput, Fields, parse_macro_input};

#[proc_macro_derive(GlslStruct)]
pub fn derive_macro_glsl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = input.ident;
    let name_str = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Struct(DataStruct {
        fields: Fields::Named(ref fields),
        ..
    }) = input.data
    else {
        return syn::Error::new_spanned(&name, "GlslStruct requires a struct with named fields")
            .to_compile_error()
            .into();
    };

    // padding fields exist only to satisfy std140-style layouts
    let fields = fields
        .named
        .iter()
        .filter_map(|field| field.ident.as_ref().map(|ident| (ident, &field.ty)))
        .filter(|(ident, _)| !ident.to_string().starts_with('_'))
        .collect::<Vec<_>>();

    let glsl_fields = fields.iter().map(|(ident, ty)| {
        let field_name_str = ident.to_string();
        quote! {
            ::glsl::GlslField {
                name: #field_name_str,
                ty: <#ty as ::glsl::Glsl>::NAME,
            }
        }
    });

    let uniform_writes = fields.iter().map(|(ident, _)| {
        let field_name_str = ident.to_string();
        quote! {
            ::glsl::Uniform::write_uniform(
                &self.#ident,
                &::std::format!("{}.{}", name, #field_name_str),
                sink,
            );
        }
    });

    quote! {
        impl #impl_generics ::glsl::Glsl for #name #ty_generics #where_clause {
            const NAME: &'static str = #name_str;
        }

        impl #impl_generics ::glsl::Uniform for #name #ty_generics #where_clause {
            fn write_uniform(&self, name: &str, sink: &mut impl ::glsl::UniformSink) {
                #( #uniform_writes )*
            }
        }

        impl #impl_generics ::glsl::GlslStruct for #name #ty_generics #where_clause {
            const FIELDS: &'static [::glsl::GlslField] = &[
                #( #glsl_fields, )*
            ];
        }
    }
    .into()
}
