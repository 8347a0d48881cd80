//! Implementation of the Model derive macro.

use proc_macro2::TokenStream;
use quote::quote;
use regex::Regex;
use syn::{Data, DeriveInput, Error, Field, Fields, Ident, LitStr, Result, Type};

const IDENTIFIER_PATTERN: &str = "^[A-Za-z_][A-Za-z0-9_]*$";

/// Hook names accepted by `#[orm(hooks(...))]`.
const HOOK_NAMES: [&str; 8] = [
    "before_query",
    "after_query",
    "before_update",
    "after_update",
    "before_delete",
    "after_delete",
    "before_insert",
    "after_insert",
];

/// Parsed model definition from a struct with `#[derive(Model)]`.
#[derive(Debug)]
pub struct ModelDef {
    pub name: Ident,
    pub table: String,
    /// Declared hooks, in the order written.
    pub hooks: Vec<Ident>,
    pub fields: Vec<FieldDef>,
}

/// One struct field.
#[derive(Debug)]
pub struct FieldDef {
    pub ident: Ident,
    pub ty: Type,
    pub column: String,
    pub tag: String,
    pub skip: bool,
}

fn identifier_regex() -> Result<Regex> {
    Regex::new(IDENTIFIER_PATTERN)
        .map_err(|e| Error::new(proc_macro2::Span::call_site(), e.to_string()))
}

fn check_identifier(re: &Regex, name: &str, span: &impl quote::ToTokens, what: &str) -> Result<()> {
    if re.is_match(name) {
        Ok(())
    } else {
        Err(Error::new_spanned(
            span,
            format!("invalid {what} name `{name}`: expected letters, digits and underscores"),
        ))
    }
}

/// Parse a `DeriveInput` into a `ModelDef`.
pub fn parse_model(input: &DeriveInput) -> Result<ModelDef> {
    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "Model cannot be derived for generic types",
        ));
    }

    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new_spanned(
                    &data.fields,
                    "Model requires a struct with named fields",
                ));
            }
        },
        Data::Enum(_) | Data::Union(_) => {
            return Err(Error::new_spanned(
                input,
                "Model can only be derived for structs",
            ));
        }
    };

    let re = identifier_regex()?;
    let name = input.ident.clone();
    let mut table = None;
    let mut hooks = Vec::new();

    for attr in &input.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let value: LitStr = meta.value()?.parse()?;
                check_identifier(&re, &value.value(), &value, "table")?;
                table = Some(value.value());
            } else if meta.path.is_ident("hooks") {
                meta.parse_nested_meta(|hook| {
                    let ident = hook
                        .path
                        .get_ident()
                        .cloned()
                        .ok_or_else(|| hook.error("expected a hook name"))?;
                    if !HOOK_NAMES.contains(&ident.to_string().as_str()) {
                        return Err(hook.error(format!(
                            "unknown hook `{ident}`, expected one of: {}",
                            HOOK_NAMES.join(", ")
                        )));
                    }
                    hooks.push(ident);
                    Ok(())
                })?;
            } else {
                return Err(meta.error("unknown orm attribute, expected `table` or `hooks`"));
            }
            Ok(())
        })?;
    }

    let table = match table {
        Some(table) => table,
        None => {
            let default = name.to_string();
            check_identifier(&re, &default, &name, "table")?;
            default
        }
    };

    let fields = named
        .iter()
        .map(|field| parse_field(&re, field))
        .collect::<Result<Vec<_>>>()?;

    Ok(ModelDef {
        name,
        table,
        hooks,
        fields,
    })
}

fn parse_field(re: &Regex, field: &Field) -> Result<FieldDef> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| Error::new_spanned(field, "expected named field"))?;

    let mut column = None;
    let mut tag = String::new();
    let mut skip = false;

    for attr in &field.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("tag") {
                let value: LitStr = meta.value()?.parse()?;
                tag = value.value();
            } else if meta.path.is_ident("column") {
                let value: LitStr = meta.value()?.parse()?;
                check_identifier(re, &value.value(), &value, "column")?;
                column = Some(value.value());
            } else if meta.path.is_ident("skip") {
                skip = true;
            } else {
                return Err(meta.error("unknown orm attribute, expected `tag`, `column` or `skip`"));
            }
            Ok(())
        })?;
    }

    let column = match column {
        Some(column) => column,
        None => {
            let raw = ident.to_string();
            let default = raw.strip_prefix("r#").unwrap_or(&raw).to_string();
            check_identifier(re, &default, &ident, "column")?;
            default
        }
    };

    Ok(FieldDef {
        ident,
        ty: field.ty.clone(),
        column,
        tag,
        skip,
    })
}

fn hook_accessor(hook: &Ident) -> TokenStream {
    let (accessor, capability) = match hook.to_string().as_str() {
        "after_query" => (quote!(as_after_query), quote!(AfterQuery)),
        "before_update" => (quote!(as_before_update), quote!(BeforeUpdate)),
        "after_update" => (quote!(as_after_update), quote!(AfterUpdate)),
        "before_delete" => (quote!(as_before_delete), quote!(BeforeDelete)),
        "after_delete" => (quote!(as_after_delete), quote!(AfterDelete)),
        "before_insert" => (quote!(as_before_insert), quote!(BeforeInsert)),
        "after_insert" => (quote!(as_after_insert), quote!(AfterInsert)),
        _ => {
            return quote! {
                fn before_query_hook() -> ::std::option::Option<::minorm::BeforeQueryFn> {
                    ::std::option::Option::Some(<Self as ::minorm::BeforeQuery>::before_query)
                }
            };
        }
    };
    quote! {
        fn #accessor(&mut self) -> ::std::option::Option<&mut dyn ::minorm::#capability> {
            ::std::option::Option::Some(self)
        }
    }
}

/// Generate the `Model` and `Hooks` impls.
pub fn generate_model_impl(def: &ModelDef) -> TokenStream {
    let name = &def.name;
    let type_name = name.to_string();
    let table = &def.table;
    let mapped: Vec<&FieldDef> = def.fields.iter().filter(|f| !f.skip).collect();
    let count = mapped.len();

    let infos = mapped.iter().map(|f| {
        let column = &f.column;
        let ty = &f.ty;
        let tag = &f.tag;
        quote! {
            ::minorm::FieldInfo::new(#column, <#ty as ::minorm::SqlField>::SQL_TYPE).tag(#tag)
        }
    });

    let to_values = mapped.iter().map(|f| {
        let ident = &f.ident;
        quote!(::minorm::SqlField::to_value(&self.#ident))
    });

    let mut position = 0usize;
    let mut scans = Vec::with_capacity(def.fields.len());
    for f in &def.fields {
        let ident = &f.ident;
        scans.push(if f.skip {
            quote!(#ident: ::std::default::Default::default())
        } else {
            let idx = position;
            position += 1;
            quote!(#ident: row.get_as(#idx)?)
        });
    }

    let accessors = def.hooks.iter().map(hook_accessor);

    quote! {
        impl ::minorm::Model for #name {
            const TYPE_NAME: &'static str = #type_name;
            const TABLE_NAME: &'static str = #table;

            fn fields() -> &'static [::minorm::FieldInfo] {
                static FIELDS: [::minorm::FieldInfo; #count] = [#(#infos),*];
                &FIELDS
            }

            fn to_values(&self) -> ::std::vec::Vec<::minorm::Value> {
                ::std::vec![#(#to_values),*]
            }

            fn from_row(row: &::minorm::Row) -> ::minorm::Result<Self> {
                ::std::result::Result::Ok(Self {
                    #(#scans),*
                })
            }
        }

        impl ::minorm::Hooks for #name {
            #(#accessors)*
        }
    }
}
