//! Derive macro for minorm.
//!
//! `#[derive(Model)]` maps a struct with named fields to a table: one column
//! per field, in declaration order. The generated code refers to the `minorm`
//! facade crate.
//!
//! Struct attributes:
//! - `#[orm(table = "users")]` sets the table name (default: the struct name)
//! - `#[orm(hooks(before_insert, after_query, ...))]` lists the lifecycle
//!   hooks the type implements
//!
//! Field attributes:
//! - `#[orm(tag = "PRIMARY KEY")]` appends a constraint to the column
//! - `#[orm(column = "Name")]` sets the column name (default: the field name)
//! - `#[orm(skip)]` leaves the field unmapped; it is `Default`ed when scanned
//!
//! Every mapped field type must implement `SqlField`, so a field with an
//! unsupported type is a compile error.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod model_derive;

#[proc_macro_derive(Model, attributes(orm))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match model_derive::parse_model(&input) {
        Ok(def) => model_derive::generate_model_impl(&def).into(),
        Err(err) => err.to_compile_error().into(),
    }
}
