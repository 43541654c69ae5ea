//! Contains Strata macros
//!
//! used to import and embed migrations
#![recursion_limit = "128"]
extern crate proc_macro;

mod util;

use proc_macro::TokenStream;
use proc_macro2::{Span as Span2, TokenStream as TokenStream2};
use quote::quote;
use strata_core::{find_migration_files, MigrationType};
use syn::{Ident, LitStr};

use util::{crate_root, declares_fn, migration_name};

pub(crate) fn migration_fn_quoted(migrations: Vec<TokenStream2>) -> TokenStream2 {
    quote! {
        use strata::{Migration, Runner};
        pub fn runner() -> Runner {
            let migrations: Vec<Migration> = vec![#(#migrations),*];
            Runner::new(&migrations)
        }
    }
}

fn location(input: TokenStream, default: &str) -> Result<String, TokenStream> {
    if input.is_empty() {
        return Ok(default.to_string());
    }
    syn::parse::<LitStr>(input)
        .map(|location| location.value())
        .map_err(|err| err.to_compile_error().into())
}

/// embeds sql migrations and inserts a module called `migrations` with a function called `runner`
/// that when called returns a [Runner](../strata/struct.Runner.html) instance with the collected migrations
///
/// when called without arguments `embed_migrations` searches for migrations in a directory called
/// `migrations` at the root level of your crate. If you want to specify another directory call
/// `embed_migrations` with its location relative to the root level of your crate.
///
/// Every migration is a directory named `m{YYMMDD_HHMMSS}_{name}` holding an `up.sql` script and,
/// for migrations that can be rolled back, a `down.sql` script.
#[proc_macro]
pub fn embed_migrations(input: TokenStream) -> TokenStream {
    let location = match location(input, "./migrations") {
        Ok(location) => location,
        Err(err) => return err,
    };
    let location = crate_root().join(location);

    let migration_dirs = find_migration_files(&location, MigrationType::Sql)
        .expect("error getting migration files");

    let mut migrations = Vec::new();
    for dir in migration_dirs {
        let version = migration_name(&dir);
        let up = dir.join("up.sql");
        let up = up.to_str().expect("migration path is not valid unicode");

        let down = dir.join("down.sql");
        let down = if down.is_file() {
            let down = down.to_str().expect("migration path is not valid unicode");
            quote! {Some(include_str!(#down))}
        } else {
            quote! {None}
        };

        migrations.push(quote! {
            Migration::from_sql(#version, include_str!(#up), #down).unwrap()
        });
    }

    let fnq = migration_fn_quoted(migrations);
    (quote! {
        pub mod migrations {
            #fnq
        }
    })
    .into()
}

/// imports rust migration modules and inserts a function called `runner` that when called returns a
/// [Runner](../strata/struct.Runner.html) instance with the collected migration modules.
///
/// `include_migration_mods` expects to be called from a `mod.rs` file in a directory called
/// migrations below the src directory of your Rust project. If the directory has another name,
/// call `include_migration_mods` with its path relative to the crate root.
///
/// To be a valid migration module it has to be named `m{YYMMDD_HHMMSS}_{name}.rs` and declare
/// an `up` function. A module that also declares `down` can be rolled back.
/// # Example
/// ```ignore
/// // module named m250501_120000_add_persons_table.rs in src/migrations
/// use strata::{types, Error, Schema};
///
/// pub fn up(schema: &mut Schema) -> Result<(), Error> {
///     schema.create_table(
///         "persons",
///         [
///             ("id", types::primary()),
///             ("name", types::string(255)),
///             ("city", types::string(255)),
///         ],
///     )
/// }
///
/// pub fn down(schema: &mut Schema) -> Result<(), Error> {
///     schema.drop_table("persons")
/// }
/// ```
#[proc_macro]
pub fn include_migration_mods(input: TokenStream) -> TokenStream {
    let location = match location(input, "./src/migrations") {
        Ok(location) => location,
        Err(err) => return err,
    };
    let location = crate_root().join(location);

    let migration_mods = find_migration_files(&location, MigrationType::Mod)
        .expect("error getting migration files");

    let mut mods = Vec::new();
    let mut migrations = Vec::new();
    for path in migration_mods {
        let version = migration_name(&path);
        let ident = Ident::new(&version, Span2::call_site());
        mods.push(quote! {pub mod #ident;});

        let migration = if declares_fn(&path, "down") {
            quote! {Migration::new(#version, #ident::up, #ident::down).unwrap()}
        } else {
            quote! {Migration::irreversible(#version, #ident::up).unwrap()}
        };
        migrations.push(migration);
    }

    let fnq = migration_fn_quoted(migrations);
    let result = quote! {
        #(#mods)*

        #fnq
    };
    result.into()
}
