use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::env;

use syn::Item;

pub(crate) fn crate_root() -> PathBuf {
    let crate_root = env::var("CARGO_MANIFEST_DIR")
        .expect("CARGO_MANIFEST_DIR environment variable not present");
    PathBuf::from(crate_root)
}

// the version a migration path stands for, file stem for modules and dir name for sql migrations
pub(crate) fn migration_name(path: &Path) -> String {
    let name = if path.is_dir() {
        path.file_name()
    } else {
        path.file_stem()
    };
    name.and_then(OsStr::to_str)
        .map(String::from)
        .unwrap_or_else(|| panic!("invalid migration name {}", path.display()))
}

// whether the module at path declares a top level function named `name`
pub(crate) fn declares_fn(path: &Path, name: &str) -> bool {
    let source = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("could not read migration {}, {}", path.display(), err));
    let file = syn::parse_file(&source)
        .unwrap_or_else(|err| panic!("could not parse migration {}, {}", path.display(), err));

    file.items.iter().any(|item| match item {
        Item::Fn(function) => function.sig.ident == name,
        _ => false,
    })
}
