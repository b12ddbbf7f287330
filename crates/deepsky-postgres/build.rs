#![forbid(unsafe_code)]

/// `embed_migrations!` cannot detect changes to the migration directory on
/// its own, so rebuild the crate whenever a migration file changes.
fn main() {
    println!("cargo:rerun-if-changed=./migrations");
}
