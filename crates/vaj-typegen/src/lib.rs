//! Type declaration generator for the versioned artifact journal.
//!
//! Renders a TypeScript `export interface` whose shape mirrors the journal
//! snapshot (network → contract → alias → version → field), so scripts can
//! reference `artifacts.<network>.<contract>.<alias>.<version>.address` with
//! compile-time shape checking. The declaration is regenerated by the store on
//! every append and reset.
//!
//! Field types come from a fixed schema for the version record ([`schema`]);
//! only the free-form parameter objects are typed structurally from their
//! values.

pub mod render;
pub mod schema;

pub use render::{render_declaration, DEFAULT_INTERFACE_NAME};
pub use schema::{version_fields, DeclaredType, Field};
