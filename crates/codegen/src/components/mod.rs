//! React component, test and documentation printers.

mod docs;
mod form;
mod table;
mod test_suite;

pub use docs::generate_documentation;
pub use form::generate_form;
pub use table::generate_table;
pub use test_suite::generate_tests;

pub(crate) use docs::render_documentation;
pub(crate) use form::render_form;
pub(crate) use table::render_table;
pub(crate) use test_suite::render_tests;
