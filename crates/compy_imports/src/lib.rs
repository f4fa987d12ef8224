//! Static discovery of the third-party modules that Python sources import.
//!
//! The scan is line based on purpose: only `import x` and `from x import y`
//! statements starting at the beginning of a line are considered.

mod scanner;
mod stdlib;

pub use scanner::{ScanError, find_imports, imported_module, is_python_source, scan_source};
pub use stdlib::is_stdlib_module;
