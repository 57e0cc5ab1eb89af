// Keyresolve Layouts
// Probed key tables and per-layout metadata

pub mod group;
pub mod table;

pub use group::{Direction, Group, GroupOptions};
pub use table::{KeyRow, LayoutTable, TableBuild};
