pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{error, header, info, response, success, warn};
pub use table::{record_table, Fields, TableBuilder};
pub use theme::{theme, Theme};
