pub mod layout;
pub mod parquet_io;

pub use layout::TableLayout;
pub use parquet_io::{read_volume, read_volume_glob, write_volume};
