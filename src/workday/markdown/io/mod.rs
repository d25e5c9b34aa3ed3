pub mod excel_read;
pub mod markdown_write;
pub mod sources;
