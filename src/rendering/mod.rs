pub mod png_io;
pub mod source;

pub use png_io::{decode_png, encode_png, read_png, write_png, RgbImage};
pub use source::{luminance, prepare_source, PreparedSource, SourceFormat};
