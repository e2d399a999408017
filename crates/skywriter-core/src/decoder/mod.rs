pub mod dump;
pub mod filename;

pub use dump::{DUMP_SIZE, PAGE_COUNT, PAGE_SIZE, UID_LEN, decode, decode_file, looks_like_dump};
pub use filename::{DUMP_EXTENSIONS, display_name, is_dump_file};
