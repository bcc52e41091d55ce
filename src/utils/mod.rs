pub mod file_operations;

pub use file_operations::{
    build_extension_matcher, canonical, copy_file, ensure_directory, is_same_file,
    list_matching_files, literal_suffix, normalize_extension_pattern, sha256_file,
};
