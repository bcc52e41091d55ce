pub mod selective_copy;

pub use selective_copy::{
    run_selective_copy, run_selective_copy_with_output, CopiedFile, SelectiveCopyConfig,
    SelectiveCopyReport,
};
