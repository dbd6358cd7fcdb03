pub mod entry_crud;
pub mod relations;
pub mod review;
pub mod vector_search;
pub mod watermark;
