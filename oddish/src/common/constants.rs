// doc constants
pub const DOC_ID: &str = "_id";

// paging constants
pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const FIRST_PAGE: u64 = 1;

// sort direction values as they appear in a sort document
pub const SORT_ASCENDING: i32 = 1;
pub const SORT_DESCENDING: i32 = -1;
