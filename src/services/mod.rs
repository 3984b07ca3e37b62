pub mod catalog_sync;
pub mod click_tracker;
pub mod feed;
