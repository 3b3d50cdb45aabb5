pub mod stores;

pub use stores::list_stores;
