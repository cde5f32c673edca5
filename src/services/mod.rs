pub mod listing;
pub mod navigator;
pub mod search;
pub mod tree;
