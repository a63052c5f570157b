pub mod masters;
pub mod pagination;
pub mod step;
