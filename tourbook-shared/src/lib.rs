pub mod pagination;
pub mod pii;

pub use pagination::Pagination;
pub use pii::Masked;
