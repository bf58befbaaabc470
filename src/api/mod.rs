pub mod extract;
pub mod pagination;

pub use extract::{JsonBody, PathParams, QueryParams};
pub use pagination::{Page, PageQuery, Paginated};
