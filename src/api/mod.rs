//! Client-side surface of the statistics REST API.
//!
//! This module builds fully encoded request URLs from named query
//! parameters, plans pagination over large tables, and interprets the
//! table listing response. The API itself is treated as an opaque
//! paginated resource store; no statistical semantics live here.

mod config;
mod endpoint;
mod error;
mod listing;
mod paging;
mod params;

pub use config::{ApiConfig, DEFAULT_API_VERSION, DEFAULT_BASE_URL, DEFAULT_LANG};
pub use endpoint::{Operation, ResponseFormat, build_url};
pub use error::ApiError;
pub use listing::{TableInfo, parse_table_list};
pub use paging::{DEFAULT_PAGE_SIZE, Page, plan_pages};
pub use params::QueryParams;
