//! Limit/offset pagination types.
//!
//! # Usage
//!
//! ```rust,ignore
//! let stmt = Statement::new("SELECT ... WHERE enabled_flag = 1").bind(project_id);
//! let page = store.paginate(stmt, PageArgs::new(2, 10)).await?;
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Input arguments for paginated queries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageArgs {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Items per page.
    pub page_size: Option<u32>,
}

impl PageArgs {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
        }
    }

    /// Apply defaults (page 1, 20 per page) and bounds (1-100 per page).
    pub fn validate(&self) -> ValidatedPageArgs {
        let page = self.page.unwrap_or(1).max(1);
        let page_size = self.page_size.unwrap_or(20).clamp(1, 100);
        ValidatedPageArgs { page, page_size }
    }
}

/// Validated and normalized pagination arguments.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedPageArgs {
    pub page: u32,
    pub page_size: u32,
}

impl ValidatedPageArgs {
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }
}

/// One page of normalized results plus paging metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub items: Vec<Map<String, Value>>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl Page {
    pub(crate) fn build(items: Vec<Map<String, Value>>, total: i64, args: ValidatedPageArgs) -> Self {
        let total_pages = if total <= 0 {
            0
        } else {
            ((total + i64::from(args.page_size) - 1) / i64::from(args.page_size)) as u32
        };
        Self {
            items,
            total,
            page: args.page,
            page_size: args.page_size,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_args_defaults() {
        let args = PageArgs::default().validate();
        assert_eq!(args.page, 1);
        assert_eq!(args.page_size, 20);
        assert_eq!(args.offset(), 0);
    }

    #[test]
    fn test_page_args_clamps() {
        let args = PageArgs::new(0, 500).validate();
        assert_eq!(args.page, 1);
        assert_eq!(args.page_size, 100);

        let args = PageArgs::new(3, 0).validate();
        assert_eq!(args.page_size, 1);
        assert_eq!(args.offset(), 2);
    }

    #[test]
    fn test_page_args_offset() {
        let args = PageArgs::new(3, 10).validate();
        assert_eq!(args.limit(), 10);
        assert_eq!(args.offset(), 20);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let args = PageArgs::new(1, 10).validate();
        let page = Page::build(Vec::new(), 25, args);
        assert_eq!(page.total_pages, 3);

        let page = Page::build(Vec::new(), 0, args);
        assert_eq!(page.total_pages, 0);
    }
}
