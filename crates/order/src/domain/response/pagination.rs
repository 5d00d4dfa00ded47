use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct Pagination {
    pub page: i32,
    pub page_size: i32,
    pub total_items: i32,
    pub total_pages: i32,
}

impl Pagination {
    pub fn new(page: i32, page_size: i32, total_items: i64) -> Self {
        let page_size = page_size.max(1);
        let total_pages = if total_items == 0 {
            0
        } else {
            ((total_items - 1) / page_size as i64) + 1
        };

        Self {
            page,
            page_size,
            total_items: total_items as i32,
            total_pages: total_pages as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let pagination = Pagination::new(1, 10, 21);
        assert_eq!(pagination.total_pages, 3);
    }

    #[test]
    fn empty_result_has_no_pages() {
        let pagination = Pagination::new(1, 10, 0);
        assert_eq!(pagination.total_pages, 0);
        assert_eq!(pagination.total_items, 0);
    }
}
