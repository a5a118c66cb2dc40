/// 페이지 번호 기반 목록 응답
// region:    --- Imports
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
// endregion: --- Imports

/// `?page=N` (1부터 시작, `last` 허용)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// 총 건수로 확정된 페이지 구간
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub max_page: i64,
    pub limit: i64,
    pub offset: i64,
}

impl PageWindow {
    /// 범위를 벗어나거나 숫자가 아닌 페이지는 404
    pub fn resolve(query: &PageQuery, count: i64, page_size: i64) -> AppResult<Self> {
        let page_size = page_size.max(1);
        let max_page = ((count + page_size - 1) / page_size).max(1);

        let page = match query.page.as_deref().map(str::trim) {
            None | Some("") => 1,
            Some("last") => max_page,
            Some(raw) => raw.parse::<i64>().map_err(|_| invalid_page())?,
        };
        if page < 1 || page > max_page {
            return Err(invalid_page());
        }

        Ok(Self {
            page,
            max_page,
            limit: page_size,
            offset: (page - 1) * page_size,
        })
    }
}

fn invalid_page() -> AppError {
    AppError::not_found("잘못된 페이지입니다.")
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub max_page: i64,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(window: PageWindow, count: i64, results: Vec<T>, path: &str) -> Self {
        let next = (window.page < window.max_page).then(|| format!("{}?page={}", path, window.page + 1));
        let previous = match window.page {
            1 => None,
            2 => Some(path.to_string()),
            page => Some(format!("{}?page={}", path, page - 1)),
        };
        Self {
            count,
            next,
            previous,
            max_page: window.max_page,
            results,
        }
    }

    /// 링크 정보는 유지하고 결과 항목만 변환
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            max_page: self.max_page,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: &str) -> PageQuery {
        PageQuery {
            page: Some(page.to_string()),
        }
    }

    #[test]
    fn default_page_is_first() {
        let w = PageWindow::resolve(&PageQuery::default(), 25, 10).unwrap();
        assert_eq!(w, PageWindow { page: 1, max_page: 3, limit: 10, offset: 0 });
    }

    #[test]
    fn empty_result_still_has_one_page() {
        let w = PageWindow::resolve(&PageQuery::default(), 0, 10).unwrap();
        assert_eq!(w.max_page, 1);
    }

    #[test]
    fn out_of_range_page_is_not_found() {
        let err = PageWindow::resolve(&query("4"), 25, 10).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
        assert!(PageWindow::resolve(&query("0"), 25, 10).is_err());
        assert!(PageWindow::resolve(&query("abc"), 25, 10).is_err());
    }

    #[test]
    fn last_resolves_to_max_page() {
        let w = PageWindow::resolve(&query("last"), 25, 10).unwrap();
        assert_eq!(w.page, 3);
        assert_eq!(w.offset, 20);
    }

    #[test]
    fn links_follow_page_position() {
        let w = PageWindow::resolve(&query("2"), 25, 10).unwrap();
        let page = Page::new(w, 25, vec![1, 2, 3], "/api/auctions");
        assert_eq!(page.next.as_deref(), Some("/api/auctions?page=3"));
        assert_eq!(page.previous.as_deref(), Some("/api/auctions"));

        let w = PageWindow::resolve(&query("3"), 25, 10).unwrap();
        let page = Page::new(w, 25, Vec::<i32>::new(), "/api/auctions");
        assert!(page.next.is_none());
        assert_eq!(page.previous.as_deref(), Some("/api/auctions?page=2"));
    }

    #[test]
    fn map_keeps_links() {
        let w = PageWindow::resolve(&query("2"), 25, 10).unwrap();
        let page = Page::new(w, 25, vec![1, 2], "/accounts/users").map(|n| n * 10);
        assert_eq!(page.results, vec![10, 20]);
        assert_eq!(page.next.as_deref(), Some("/accounts/users?page=3"));
        assert_eq!(page.max_page, 3);
    }
}
