//! REST paging to inventory limit/offset

use crate::error::{HandlerError, HandlerResult};

/// Largest page the inventory accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    /// 0 selects the backend default
    pub limit: u32,
    pub offset: u32,
}

/// Convert `pageSize`/`offset` into backend limit/offset.
///
/// The offset is only honoured when a page size is given. Negative values fail
/// with a conversion error; a zero or oversized page fails with
/// invalid-argument.
pub fn parse_pagination(page_size: Option<i32>, offset: Option<i32>) -> HandlerResult<Pagination> {
    let Some(page_size) = page_size else {
        return Ok(Pagination::default());
    };

    let limit = u32::try_from(page_size)
        .map_err(|_| HandlerError::Conversion(format!("pageSize must not be negative: {page_size}")))?;
    if limit == 0 || limit > MAX_PAGE_SIZE {
        return Err(HandlerError::invalid_argument(format!(
            "pageSize must be between 1 and {MAX_PAGE_SIZE}, got {limit}"
        )));
    }

    let offset = match offset {
        Some(o) => u32::try_from(o)
            .map_err(|_| HandlerError::Conversion(format!("offset must not be negative: {o}")))?,
        None => 0,
    };

    Ok(Pagination { limit, offset })
}

/// Whether elements remain after the returned page.
pub fn has_more(offset: u32, returned: usize, total: i32) -> bool {
    let seen = i64::from(offset) + returned as i64;
    seen < i64::from(total)
}
