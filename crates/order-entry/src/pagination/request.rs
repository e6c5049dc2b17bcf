use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Identifying context of the active orders view
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq, new)]
pub struct OrderContext {
    pub tab_name: String,
    pub patient_uuid: String,
    pub care_setting_uuid: String,
}

/// Sequence number of a dispatched fetch; later requests compare greater
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct RequestToken(pub u64);

/// Page cursor: `offset == page_index * limit`
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct PageRequest {
    pub limit: u32,
    pub offset: u32,
    pub page_index: u32,
}

impl PageRequest {
    pub fn first(limit: u32) -> Self {
        Self {
            limit,
            offset: 0,
            page_index: 0,
        }
    }

    /// Cursor for a zero-based page index. `limit` must be positive.
    pub fn at(index: u32, limit: u32) -> Result<Self, Error> {
        let offset = index
            .checked_mul(limit)
            .ok_or(Error::OffsetOverflow { index, limit })?;

        Ok(Self {
            limit,
            offset,
            page_index: offset / limit,
        })
    }
}

/// Arguments handed to the order-query service
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct FetchRequest {
    pub token: RequestToken,
    pub limit: u32,
    pub offset: u32,
    pub patient_uuid: String,
    pub care_setting_uuid: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_index_times_limit() {
        for limit in [1, 7, 10, 25] {
            for index in 0..50 {
                let page = PageRequest::at(index, limit).unwrap();
                assert_eq!(page.offset, index * limit);
                assert_eq!(page.page_index, index);
            }
        }
    }

    #[test]
    fn overflowing_offset_is_rejected() {
        assert_eq!(
            PageRequest::at(u32::MAX, 10),
            Err(Error::OffsetOverflow {
                index: u32::MAX,
                limit: 10
            })
        );
    }
}
