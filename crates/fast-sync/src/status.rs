/// Download state of a single height during fast sync.
///
/// Stored one byte per height, pivots are in the tens of millions.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FastBlockStatus {
    /// Not requested yet, or returned to the pool after a failed request.
    #[default]
    Unknown = 0,

    /// Handed out in a batch, waiting for the download to finish.
    Sent = 1,

    /// Durably inserted.
    Inserted = 2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_one_byte() {
        assert_eq!(std::mem::size_of::<FastBlockStatus>(), 1);
        assert_eq!(FastBlockStatus::default(), FastBlockStatus::Unknown);
    }
}
