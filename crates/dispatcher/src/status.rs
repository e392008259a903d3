//! Response classification for the broadcast endpoint

/// How a send response status is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 200 OK, 201 Created, 202 Accepted
    Success,
    /// Anything else
    Rejected,
}

impl StatusClass {
    pub fn of(status: u16) -> Self {
        match status {
            200 | 201 | 202 => Self::Success,
            _ => Self::Rejected,
        }
    }
}
