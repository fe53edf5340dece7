//! Access-rights constants shared by the grant path and the co-owner query.
//!
//! The grant action names rights as a comma-separated list while the
//! access-grant query matches on the numeric mask. Both renditions derive
//! from [`CO_OWNER_RIGHTS`], so granting and reading back can never drift.

/// A single access right bit as defined by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRight {
    Read,
    Write,
    Append,
    AppendTo,
    Create,
    Delete,
    Share,
    Assign,
}

impl AccessRight {
    /// The platform's bit value for this right.
    pub const fn bit(self) -> u32 {
        match self {
            Self::Read => 0x0000_0001,
            Self::Write => 0x0000_0002,
            Self::Append => 0x0000_0004,
            Self::AppendTo => 0x0000_0010,
            Self::Create => 0x0000_0020,
            Self::Delete => 0x0001_0000,
            Self::Share => 0x0004_0000,
            Self::Assign => 0x0008_0000,
        }
    }

    /// The name the grant action payload uses for this right.
    pub const fn grant_name(self) -> &'static str {
        match self {
            Self::Read => "ReadAccess",
            Self::Write => "WriteAccess",
            Self::Append => "AppendAccess",
            Self::AppendTo => "AppendToAccess",
            Self::Create => "CreateAccess",
            Self::Delete => "DeleteAccess",
            Self::Share => "ShareAccess",
            Self::Assign => "AssignAccess",
        }
    }
}

/// The fixed, non-configurable set of rights that makes a principal a
/// co-owner of a flow.
pub const CO_OWNER_RIGHTS: [AccessRight; 8] = [
    AccessRight::Read,
    AccessRight::Write,
    AccessRight::Append,
    AccessRight::AppendTo,
    AccessRight::Create,
    AccessRight::Delete,
    AccessRight::Share,
    AccessRight::Assign,
];

/// Numeric mask matched by the co-owner query.
pub fn co_owner_access_mask() -> u32 {
    CO_OWNER_RIGHTS.iter().fold(0, |mask, right| mask | right.bit())
}

/// Comma-separated rights list sent in the grant action payload.
pub fn co_owner_access_names() -> String {
    CO_OWNER_RIGHTS
        .iter()
        .map(|right| right.grant_name())
        .collect::<Vec<_>>()
        .join(", ")
}
