//! Win32 error codes relevant to opening processes and reading their memory

use std::fmt;
use winapi::um::errhandlingapi::GetLastError;

/// Win32 error codes the backend distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success,
    AccessDenied,
    InvalidHandle,
    InvalidParameter,
    PartialCopy,
    InvalidAddress,
    NoAccess,
    Unknown(u32),
}

impl From<u32> for ErrorCode {
    fn from(code: u32) -> Self {
        match code {
            0 => ErrorCode::Success,
            5 => ErrorCode::AccessDenied,
            6 => ErrorCode::InvalidHandle,
            87 => ErrorCode::InvalidParameter,
            299 => ErrorCode::PartialCopy,
            487 => ErrorCode::InvalidAddress,
            998 => ErrorCode::NoAccess,
            _ => ErrorCode::Unknown(code),
        }
    }
}

impl ErrorCode {
    /// Get the last Windows error of the calling thread
    pub fn last_error() -> Self {
        unsafe { ErrorCode::from(GetLastError()) }
    }

    /// Raw Win32 value
    pub fn code(self) -> u32 {
        match self {
            ErrorCode::Success => 0,
            ErrorCode::AccessDenied => 5,
            ErrorCode::InvalidHandle => 6,
            ErrorCode::InvalidParameter => 87,
            ErrorCode::PartialCopy => 299,
            ErrorCode::InvalidAddress => 487,
            ErrorCode::NoAccess => 998,
            ErrorCode::Unknown(code) => code,
        }
    }

    /// Codes `ReadProcessMemory` reports when part of the range is unreadable
    pub fn is_unreadable_memory(self) -> bool {
        matches!(
            self,
            ErrorCode::PartialCopy | ErrorCode::InvalidAddress | ErrorCode::NoAccess
        )
    }

    pub fn to_io_error(self) -> std::io::Error {
        std::io::Error::from_raw_os_error(self.code() as i32)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Success => write!(f, "Success"),
            ErrorCode::AccessDenied => write!(f, "Access denied"),
            ErrorCode::InvalidHandle => write!(f, "Invalid handle"),
            ErrorCode::InvalidParameter => write!(f, "Invalid parameter"),
            ErrorCode::PartialCopy => write!(f, "Partial copy"),
            ErrorCode::InvalidAddress => write!(f, "Invalid address"),
            ErrorCode::NoAccess => write!(f, "Invalid access to memory location"),
            ErrorCode::Unknown(code) => write!(f, "Unknown error: {}", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_conversion() {
        assert_eq!(ErrorCode::from(0), ErrorCode::Success);
        assert_eq!(ErrorCode::from(5), ErrorCode::AccessDenied);
        assert_eq!(ErrorCode::from(299), ErrorCode::PartialCopy);
        assert_eq!(ErrorCode::from(998), ErrorCode::NoAccess);
        assert_eq!(ErrorCode::from(999), ErrorCode::Unknown(999));
        assert_eq!(ErrorCode::from(299).code(), 299);
        assert_eq!(ErrorCode::Unknown(1234).code(), 1234);
    }

    #[test]
    fn test_unreadable_memory_codes() {
        assert!(ErrorCode::PartialCopy.is_unreadable_memory());
        assert!(ErrorCode::NoAccess.is_unreadable_memory());
        assert!(ErrorCode::InvalidAddress.is_unreadable_memory());
        assert!(!ErrorCode::AccessDenied.is_unreadable_memory());
        assert!(!ErrorCode::InvalidHandle.is_unreadable_memory());
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(format!("{}", ErrorCode::Success), "Success");
        assert_eq!(format!("{}", ErrorCode::AccessDenied), "Access denied");
        assert_eq!(format!("{}", ErrorCode::Unknown(123)), "Unknown error: 123");
    }
}
