//! Integration tests for reading memory out of the current process

#![cfg(any(windows, target_os = "linux", target_os = "macos"))]

use pretty_assertions::assert_eq;
use remote_memory::config::Config;
use remote_memory::{
    read_memory, read_memory_with_data_size, Address, ElementWidth, MemoryError, ReadRequest,
    RemoteMemory,
};

fn own_pid() -> u32 {
    std::process::id()
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_read_eight_bytes() {
    let data: [u8; 8] = [0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70, 0x80];

    let bytes = read_memory(own_pid(), data.as_ptr(), 8).expect("Failed to read own memory");
    assert_eq!(bytes, data.to_vec());

    let words = read_memory_with_data_size(own_pid(), data.as_ptr(), 8, ElementWidth::B32)
        .expect("Failed to read own memory");
    assert_eq!(
        words,
        vec![
            u32::from_ne_bytes([0x10, 0x20, 0x30, 0x40]),
            u32::from_ne_bytes([0x50, 0x60, 0x70, 0x80]),
        ]
    );
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_width_one_matches_byte_read() {
    let data: Vec<u8> = (0u8..64).map(|i| i.wrapping_mul(37)).collect();

    let bytes = read_memory(own_pid(), data.as_ptr(), data.len()).unwrap();
    let values =
        read_memory_with_data_size(own_pid(), data.as_ptr(), data.len(), ElementWidth::B8)
            .unwrap();

    assert_eq!(values.len(), data.len());
    assert_eq!(values, bytes.iter().map(|&b| u32::from(b)).collect::<Vec<_>>());
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_trailing_bytes_are_dropped() {
    let data: [u8; 7] = [1, 2, 3, 4, 5, 6, 7];

    let words = read_memory_with_data_size(own_pid(), data.as_ptr(), 7, ElementWidth::B32).unwrap();
    assert_eq!(words, vec![u32::from_ne_bytes([1, 2, 3, 4])]);

    let halves = read_memory_with_data_size(own_pid(), data.as_ptr(), 5, ElementWidth::B16).unwrap();
    assert_eq!(
        halves,
        vec![
            u32::from(u16::from_ne_bytes([1, 2])),
            u32::from(u16::from_ne_bytes([3, 4])),
        ]
    );
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_zero_length_read_at_any_address() {
    assert!(read_memory(own_pid(), 0u64, 0).unwrap().is_empty());
    assert!(read_memory(own_pid(), 0xDEAD_0000u64, 0).unwrap().is_empty());
    assert!(
        read_memory_with_data_size(own_pid(), u64::MAX, 0, ElementWidth::B32)
            .unwrap()
            .is_empty()
    );
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_null_address_is_invalid() {
    let result = read_memory(own_pid(), Address::null(), 16);
    assert!(
        matches!(result, Err(MemoryError::InvalidAddress { .. })),
        "unexpected result: {result:?}"
    );
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_nonexistent_pid() {
    let result = read_memory(0, 0x1000u64, 4);
    assert!(matches!(result, Err(MemoryError::ProcessNotFound(0))));

    // Resolution happens before the zero-length shortcut
    let result = read_memory(0, 0x1000u64, 0);
    assert!(matches!(result, Err(MemoryError::ProcessNotFound(0))));
}

#[cfg(target_os = "linux")]
#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_unused_pid_on_linux() {
    // Above the largest pid_max the kernel accepts
    let pid = 0x7FFF_FFF0;
    let result = read_memory(pid, 0x1000u64, 4);
    assert!(matches!(result, Err(MemoryError::ProcessNotFound(p)) if p == pid));
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_read_request() {
    let data: [u8; 6] = [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF];
    let request = ReadRequest::new(own_pid(), data.as_ptr(), data.len()).with_width(ElementWidth::B16);

    let values = RemoteMemory::new().read(&request).unwrap();
    assert_eq!(values.len(), request.value_count());
    assert_eq!(values[2], u32::from(u16::from_ne_bytes([0xEE, 0xFF])));
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_large_read() {
    let data: Vec<u8> = (0..(1 << 20)).map(|i: u32| (i % 251) as u8).collect();
    let bytes = read_memory(own_pid(), data.as_ptr(), data.len()).unwrap();
    assert_eq!(bytes.len(), data.len());
    assert!(bytes == data);
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_configured_limit() {
    let mut config = Config::default();
    config.reader.max_read_size = Some(16);
    let memory = RemoteMemory::from_config(&config);

    let data = [0u8; 32];
    let result = memory.read_memory(own_pid(), data.as_ptr(), 32);
    assert!(matches!(
        result,
        Err(MemoryError::ReadTooLarge {
            requested: 32,
            limit: 16
        })
    ));
}

#[cfg(unix)]
mod guard_page {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Two pages, the second made inaccessible, filled with a marker byte
    struct GuardedPages {
        base: *mut libc::c_void,
        page: usize,
    }

    impl GuardedPages {
        fn new() -> Self {
            let page = unsafe { libc::sysconf(libc::_SC_PAGESIZE) } as usize;
            let base = unsafe {
                libc::mmap(
                    std::ptr::null_mut(),
                    page * 2,
                    libc::PROT_READ | libc::PROT_WRITE,
                    libc::MAP_PRIVATE | libc::MAP_ANON,
                    -1,
                    0,
                )
            };
            assert_ne!(base, libc::MAP_FAILED);
            unsafe {
                std::ptr::write_bytes(base as *mut u8, 0x5A, page * 2);
                let second = (base as *mut u8).add(page) as *mut libc::c_void;
                assert_eq!(libc::mprotect(second, page, libc::PROT_NONE), 0);
            }
            GuardedPages { base, page }
        }

        fn first(&self) -> u64 {
            self.base as u64
        }

        fn second(&self) -> u64 {
            self.base as u64 + self.page as u64
        }
    }

    impl Drop for GuardedPages {
        fn drop(&mut self) {
            unsafe {
                libc::munmap(self.base, self.page * 2);
            }
        }
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_read_into_guard_page_is_short() {
        let pages = GuardedPages::new();
        let start = pages.second() - 8;

        let result = read_memory(own_pid(), start, 16);
        match result {
            Err(MemoryError::ShortRead {
                address,
                requested,
                read,
            }) => {
                assert_eq!(address, Address::new(start));
                assert_eq!(requested, 16);
                assert_eq!(read, 8);
            }
            other => panic!("expected ShortRead, got {other:?}"),
        }
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_read_inside_guard_page_is_invalid() {
        let pages = GuardedPages::new();
        let result = read_memory(own_pid(), pages.second(), 4);
        assert!(
            matches!(result, Err(MemoryError::InvalidAddress { .. })),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_readable_page_still_reads() {
        let pages = GuardedPages::new();
        let bytes = read_memory(own_pid(), pages.first(), pages.page).unwrap();
        assert!(bytes.iter().all(|&b| b == 0x5A));
    }
}

#[cfg(target_os = "linux")]
mod exited_target {
    use super::*;
    use remote_memory::{MemoryReader, ProcessHandle};
    use std::process::Command;
    use std::thread;
    use std::time::Duration;

    /// Polls `/proc/<pid>/stat` until the process reaches `state`
    fn wait_for_state(pid: u32, state: char) -> bool {
        for _ in 0..500 {
            if let Ok(stat) = std::fs::read_to_string(format!("/proc/{pid}/stat")) {
                let current = stat
                    .rsplit(')')
                    .next()
                    .and_then(|fields| fields.trim_start().chars().next());
                if current == Some(state) {
                    return true;
                }
            }
            thread::sleep(Duration::from_millis(10));
        }
        false
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_zombie_is_not_found() {
        let mut child = Command::new("true").spawn().expect("Failed to spawn true");
        let pid = child.id();
        assert!(wait_for_state(pid, 'Z'), "child never became a zombie");

        let result = read_memory(pid, 0x1000u64, 4);
        assert!(
            matches!(result, Err(MemoryError::ProcessNotFound(p)) if p == pid),
            "unexpected result: {result:?}"
        );

        child.wait().unwrap();
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_exit_after_open_invalidates_handle() {
        let mut child = Command::new("sleep")
            .arg("30")
            .spawn()
            .expect("Failed to spawn sleep");
        let pid = child.id();
        let handle = ProcessHandle::open(pid).expect("Failed to open child");

        child.kill().unwrap();
        child.wait().unwrap();

        let result = MemoryReader::default().read(&handle, Address::new(0x1000), 4);
        assert!(
            matches!(result, Err(MemoryError::HandleInvalid { pid: p }) if p == pid),
            "unexpected result: {result:?}"
        );
    }
}
