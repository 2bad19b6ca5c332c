use std::{io, sync::Arc};

use parking_lot::Mutex;
use strand_common::collections::{ArrayError, DynamicArray};
use strand_logging::{LogLevel, Logger};

static LOGGER: Logger = Logger::new();

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// Only test in this binary, the global logger is shared by the whole process
#[test]
fn growth_and_overflow_are_logged() {
    let buffer = SharedBuffer::default();
    LOGGER.set_log_to_console(false);
    LOGGER.set_always_flush(true);
    LOGGER.set_max_level(LogLevel::Verbose);
    assert!(LOGGER.add_writer(Box::new(buffer.clone())).is_ok());
    strand_logging::set_logger(&LOGGER);

    let mut arr = DynamicArray::<u16>::with_size(2).unwrap();
    arr.resize(6).unwrap();
    assert_eq!(arr.resize(isize::MAX), Err(ArrayError::CapacityOverflow));

    let contents = String::from_utf8_lossy(&buffer.0.lock()).into_owned();
    // Too many bytes for `isize`, even though the element count itself fits
    assert!(contents.contains(&format!("Failed to grow buffer of `u16` to {} elements: capacity overflow", isize::MAX)));
    if cfg!(feature = "log_reallocations") {
        assert!(contents.contains("[Collections]"));
        assert!(contents.contains("Growing buffer of `u16` from 2 to 6 elements"));
    }
}
