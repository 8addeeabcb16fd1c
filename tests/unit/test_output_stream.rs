//! Unit tests for the buffered output stream

use std::sync::{Arc, Mutex};
use webtty::terminal::{OutputStream, Writable};
use webtty::Error;

fn recording_stream() -> (Arc<OutputStream>, Arc<Mutex<Vec<String>>>) {
    let flushed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&flushed);
    let stream = Arc::new(OutputStream::with_on_flush(move |text| {
        sink.lock().unwrap().push(text.to_string());
    }));
    (stream, flushed)
}

#[cfg(test)]
mod output_stream_tests {
    use super::*;

    #[test]
    fn test_line_assembled_from_fragments() {
        let (stream, flushed) = recording_stream();
        stream.write("ab").unwrap();
        stream.write("c\n").unwrap();
        assert_eq!(*flushed.lock().unwrap(), vec!["abc\n"]);
    }

    #[test]
    fn test_each_terminated_write_flushes() {
        let (stream, flushed) = recording_stream();
        stream.write("one\n").unwrap();
        stream.write("two\n").unwrap();
        assert_eq!(*flushed.lock().unwrap(), vec!["one\n", "two\n"]);
    }

    #[test]
    fn test_embedded_newline_does_not_flush() {
        let (stream, flushed) = recording_stream();
        stream.write("a\nb").unwrap();
        assert!(flushed.lock().unwrap().is_empty());
        stream.flush();
        assert_eq!(*flushed.lock().unwrap(), vec!["a\nb"]);
    }

    #[test]
    fn test_flush_on_empty_buffer_is_silent() {
        let (stream, flushed) = recording_stream();
        stream.flush();
        stream.write("").unwrap();
        stream.flush();
        assert!(flushed.lock().unwrap().is_empty());
    }

    #[test]
    fn test_callback_replaced_between_flushes() {
        let (stream, first) = recording_stream();
        stream.write("to first\n").unwrap();

        let second = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&second);
        stream.set_on_flush(move |text| sink.lock().unwrap().push(text.to_string()));
        stream.write("to second\n").unwrap();

        assert_eq!(*first.lock().unwrap(), vec!["to first\n"]);
        assert_eq!(*second.lock().unwrap(), vec!["to second\n"]);
    }

    #[test]
    fn test_cleared_callback_drops_text() {
        let (stream, flushed) = recording_stream();
        stream.clear_on_flush();
        stream.write("gone\n").unwrap();
        assert!(flushed.lock().unwrap().is_empty());
        assert!(!stream.has_pending());
    }

    #[test]
    fn test_formatter_can_prefix() {
        let (stream, flushed) = recording_stream();
        stream.set_format(|text| Ok(format!("[err] {}", text)));
        stream.write("bad\n").unwrap();
        stream.clear_format();
        stream.write("plain\n").unwrap();
        assert_eq!(*flushed.lock().unwrap(), vec!["[err] bad\n", "plain\n"]);
    }

    #[test]
    fn test_formatter_error_reaches_caller() {
        let (stream, _) = recording_stream();
        stream.set_format(|_| {
            Err(Error::FormatFailed {
                reason: "nope".to_string(),
            })
        });
        let err = stream.write("x").unwrap_err();
        assert_eq!(err.to_string(), "Stream format failed: nope");
    }

    #[test]
    fn test_writes_from_threads_are_not_lost() {
        let (stream, flushed) = recording_stream();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let stream = Arc::clone(&stream);
                std::thread::spawn(move || {
                    for j in 0..25 {
                        stream.write(&format!("{}-{}\n", i, j)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        // Concurrent writes may share a flush, but every line arrives once
        let text = flushed.lock().unwrap().concat();
        assert_eq!(text.lines().count(), 100);
        assert!(!stream.has_pending());
    }
}
