//! Property-based tests for the buffered output stream

use proptest::prelude::*;
use std::sync::{Arc, Mutex};
use webtty::terminal::{OutputStream, Writable};

fn recording_stream() -> (OutputStream, Arc<Mutex<Vec<String>>>) {
    let flushed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&flushed);
    let stream = OutputStream::with_on_flush(move |text| {
        sink.lock().unwrap().push(text.to_string());
    });
    (stream, flushed)
}

proptest! {
    #[test]
    fn test_nothing_lost_or_duplicated(fragments in prop::collection::vec("[a-z\n]{0,8}", 0..20)) {
        let (stream, flushed) = recording_stream();
        for fragment in &fragments {
            stream.write(fragment).unwrap();
        }
        stream.flush();
        prop_assert_eq!(flushed.lock().unwrap().concat(), fragments.concat());
    }

    #[test]
    fn test_flush_count_matches_terminated_writes(fragments in prop::collection::vec("[a-z]{1,6}\n?", 0..20)) {
        let (stream, flushed) = recording_stream();
        for fragment in &fragments {
            stream.write(fragment).unwrap();
        }
        let terminated = fragments.iter().filter(|f| f.ends_with('\n')).count();
        prop_assert_eq!(flushed.lock().unwrap().len(), terminated);
    }

    #[test]
    fn test_write_reports_char_count(s in "\\PC{0,50}") {
        let stream = OutputStream::new();
        prop_assert_eq!(stream.write(&s).unwrap(), s.chars().count());
    }

    #[test]
    fn test_no_empty_chunks(fragments in prop::collection::vec("[a-z\n]{0,4}", 0..20)) {
        let (stream, flushed) = recording_stream();
        for fragment in &fragments {
            stream.write(fragment).unwrap();
            stream.flush();
        }
        prop_assert!(flushed.lock().unwrap().iter().all(|chunk| !chunk.is_empty()));
    }
}
