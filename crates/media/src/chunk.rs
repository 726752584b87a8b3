//! Timeline partitioning and order-preserving aggregation.

/// Fixed chunk length the external service is sized for.
pub const CHUNK_LEN_SECS: u64 = 60;

/// A trailing chunk strictly shorter than this is dropped instead of
/// transcribing a near-empty clip.
pub const MIN_FINAL_SPAN_SECS: u64 = 5;

/// Soft ceiling; longer uploads are logged, not rejected.
pub const MAX_AUDIO_DURATION_SECS: u64 = 3600;

/// One planned window of the source timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkWindow {
    pub sequence_index: usize,
    pub start_offset_secs: u64,
}

/// Partition `duration_secs` into fixed-width windows.
///
/// `num_chunks = ceil(duration / chunk_len)`, minus one when the final span
/// (`duration - (num_chunks - 1) * chunk_len`) is strictly under
/// [`MIN_FINAL_SPAN_SECS`]. A zero duration (or one shorter than the
/// minimum span) yields an empty plan.
pub fn plan_chunks(duration_secs: u64, chunk_len_secs: u64) -> Vec<ChunkWindow> {
    if duration_secs == 0 {
        return Vec::new();
    }

    let mut num_chunks = duration_secs.div_ceil(chunk_len_secs);
    let final_span = duration_secs - (num_chunks - 1) * chunk_len_secs;
    if final_span < MIN_FINAL_SPAN_SECS {
        num_chunks -= 1;
    }

    (0..num_chunks)
        .map(|i| ChunkWindow {
            sequence_index: i as usize,
            start_offset_secs: i * chunk_len_secs,
        })
        .collect()
}

/// Join chunk transcripts in timeline order, whatever order they finished in.
pub fn aggregate_transcripts(mut parts: Vec<(usize, String)>) -> String {
    parts.sort_by_key(|(sequence_index, _)| *sequence_index);
    parts
        .into_iter()
        .map(|(_, text)| text)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn starts(duration: u64) -> Vec<u64> {
        plan_chunks(duration, CHUNK_LEN_SECS)
            .iter()
            .map(|w| w.start_offset_secs)
            .collect()
    }

    #[test]
    fn five_second_tail_is_kept() {
        assert_eq!(starts(125), vec![0, 60, 120]);
    }

    #[test]
    fn sub_five_second_tail_is_dropped() {
        assert_eq!(starts(122), vec![0, 60]);
    }

    #[test]
    fn exact_single_chunk() {
        assert_eq!(starts(60), vec![0]);
    }

    #[test]
    fn one_second_tail_is_dropped() {
        assert_eq!(starts(301), vec![0, 60, 120, 180, 240]);
    }

    #[test]
    fn boundary_tail_at_185() {
        assert_eq!(starts(185), vec![0, 60, 120, 180]);
    }

    #[test]
    fn zero_duration_plans_nothing() {
        assert!(starts(0).is_empty());
    }

    #[test]
    fn tiny_source_plans_nothing() {
        // 4s: single raw chunk, span under the minimum, dropped.
        assert!(starts(4).is_empty());
    }

    #[test]
    fn sequence_indexes_are_dense() {
        let plan = plan_chunks(601, CHUNK_LEN_SECS);
        let indexes: Vec<_> = plan.iter().map(|w| w.sequence_index).collect();
        assert_eq!(indexes, (0..plan.len()).collect::<Vec<_>>());
    }

    #[test]
    fn aggregation_ignores_completion_order() {
        let reversed = vec![
            (3, "chunk-3".to_string()),
            (2, "chunk-2".to_string()),
            (1, "chunk-1".to_string()),
            (0, "chunk-0".to_string()),
        ];
        assert_eq!(
            aggregate_transcripts(reversed),
            "chunk-0 chunk-1 chunk-2 chunk-3"
        );
    }

    #[test]
    fn aggregation_of_nothing_is_empty() {
        assert_eq!(aggregate_transcripts(Vec::new()), "");
    }

    proptest! {
        #[test]
        fn windows_align_to_chunk_boundaries(duration in 0u64..7200) {
            for (i, window) in plan_chunks(duration, CHUNK_LEN_SECS).iter().enumerate() {
                prop_assert_eq!(window.sequence_index, i);
                prop_assert_eq!(window.start_offset_secs, i as u64 * CHUNK_LEN_SECS);
            }
        }

        #[test]
        fn every_window_starts_inside_the_source(duration in 0u64..7200) {
            for window in plan_chunks(duration, CHUNK_LEN_SECS) {
                prop_assert!(window.start_offset_secs < duration);
            }
        }

        #[test]
        fn final_window_spans_at_least_the_minimum(duration in 1u64..7200) {
            let plan = plan_chunks(duration, CHUNK_LEN_SECS);
            if let Some(last) = plan.last() {
                prop_assert!(duration - last.start_offset_secs >= MIN_FINAL_SPAN_SECS);
            }
        }

        #[test]
        fn never_more_windows_than_raw_ceiling(duration in 1u64..7200) {
            let plan = plan_chunks(duration, CHUNK_LEN_SECS);
            prop_assert!(plan.len() as u64 <= duration.div_ceil(CHUNK_LEN_SECS));
        }
    }
}
