//! Engine run integration tests
//!
//! Ordering, progress, error isolation and cancellation as seen from outside
//! the crate.

#[cfg(test)]
mod tests {
    use crate::common::{RecordingProgress, column_range, numbered_range};
    use gridprobe::{
        Area, CellRef, CellValue, Engine, GridError, InputRange, ItemError, MemorySink,
        NoopProgress, RunOutcome, process_fn,
    };
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    // ==================== Ordering ====================

    /// Results land at their input positions even when completion order is reversed
    #[tokio::test]
    async fn test_results_follow_input_order() {
        let engine = Engine::new(&numbered_range(12), 4).unwrap();
        let processor = process_fn(|item: String, _cancel| async move {
            let n: u64 = item.parse().unwrap();
            tokio::time::sleep(Duration::from_millis(24 - 2 * n)).await;
            Ok::<_, ItemError>(n * n)
        });

        let mut sink = MemorySink::new();
        let outcome = engine
            .start(&processor, &NoopProgress, &mut sink, &CancellationToken::new())
            .await
            .unwrap();

        let results = outcome.results().unwrap();
        for n in 0..12u64 {
            assert_eq!(results.get(n as usize, 0), Some(&Ok(n * n)));
        }
    }

    /// The three-URL scenario renders true, false, timeout in row order
    #[tokio::test]
    async fn test_mixed_outcomes_render_in_place() {
        let engine = Engine::new(&column_range(&["http://a", "http://b", "http://c"]), 2).unwrap();
        let processor = process_fn(|item: String, _cancel| async move {
            match item.as_str() {
                "http://a" => Ok(true),
                "http://b" => Ok(false),
                _ => Err(ItemError::Timeout),
            }
        });

        let mut sink = MemorySink::new();
        let outcome = engine
            .start(&processor, &NoopProgress, &mut sink, &CancellationToken::new())
            .await
            .unwrap();

        crate::assert_rendered!(
            outcome.results().unwrap(),
            [["true"], ["false"], ["timeout"]]
        );
        assert_eq!(sink.last().unwrap().target_origin, CellRef::new(0, 1));
    }

    // ==================== Progress ====================

    /// Counts rise by one per item and bracket messages come first and last
    #[tokio::test]
    async fn test_progress_sequence() {
        let total = 9;
        let engine = Engine::new(&numbered_range(total), 3).unwrap();
        let processor = process_fn(|_item: String, _cancel| async move {
            tokio::task::yield_now().await;
            Ok(())
        });
        let progress = RecordingProgress::new();

        let mut sink = MemorySink::new();
        engine
            .start(&processor, &progress, &mut sink, &CancellationToken::new())
            .await
            .unwrap();

        let fractions = progress.fractions();
        assert_eq!(fractions.len(), total);
        assert!(fractions.windows(2).all(|w| w[0] < w[1]));
        assert!((fractions[total - 1] - 1.0).abs() < f64::EPSILON);

        let messages = progress.messages();
        assert_eq!(messages.len(), total + 2);
        assert_eq!(messages[0], "Initializing task resources...");
        for (i, message) in messages[1..=total].iter().enumerate() {
            assert_eq!(message, &format!("Processed: {}/{}", i + 1, total));
        }
        assert!(messages[total + 1].starts_with("Elapsed "));
        assert!(messages[total + 1].ends_with("9/9"));
    }

    // ==================== Input errors ====================

    /// Input errors surface before any item is processed
    #[tokio::test]
    async fn test_input_errors_abort_before_dispatch() {
        let left = Area::from_rows(CellRef::new(0, 0), vec![vec![CellValue::from("a")]]).unwrap();
        let right = Area::from_rows(CellRef::new(0, 2), vec![vec![CellValue::from("b")]]).unwrap();
        let err = Engine::new(&InputRange::new(vec![left, right]), 1).unwrap_err();
        assert!(err.is_input_error());

        let err = Engine::new(&InputRange::new(Vec::new()), 1).unwrap_err();
        assert!(matches!(err, GridError::EmptyRange));

        let numeric = Area::from_rows(CellRef::new(4, 0), vec![vec![CellValue::Number(1.0)]])
            .unwrap();
        let err = Engine::new(&InputRange::single(numeric), 1).unwrap_err();
        assert!(matches!(err, GridError::Coercion { row: 0, column: 0, found: "a number" }));
    }

    /// A blank cell is an empty item, not an input error
    #[tokio::test]
    async fn test_blank_cell_is_processed_as_empty_item() {
        let engine = Engine::new(&column_range(&["x", ""]), 1).unwrap();
        let processor = process_fn(|item: String, _cancel| async move { Ok(item.is_empty()) });

        let mut sink = MemorySink::new();
        let outcome = engine
            .start(&processor, &NoopProgress, &mut sink, &CancellationToken::new())
            .await
            .unwrap();
        crate::assert_rendered!(outcome.results().unwrap(), [["false"], ["true"]]);
    }

    // ==================== Cancellation ====================

    /// A token cancelled from outside mid-run leaves the sink untouched
    #[tokio::test]
    async fn test_external_cancellation() {
        let engine = Engine::new(&numbered_range(40), 2).unwrap();
        let processor = process_fn(|_item: String, cancel: CancellationToken| async move {
            tokio::select! {
                _ = cancel.cancelled() => Err(ItemError::Cancelled),
                _ = tokio::time::sleep(Duration::from_millis(20)) => Ok(()),
            }
        });

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(70)).await;
            trigger.cancel();
        });

        let mut sink = MemorySink::new();
        let outcome = engine
            .start(&processor, &NoopProgress, &mut sink, &cancel)
            .await
            .unwrap();

        assert!(sink.is_empty());
        let RunOutcome::Cancelled { partial, summary } = outcome else {
            panic!("expected a cancelled run");
        };
        assert!(summary.completed < 40);
        assert_eq!(
            partial.iter().filter(|slot| slot.is_some()).count(),
            summary.completed
        );
    }

    /// Cancelling after every item finished still withholds delivery
    #[tokio::test]
    async fn test_cancel_on_last_item_withholds_delivery() {
        let engine = Engine::new(&numbered_range(3), 1).unwrap();
        let processor = process_fn(|item: String, cancel: CancellationToken| async move {
            if item == "2" {
                cancel.cancel();
            }
            Ok(())
        });

        let cancel = CancellationToken::new();
        let mut sink = MemorySink::new();
        let outcome = engine
            .start(&processor, &NoopProgress, &mut sink, &cancel)
            .await
            .unwrap();
        assert!(outcome.is_cancelled());
        assert_eq!(outcome.summary().completed, 3);
        assert!(sink.is_empty());
    }
}
