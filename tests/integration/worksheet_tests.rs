//! Worksheet end-to-end tests

#[cfg(test)]
mod tests {
    use crate::common::sheet_with_column;
    use gridprobe::{Engine, GridError, ItemError, NoopProgress, RunOutcome, Worksheet, process_fn};
    use tempfile::tempdir;
    use tokio_util::sync::CancellationToken;

    /// Load, run, save, reload: results sit right of a two-column input
    #[tokio::test]
    async fn test_grid_round_trip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.tsv");
        tokio::fs::write(&path, "left\tright\nab\tcde\nf\t\n")
            .await
            .unwrap();

        let mut sheet = Worksheet::load(&path).await.unwrap();
        let range = sheet.select("A2:B3").unwrap();
        let engine = Engine::new(&range, 2).unwrap();
        let lengths = process_fn(|item: String, _cancel| async move {
            if item.is_empty() {
                Err(ItemError::failed("blank"))
            } else {
                Ok(item.len())
            }
        });

        let outcome = engine
            .start(&lengths, &NoopProgress, &mut sheet, &CancellationToken::new())
            .await
            .unwrap();
        assert!(!outcome.is_cancelled());
        sheet.save(&path).await.unwrap();

        let saved = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(saved, "left\tright\nab\tcde\t2\t3\nf\t\t1\tblank\n");
    }

    /// A cancelled run leaves the worksheet exactly as it was
    #[tokio::test]
    async fn test_cancelled_run_leaves_sheet_untouched() {
        let mut sheet = sheet_with_column("item", &["a", "b", "c", "d"]);
        let before = sheet.clone();

        let engine = Engine::new(&sheet.select("A2:A5").unwrap(), 1).unwrap();
        let processor = process_fn(|item: String, cancel: CancellationToken| async move {
            if item == "b" {
                cancel.cancel();
            }
            Ok(item.to_uppercase())
        });

        let outcome = engine
            .start(&processor, &NoopProgress, &mut sheet, &CancellationToken::new())
            .await
            .unwrap();
        let RunOutcome::Cancelled { summary, .. } = outcome else {
            panic!("expected a cancelled run");
        };
        assert_eq!(summary.completed, 2);
        assert_eq!(sheet, before);
    }

    /// Two comma-separated areas are rejected before any work starts
    #[test]
    fn test_discontiguous_selection_rejected() {
        let sheet = sheet_with_column("item", &["a", "b"]);
        let range = sheet.select("A2,A3").unwrap();
        let err = Engine::new(&range, 1).unwrap_err();
        assert!(matches!(err, GridError::DiscontiguousRange { areas: 2 }));
    }

    /// Numeric and boolean cells cannot be probed
    #[test]
    fn test_non_text_cells_rejected() {
        let sheet = Worksheet::parse("a\t12\nb\tTRUE\n");
        let err = Engine::new(&sheet.select("A1:B2").unwrap(), 1).unwrap_err();
        assert!(err.is_input_error());
        assert!(matches!(err, GridError::Coercion { row: 0, column: 1, .. }));
    }

    /// Malformed references are input errors
    #[test]
    fn test_bad_reference_rejected() {
        let sheet = Worksheet::new();
        let err = sheet.select("A0:B2").unwrap_err();
        assert!(err.is_input_error());
    }
}
