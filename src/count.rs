//! Advisory pre-count of items across all scan targets.

use crate::models::ScanTarget;
use crate::rclone::RemoteSource;

/// Sum the item counts of every target.
///
/// Counting exists only to size the progress bar, so a failing target logs a
/// warning and contributes zero instead of aborting the run.
pub fn count_all_items(source: &dyn RemoteSource, targets: &[ScanTarget]) -> u64 {
    let mut total = 0u64;
    for target in targets {
        match source.count_items(target) {
            Ok(count) => total += count,
            Err(err) => {
                eprintln!(
                    "unable to count items for {} ({:#}); continuing",
                    target.scoped_id(),
                    err
                );
            }
        }
    }
    total
}
