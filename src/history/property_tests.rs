//! Property-based tests for history ordering, retention, and pin-cap
//! invariants.
//!
//! These use proptest to verify the policy holds under arbitrary item
//! collections and operation sequences, not just the handful of shapes the
//! unit tests pick.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use crate::constants::{MAX_PINNED_ITEMS, RETENTION_WINDOW_MS};
    use crate::history::clock::FixedClock;
    use crate::history::index::{HistoryIndex, sort_for_listing, sweep_expired};
    use crate::history::types::{DesignCatalog, HistoryItem, ImageRef, LandscapingStyle};
    use crate::kv::KvStore;

    const NOW_MS: i64 = 1_754_000_000_000;

    fn make_item(id: &str, timestamp: i64, pinned: bool) -> HistoryItem {
        HistoryItem {
            id: id.to_string(),
            timestamp,
            is_pinned: pinned,
            style: LandscapingStyle::Modern,
            climate_zone: String::new(),
            design_catalog: DesignCatalog::default(),
            original_image: ImageRef {
                id: format!("{id}_original"),
                mime_type: "image/jpeg".to_string(),
                name: None,
            },
            redesigned_image: ImageRef {
                id: format!("{id}_redesigned"),
                mime_type: "image/png".to_string(),
                name: None,
            },
        }
    }

    /// Strategy for items whose ages straddle the retention window.
    fn item_strategy() -> impl Strategy<Value = HistoryItem> {
        (
            "[a-z0-9]{1,12}",
            (NOW_MS - 2 * RETENTION_WINDOW_MS)..NOW_MS,
            any::<bool>(),
        )
            .prop_map(|(id, timestamp, pinned)| make_item(&id, timestamp, pinned))
    }

    fn items_strategy() -> impl Strategy<Value = Vec<HistoryItem>> {
        prop::collection::vec(item_strategy(), 0..50)
    }

    /// Checks the listing order contract: pinned before unpinned, then
    /// descending timestamp within each pinned state.
    fn assert_listing_order(items: &[HistoryItem]) -> Result<(), TestCaseError> {
        for pair in items.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(
                a.is_pinned || !b.is_pinned,
                "unpinned item before pinned item"
            );
            if a.is_pinned == b.is_pinned {
                prop_assert!(
                    a.timestamp >= b.timestamp,
                    "timestamps not descending within pinned state"
                );
            }
        }
        Ok(())
    }

    proptest! {
        /// Sorting any collection yields the listing order.
        #[test]
        fn sort_orders_pinned_first_then_descending(mut items in items_strategy()) {
            sort_for_listing(&mut items);
            assert_listing_order(&items)?;
        }

        /// The sweep keeps exactly the pinned and the fresh-enough items,
        /// and reports exactly the rest as evicted.
        #[test]
        fn sweep_keeps_exactly_the_survivors(mut items in items_strategy()) {
            let expected: Vec<String> = items
                .iter()
                .filter(|i| i.is_pinned || NOW_MS - i.timestamp < RETENTION_WINDOW_MS)
                .map(|i| i.id.clone())
                .collect();

            let before = items.len();
            let evicted = sweep_expired(&mut items, NOW_MS);

            prop_assert_eq!(before - items.len(), evicted.len());
            prop_assert!(
                evicted
                    .iter()
                    .all(|i| !i.is_pinned && NOW_MS - i.timestamp >= RETENTION_WINDOW_MS)
            );
            let kept: Vec<String> = items.iter().map(|i| i.id.clone()).collect();
            prop_assert_eq!(kept, expected);
        }

        /// Sweeping a second time at the same instant removes nothing.
        #[test]
        fn sweep_is_idempotent(mut items in items_strategy()) {
            sweep_expired(&mut items, NOW_MS);
            prop_assert!(sweep_expired(&mut items, NOW_MS).is_empty());
        }

        /// After any insert sequence, the index listing honors the order
        /// contract and contains no expired unpinned items.
        #[test]
        fn index_listing_always_ordered_and_swept(items in items_strategy()) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let index = HistoryIndex::with_clock(
                    KvStore::memory(),
                    Arc::new(FixedClock::new(NOW_MS)),
                );

                for item in items {
                    index.insert(item).await.unwrap();
                }

                let listed = index.list().await;
                assert_listing_order(&listed)?;
                for item in &listed {
                    prop_assert!(
                        item.is_pinned || NOW_MS - item.timestamp < RETENTION_WINDOW_MS,
                        "expired unpinned item survived the sweep"
                    );
                }
                Ok(())
            })?;
        }

        /// No toggle sequence can push the pinned count past the cap, and
        /// a rejected pin leaves the state unchanged.
        #[test]
        fn pin_count_never_exceeds_cap(ops in prop::collection::vec(0usize..12, 0..60)) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let index = HistoryIndex::with_clock(
                    KvStore::memory(),
                    Arc::new(FixedClock::new(NOW_MS)),
                );

                for n in 0..12i64 {
                    index
                        .insert(make_item(&format!("item_{n}"), NOW_MS - n, false))
                        .await
                        .unwrap();
                }

                for target in ops {
                    let before = index.list().await;
                    let result = index.toggle_pin(&format!("item_{target}")).await;

                    let after = index.list().await;
                    let pinned = after.iter().filter(|i| i.is_pinned).count();
                    prop_assert!(pinned <= MAX_PINNED_ITEMS, "pin cap exceeded");

                    if result.is_err() {
                        prop_assert_eq!(before, after, "rejected toggle mutated state");
                    }
                }
                Ok(())
            })?;
        }
    }
}
