use proptest::prelude::*;
use smartmoney_core::Candle;
use smartmoney_core::patterns::{SwingKind, detect_fvg, detect_msb, detect_order_blocks, detect_sweeps, swing_points};
use smartmoney_core::{OrderBlockConfig, SweepConfig};

fn arb_series(max: usize) -> impl Strategy<Value = Vec<Candle>> {
    proptest::collection::vec((1.0f64..100.0, 0.0f64..5.0, 0.0f64..5.0), 0..max).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (mid, up, down))| {
                Candle::new(1_000 + i64::try_from(i).unwrap() * 60, mid, mid + up, mid - down, mid)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn swing_detection_is_idempotent(candles in arb_series(80), w in 0usize..6) {
        let a: Vec<_> = swing_points(&candles, w).collect();
        let b: Vec<_> = swing_points(&candles, w).collect();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn swings_are_strict_and_away_from_edges(candles in arb_series(80), w in 1usize..6) {
        let n = candles.len();
        let mut last_index = None;
        for p in swing_points(&candles, w) {
            prop_assert!(p.index >= w && p.index + w < n);
            if let Some(prev) = last_index {
                prop_assert!(p.index >= prev);
            }
            last_index = Some(p.index);
            for j in p.index - w..=p.index + w {
                if j == p.index {
                    continue;
                }
                match p.kind {
                    SwingKind::High => prop_assert!(candles[p.index].high > candles[j].high),
                    SwingKind::Low => prop_assert!(candles[p.index].low < candles[j].low),
                }
            }
        }
    }

    #[test]
    fn detectors_are_empty_below_minimum(candles in arb_series(12), w in 1usize..4) {
        if candles.len() < 4 {
            prop_assert!(detect_order_blocks(&candles, &OrderBlockConfig::default()).is_empty());
        }
        if candles.len() < 3 {
            prop_assert!(detect_fvg(&candles, 120).is_empty());
        }
        if candles.len() < 2 * w + 1 {
            prop_assert!(detect_msb(&candles, w).is_none());
        }
        if candles.len() < 2 * w + 2 {
            prop_assert!(detect_sweeps(&candles, w, &SweepConfig::default()).is_empty());
        }
    }
}
