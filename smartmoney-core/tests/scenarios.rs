use smartmoney_core::patterns::{Direction, Side};
use smartmoney_core::{Candle, DetectorConfig, detect_all, normalize};

fn series(rows: &[(f64, f64, f64, f64)]) -> smartmoney_core::Series {
    let raw = rows
        .iter()
        .enumerate()
        .map(|(i, &(o, h, l, c))| Candle::new(1_700_000_000 + 3_600 * i as i64, o, h, l, c));
    normalize(raw).series
}

#[test]
fn five_candle_impulse_flags_body_zone() {
    let s = series(&[
        (10.0, 12.0, 9.0, 11.0),
        (11.0, 13.0, 10.0, 12.0),
        (12.0, 16.0, 11.0, 15.0),
        (15.0, 15.2, 13.0, 14.0),
        (14.0, 14.5, 13.5, 14.2),
    ]);
    let report = detect_all(&s, "XAUUSD", &DetectorConfig::default());

    assert_eq!(report.order_blocks.len(), 1);
    let ob = report.order_blocks[0];
    assert_eq!(ob.index, 1);
    assert_eq!(ob.direction, Direction::Bullish);
    assert!((ob.zone_low - 11.0).abs() < 1e-9);
    assert!((ob.zone_high - 12.0).abs() < 1e-9);
    assert!((ob.wick_low - 10.0).abs() < 1e-9);
    assert!((ob.wick_high - 13.0).abs() < 1e-9);

    let cand = report.candidate.expect("candidate from order block");
    assert_eq!(cand.side, Side::Long);
    assert_eq!(cand.symbol, "XAUUSD");
    assert!((cand.entry - 11.5).abs() < 1e-9);
    assert!((cand.stop - 10.5).abs() < 1e-9);
    // Window 3 needs seven candles, so no structure break and a 2:1 projection.
    assert!(report.msb.is_none());
    assert!((cand.target - 21.6).abs() < 1e-9);
}

#[test]
fn gap_between_100_and_105_is_bullish_fvg() {
    let s = series(&[
        (98.0, 100.0, 97.0, 99.5),
        (99.5, 106.0, 99.0, 105.5),
        (105.5, 108.0, 105.0, 107.0),
    ]);
    let report = detect_all(&s, "EURUSD", &DetectorConfig::default());
    assert_eq!(report.fvg.len(), 1);
    let gap = report.fvg[0];
    assert_eq!(gap.direction, Direction::Bullish);
    assert!((gap.gap_low - 100.0).abs() < 1e-9);
    assert!((gap.gap_high - 105.0).abs() < 1e-9);
    assert!(report.candidate.is_none());
}

#[test]
fn empty_series_yields_empty_report() {
    let report = detect_all(&smartmoney_core::Series::empty(), "X", &DetectorConfig::default());
    assert!(report.is_empty());
    assert!(report.candidate.is_none());
}

#[test]
fn report_serializes_for_collaborators() {
    let s = series(&[
        (10.0, 12.0, 9.0, 11.0),
        (11.0, 13.0, 10.0, 12.0),
        (12.0, 16.0, 11.0, 15.0),
        (15.0, 15.2, 13.0, 14.0),
        (14.0, 14.5, 13.5, 14.2),
    ]);
    let report = detect_all(&s, "XAUUSD", &DetectorConfig::default());
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["order_blocks"][0]["direction"], "bullish");
    assert_eq!(json["candidate"]["side"], "long");
}

#[test]
fn failed_break_and_steady_decline_surface_in_the_report() {
    let s = series(&[
        (10.0, 10.5, 9.5, 10.0),
        (10.0, 10.2, 9.0, 9.4),
        (9.4, 10.6, 9.3, 10.4),
    ]);
    let report = detect_all(&s, "XAUUSD", &DetectorConfig::default());
    assert_eq!(report.turtle_soup.len(), 1);
    assert_eq!(report.turtle_soup[0].direction, Direction::Bullish);
    assert!(!report.is_empty());

    let rows: Vec<(f64, f64, f64, f64)> = (0..20)
        .map(|i| {
            let c = 40.0 - f64::from(i);
            (c + 1.0, c + 1.1, c - 0.1, c)
        })
        .collect();
    let report = detect_all(&series(&rows), "XAUUSD", &DetectorConfig::default());
    assert!(report.turtle_soup.is_empty());
    assert_eq!(report.momentum.rsi, Some(0.0));
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(
        json["momentum"]["signals"][0],
        serde_json::json!({"type": "rsi", "side": "long", "value": 0.0})
    );
}
