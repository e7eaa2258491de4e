use geococo2tfrecord::ir::{BBoxXYWH, Pixel};
use geococo2tfrecord::split::{split, split_index};
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn split_partitions_every_item(total in 0usize..500, ratio in 0.0f64..=1.0) {
        let items: Vec<usize> = (0..total).collect();
        let (train, valid) = split(items, ratio);

        prop_assert_eq!(train.len(), split_index(total, ratio));
        prop_assert_eq!(train.len() + valid.len(), total);
        let rejoined: Vec<usize> = train.into_iter().chain(valid).collect();
        prop_assert_eq!(rejoined, (0..total).collect::<Vec<_>>());
    }

    #[test]
    fn default_ratio_floors(total in 0usize..10_000) {
        prop_assert_eq!(split_index(total, 0.8), (total as f64 * 0.8).floor() as usize);
    }

    #[test]
    fn normalization_inverts(
        x in 0.0f64..4096.0,
        y in 0.0f64..4096.0,
        w in 0.0f64..4096.0,
        h in 0.0f64..4096.0,
        image_w in 1u32..8192,
        image_h in 1u32..8192,
    ) {
        let bbox = BBoxXYWH::<Pixel>::from_xywh(x, y, w, h);
        let (iw, ih) = (f64::from(image_w), f64::from(image_h));
        let norm = bbox.to_normalized(iw, ih);

        prop_assert!((norm.x() * iw - x).abs() < 1e-6);
        prop_assert!((norm.y() * ih - y).abs() < 1e-6);
        prop_assert!((norm.width() * iw - w).abs() < 1e-6);
        prop_assert!((norm.height() * ih - h).abs() < 1e-6);
    }
}
