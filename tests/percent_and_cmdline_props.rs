use proptest::prelude::*;
use procsnap::classifier::ContainerClassifier;
use procsnap::system::inspector::command_line_of;
use procsnap::system::{MemPercent, percent_of};

proptest! {
    #[test]
    fn zero_total_is_always_zero(part in any::<u64>()) {
        prop_assert_eq!(percent_of(part, 0), 0.0);
        prop_assert_eq!(MemPercent::of(part, 0).to_string(), "0.00");
    }

    #[test]
    fn percent_is_non_negative_and_round_trips(
        total in 1u64..u64::MAX,
        part in any::<u64>(),
    ) {
        prop_assert!(percent_of(part, total) >= 0.0);

        let pct = MemPercent::of(part, total);
        let rendered = pct.to_string();
        let parsed: MemPercent = rendered.parse().unwrap();
        prop_assert_eq!(parsed, pct);
        prop_assert_eq!(parsed.to_string(), rendered);
    }

    #[test]
    fn fixed_point_never_exceeds_float_value(
        total in 1u64..100_000_000,
        part in 0u64..100_000_000,
    ) {
        let exact = percent_of(part, total);
        let truncated = MemPercent::of(part, total).as_f64();
        prop_assert!(truncated <= exact + 1e-9, "{} > {}", truncated, exact);
        prop_assert!(exact - truncated < 0.01 + 1e-9, "{} vs {}", truncated, exact);
    }

    #[test]
    fn cmdline_is_bounded_and_separator_free(
        raw in prop::collection::vec(any::<u8>(), 0..2048),
        max_bytes in 0usize..1024,
    ) {
        let line = command_line_of(Some(raw.as_slice()), max_bytes);
        prop_assert!(line.len() <= max_bytes.saturating_sub(1));
        prop_assert!(!line.contains('\0'));
    }

    #[test]
    fn classifier_is_deterministic(
        cmdline in ".{0,64}",
        label in prop::option::of("[a-z/]{0,32}"),
    ) {
        let classifier = ContainerClassifier::default();
        let first = classifier.is_container(&cmdline, label.as_deref());
        let second = classifier.is_container(&cmdline, label.as_deref());
        prop_assert_eq!(first, second);
    }
}
