use proptest::prelude::*;

use blocktime_types::{SampleWindow, StatMode};

proptest! {
    /// SampleWindow accepts exactly the positive integers.
    #[test]
    fn window_accepts_only_positive(blocks in 0u64..10_000) {
        let window = SampleWindow::new(blocks);
        prop_assert_eq!(window.is_ok(), blocks > 0);
        if let Ok(window) = window {
            prop_assert_eq!(window.get(), blocks);
        }
    }

    /// StatMode display output parses back to the same mode.
    #[test]
    fn mode_display_parses_back(median in any::<bool>()) {
        let mode = if median { StatMode::Median } else { StatMode::Mean };
        prop_assert_eq!(mode.to_string().parse::<StatMode>().unwrap(), mode);
    }

    /// Anything other than the two mode names is rejected.
    #[test]
    fn mode_rejects_other_names(name in "[a-z]{1,8}") {
        prop_assume!(name != "mean" && name != "median");
        prop_assert!(name.parse::<StatMode>().is_err());
    }
}
