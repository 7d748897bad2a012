use proptest::prelude::*;
use sse_inspect::{inspect_iter, Event};
use std::convert::Infallible;

fn events(payloads: Vec<String>) -> impl Iterator<Item = Result<Event, Infallible>> {
    payloads.into_iter().map(|data| Ok(Event::data(data)))
}

proptest! {
    #[test]
    fn yields_min_of_limit_and_input(max in 1usize..20, payloads in prop::collection::vec(".*", 0..40)) {
        let len = payloads.len();
        let results = inspect_iter(events(payloads), max, ["a"])
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        prop_assert_eq!(results.len(), len.min(max));
        for (i, result) in results.iter().enumerate() {
            prop_assert_eq!(result.sequence, i as u64 + 1);
        }
    }

    #[test]
    fn result_is_either_parsed_or_failed(data in ".*") {
        let result = inspect_iter(events(vec![data]), 1, ["a"])
            .unwrap()
            .next()
            .unwrap()
            .unwrap();

        if result.parse_failed() {
            prop_assert!(result.parsed_keys().is_empty());
            prop_assert!(result.raw_preview().is_some());
            prop_assert!(result.raw_preview().unwrap().chars().count() <= 200);
        } else {
            prop_assert!(result.raw_preview().is_none());
        }
    }

    #[test]
    fn field_preview_never_exceeds_cap(value in ".{0,900}") {
        let data = serde_json::json!({ "a": value, "b": 1 }).to_string();
        let result = inspect_iter(events(vec![data]), 1, ["a"])
            .unwrap()
            .next()
            .unwrap()
            .unwrap();

        prop_assert_eq!(result.parsed_keys(), ["a", "b"]);
        let preview = &result.matched_fields().unwrap()["a"];
        prop_assert!(preview.chars().count() <= 500);
    }
}
