use test_log::test;
use tst_trie::{Config, Index, TemporalResolution};

/// Builds the six-record scenario used throughout the design notes:
/// three days, two places, with overlapping and non-overlapping windows.
fn build_scenario() -> Index<&'static str> {
    let mut index = Index::new(Config::new(18, TemporalResolution::Hour).unwrap());

    let place_a = (23.180, 72.632); // inside the query rectangle
    let place_b = (10.0, 10.0); // far outside

    for (day, hour, place, label) in [
        (20u32, 23u32, place_a, "day20-late"),
        (21, 0, place_a, "day21-midnight-a"),
        (21, 0, place_b, "day21-midnight-b"),
        (21, 6, place_a, "day21-morning"),
        (21, 12, place_a, "day21-noon"),
        (22, 0, place_a, "day22-start"),
    ] {
        let t = index.encode_time(&[2016, 4, day, hour]).unwrap();
        let s = index.encode_space(place.0, place.1);
        index.insert(t, s, label);
    }

    index
}

#[test]
fn narrow_window_returns_only_the_matching_hour() {
    let index = build_scenario();
    let covering = index.rectangle_to_cells((23.176, 72.630), (23.210, 72.635));

    let t_start = index.encode_time(&[2016, 4, 21, 0]).unwrap();
    let t_end = index.encode_time(&[2016, 4, 21, 1]).unwrap();
    let hits = index.range_search(&covering, t_start, t_end);

    assert_eq!(hits, vec!["day21-midnight-a"]);
}

#[test]
fn wider_window_excludes_other_locations() {
    let index = build_scenario();
    let covering = index.rectangle_to_cells((23.176, 72.630), (23.210, 72.635));

    let t_start = index.encode_time(&[2016, 4, 21, 0]).unwrap();
    let t_end = index.encode_time(&[2016, 4, 21, 13]).unwrap();
    let mut hits = index.range_search(&covering, t_start, t_end);
    hits.sort_unstable();

    let mut expected = vec!["day21-midnight-a", "day21-morning", "day21-noon"];
    expected.sort_unstable();
    assert_eq!(hits, expected);
}

#[test]
fn window_boundaries_are_half_open() {
    let index = build_scenario();
    let covering = index.rectangle_to_cells((23.176, 72.630), (23.210, 72.635));

    let t_start = index.encode_time(&[2016, 4, 21, 0]).unwrap();
    let t_end = index.encode_time(&[2016, 4, 22, 0]).unwrap();
    let hits = index.range_search(&covering, t_start, t_end);

    assert!(hits.contains(&"day21-midnight-a"));
    assert!(!hits.contains(&"day22-start")); // t_end is exclusive
    assert!(!hits.contains(&"day20-late")); // before t_start
}

#[test]
fn covering_that_misses_the_rectangle_returns_nothing() {
    let index = build_scenario();
    let covering = index.rectangle_to_cells((1.0, 1.0), (1.01, 1.01));

    let t_start = index.encode_time(&[2016, 4, 20, 0]).unwrap();
    let t_end = index.encode_time(&[2016, 4, 23, 0]).unwrap();
    let hits = index.range_search(&covering, t_start, t_end);

    assert!(hits.is_empty());
}

#[test]
fn deleting_a_hit_removes_it_from_subsequent_scans() {
    let mut index = build_scenario();
    let covering = index.rectangle_to_cells((23.176, 72.630), (23.210, 72.635));
    let t_start = index.encode_time(&[2016, 4, 21, 0]).unwrap();
    let t_end = index.encode_time(&[2016, 4, 21, 1]).unwrap();

    assert_eq!(index.range_search(&covering, t_start, t_end), vec!["day21-midnight-a"]);

    let place_a = index.encode_space(23.180, 72.632);
    index.delete(t_start, place_a, &"day21-midnight-a");

    assert!(index.range_search(&covering, t_start, t_end).is_empty());
}
