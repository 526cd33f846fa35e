use rand::seq::SliceRandom;
use test_log::test;
use tst_trie::{Config, Index, TemporalResolution};

fn scrambled_years() -> Vec<u32> {
    let mut years: Vec<u32> = (2000..2040).collect();
    years.shuffle(&mut rand::rng());
    years
}

#[test]
fn insert_is_idempotent_for_repeated_payloads_on_distinct_keys() {
    let mut index: Index<u32> = Index::new(Config::new(12, TemporalResolution::Year).unwrap());
    for &y in &scrambled_years() {
        let t = index.encode_time(&[y]).unwrap();
        let s = index.encode_space(f64::from(y) * 0.01, f64::from(y) * 0.02);
        index.insert(t, s, y);
    }
    assert_eq!(index.live_leaf_count(), 40);
    assert_eq!(index.data_count(), 40);
}

#[test]
fn insertion_order_does_not_affect_final_shape() {
    let years: Vec<u32> = (2000..2030).collect();

    let mut forward: Index<u32> = Index::new(Config::new(14, TemporalResolution::Year).unwrap());
    for &y in &years {
        let t = forward.encode_time(&[y]).unwrap();
        let s = forward.encode_space(f64::from(y) * 0.01, 10.0);
        forward.insert(t, s, y);
    }

    let mut reversed: Index<u32> = Index::new(Config::new(14, TemporalResolution::Year).unwrap());
    for &y in years.iter().rev() {
        let t = reversed.encode_time(&[y]).unwrap();
        let s = reversed.encode_space(f64::from(y) * 0.01, 10.0);
        reversed.insert(t, s, y);
    }

    assert_eq!(forward.live_leaf_count(), reversed.live_leaf_count());
    assert_eq!(forward.live_internal_count(), reversed.live_internal_count());
    assert_eq!(forward.data_count(), reversed.data_count());
}

#[test]
fn deleting_every_record_restores_an_empty_tree() {
    let mut index: Index<u32> = Index::new(Config::new(10, TemporalResolution::Month).unwrap());
    let mut keys = Vec::new();
    for month in 1..=12u32 {
        let t = index.encode_time(&[2020, month]).unwrap();
        let s = index.encode_space(20.0 + f64::from(month), 70.0 + f64::from(month));
        index.insert(t, s, month);
        keys.push((t, s, month));
    }
    assert!(index.live_leaf_count() > 0);

    for (t, s, payload) in keys {
        index.delete(t, s, &payload);
    }

    assert_eq!(index.live_leaf_count(), 0);
    assert_eq!(index.live_internal_count(), 1); // back down to just the root
    assert_eq!(index.data_count(), 0);
}

#[test]
fn deleting_a_missing_payload_leaves_the_leaf_untouched() {
    let mut index: Index<u32> = Index::new(Config::new(10, TemporalResolution::Year).unwrap());
    let t = index.encode_time(&[2010]).unwrap();
    let s = index.encode_space(21.0, 71.0);
    index.insert(t, s, 1);

    index.delete(t, s, &999); // not present
    assert_eq!(index.live_leaf_count(), 1);
    assert_eq!(index.data_count(), 1);
}

#[test]
fn many_colocated_keys_share_one_leaf_and_bag_all_payloads() {
    let mut index: Index<u32> = Index::new(Config::new(15, TemporalResolution::Day).unwrap());
    let t = index.encode_time(&[2020, 6, 15]).unwrap();
    let s = index.encode_space(12.5, 77.5);
    for i in 0..50 {
        index.insert(t, s, i);
    }
    assert_eq!(index.live_leaf_count(), 1);
    assert_eq!(index.data_count(), 50);
}

#[test]
fn live_leaf_count_matches_model_under_random_insert_delete() {
    let mut index: Index<u32> = Index::new(Config::new(8, TemporalResolution::Year).unwrap());
    let mut live = std::collections::BTreeMap::new();

    let mut rng = rand::rng();
    for round in 0..200u32 {
        use rand::Rng;
        let year = 2000 + rng.random_range(0..60);
        if live.contains_key(&year) || rng.random_bool(0.5) {
            if let Some(&s) = live.get(&year) {
                let t = index.encode_time(&[year]).unwrap();
                index.delete(t, s, &year);
                live.remove(&year);
            }
        } else {
            let t = index.encode_time(&[year]).unwrap();
            let s = index.encode_space(f64::from(round) * 0.001, f64::from(round) * 0.002);
            index.insert(t, s, year);
            live.insert(year, s);
        }
    }

    assert_eq!(index.live_leaf_count(), live.len());
}
