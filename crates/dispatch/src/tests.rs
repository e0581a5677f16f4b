use std::collections::HashSet;

use crate::{run, Item};

/// Expands `n` into its successors the same way the engine under test does,
/// but sequentially: a plain BFS to the fixed point.
fn sequential_fixed_point(seed: &[u32], expand: impl Fn(u32) -> Vec<u32>) -> HashSet<u32> {
    let mut seen: HashSet<u32> = seed.iter().copied().collect();
    let mut queue: Vec<u32> = seed.to_vec();
    while let Some(n) = queue.pop() {
        for next in expand(n) {
            if seen.insert(next) {
                queue.push(next);
            }
        }
    }
    seen
}

fn multiplier_expand(n: u32) -> Vec<u32> {
    const CEILING: u32 = 100;
    [2u32, 3, 5, 7].iter().map(|m| (n * m) % CEILING).collect()
}

fn crawl(seed: &[u32], concurrency: usize) -> HashSet<u32> {
    let mut seen: HashSet<u32> = seed.iter().copied().collect();
    let items: Vec<Item<u32, Vec<u32>>> = seed.iter().copied().map(Item::new).collect();

    run(
        |item: &Item<u32, Vec<u32>>| {
            let mut new_items = Vec::new();
            if let Some(output) = &item.output {
                for &n in output {
                    if seen.insert(n) {
                        new_items.push(Item::new(n));
                    }
                }
            }
            Ok(new_items)
        },
        |&n| Ok(multiplier_expand(n)),
        items,
        concurrency,
    )
    .unwrap();

    seen
}

#[test]
fn reaches_the_sequential_fixed_point() {
    let seed: Vec<u32> = (1..=10).collect();
    let expected = sequential_fixed_point(&seed, multiplier_expand);
    assert_eq!(crawl(&seed, 10), expected);
}

#[test]
fn fixed_point_is_independent_of_concurrency() {
    let seed: Vec<u32> = (0..100).collect();
    let expected = sequential_fixed_point(&seed, multiplier_expand);
    for concurrency in [1, 2, 10] {
        assert_eq!(crawl(&seed, concurrency), expected, "concurrency {concurrency}");
    }
}

#[test]
fn self_reference_terminates() {
    // "a/b" yields itself plus "c/d"; "c/d" yields nothing.
    let mut seen: HashSet<&str> = HashSet::from(["a/b"]);
    let items = vec![Item::new("a/b")];

    run(
        |item: &Item<&str, Vec<&str>>| {
            let mut out = Vec::new();
            for &p in item.output.iter().flatten() {
                if seen.insert(p) {
                    out.push(Item::new(p));
                }
            }
            Ok(out)
        },
        |&path| {
            Ok(match path {
                "a/b" => vec!["a/b", "c/d"],
                _ => vec![],
            })
        },
        items,
        4,
    )
    .unwrap();

    assert_eq!(seen, HashSet::from(["a/b", "c/d"]));
}

#[test]
fn empty_seed_returns_immediately() {
    let result = run(
        |_: &Item<u32, u32>| Ok(vec![]),
        |&n| Ok(n),
        Vec::new(),
        4,
    );
    assert!(result.is_ok());
}

#[test]
fn errored_items_are_recorded_and_not_expanded() {
    let mut dispatched = Vec::new();
    let items: Vec<Item<u32, Vec<u32>>> = vec![Item::new(1), Item::new(2)];

    let err = run(
        |item: &Item<u32, Vec<u32>>| {
            dispatched.push(item.data);
            Ok(vec![])
        },
        |&n| {
            if n == 2 {
                anyhow::bail!("decode failed for {n}")
            }
            Ok(vec![])
        },
        items,
        2,
    )
    .unwrap_err();

    assert_eq!(err.len(), 1);
    assert!(err.errors()[0].to_string().contains("decode failed for 2"));
    // The failing item never reached dispatch.
    assert_eq!(dispatched, vec![1]);
}

#[test]
fn a_panicking_worker_does_not_deadlock() {
    let items: Vec<Item<u32, u32>> = (0..8).map(Item::new).collect();

    let err = run(
        |_: &Item<u32, u32>| Ok(vec![]),
        |&n| {
            if n == 3 {
                panic!("boom on {n}");
            }
            Ok(n)
        },
        items,
        4,
    )
    .unwrap_err();

    assert_eq!(err.len(), 1);
    assert!(err.errors()[0].to_string().contains("worker panicked"));
    assert!(err.errors()[0].to_string().contains("boom on 3"));
}

#[test]
fn dispatch_errors_aggregate_too() {
    let items: Vec<Item<u32, u32>> = vec![Item::new(1), Item::new(2)];

    let err = run(
        |item: &Item<u32, u32>| {
            if item.data == 1 {
                anyhow::bail!("dispatch rejected {}", item.data)
            }
            Ok(vec![])
        },
        |&n| Ok(n),
        items,
        2,
    )
    .unwrap_err();

    assert_eq!(err.len(), 1);
    assert!(err.errors()[0].to_string().contains("dispatch rejected 1"));
}

#[test]
fn all_errors_are_collected_without_fail_fast() {
    let items: Vec<Item<u32, u32>> = (0..6).map(Item::new).collect();

    let err = run(
        |_: &Item<u32, u32>| Ok(vec![]),
        |&n| {
            if n % 2 == 0 {
                anyhow::bail!("even input {n}")
            }
            Ok(n)
        },
        items,
        3,
    )
    .unwrap_err();

    assert_eq!(err.len(), 3);
    let rendered = err.to_string();
    assert!(rendered.contains("3 error(s) occurred"));
}

#[test]
fn concurrency_zero_still_runs() {
    let items = vec![Item::new(7u32)];
    let mut outputs = Vec::new();
    run(
        |item: &Item<u32, u32>| {
            outputs.push(item.output.unwrap());
            Ok(vec![])
        },
        |&n| Ok(n * 2),
        items,
        0,
    )
    .unwrap();
    assert_eq!(outputs, vec![14]);
}
