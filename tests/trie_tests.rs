use persistent_trie::Trie;
use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;

#[test]
fn test_put_then_remove_both_keys() {
    let trie = Trie::new()
        .put("123", 123)
        .put("12", 12)
        .remove("12")
        .remove("123");

    assert_eq!(trie.get::<i32>("12"), None);
    assert_eq!(trie.get::<i32>("123"), None);
    assert_eq!(trie.len(), 0);
    assert!(trie.is_empty());
    assert_eq!(trie.count_with_prefix(""), 0);
}

#[test]
fn test_remove_inner_keys_one_by_one() {
    let trie = Trie::new()
        .put("test", 2333u32)
        .put("te", 23u32)
        .put("tes", 233u32);

    let trie = trie.remove("te");
    assert_eq!(trie.get::<u32>("te"), None);
    assert_eq!(trie.get::<u32>("tes"), Some(&233));
    assert_eq!(trie.get::<u32>("test"), Some(&2333));

    let trie = trie.remove("tes");
    assert_eq!(trie.get::<u32>("tes"), None);
    assert_eq!(trie.get::<u32>("test"), Some(&2333));

    let trie = trie.remove("test");
    assert_eq!(trie.get::<u32>("te"), None);
    assert_eq!(trie.get::<u32>("tes"), None);
    assert_eq!(trie.get::<u32>("test"), None);
    assert!(trie.is_empty());
}

#[test]
fn test_older_versions_survive() {
    let t1 = Trie::new().put("ab", 1);
    let t2 = t1.put("cd", 2);
    let t3 = t2.remove("ab").put("ab", 3);

    assert_eq!(t1.get::<i32>("ab"), Some(&1));
    assert_eq!(t1.get::<i32>("cd"), None);
    assert_eq!(t2.get::<i32>("ab"), Some(&1));
    assert_eq!(t2.get::<i32>("cd"), Some(&2));
    assert_eq!(t3.get::<i32>("ab"), Some(&3));
    assert_eq!(t3.get::<i32>("cd"), Some(&2));
}

#[test]
fn test_type_isolation() {
    let trie = Trie::new().put("k", 5i32);

    assert_eq!(trie.get::<String>("k"), None);
    assert_eq!(trie.get::<u32>("k"), None);
    assert_eq!(trie.get::<i64>("k"), None);
    assert_eq!(trie.get::<i32>("k"), Some(&5));
}

#[test]
fn test_mixed_value_types() {
    let trie = Trie::new()
        .put("int", 1u32)
        .put("long", 2u64)
        .put("text", String::from("three"))
        .put("list", vec![4u8, 5, 6]);

    assert_eq!(trie.get::<u32>("int"), Some(&1));
    assert_eq!(trie.get::<u64>("long"), Some(&2));
    assert_eq!(trie.get::<String>("text").map(String::as_str), Some("three"));
    assert_eq!(trie.get::<Vec<u8>>("list"), Some(&vec![4, 5, 6]));
    assert_eq!(trie.len(), 4);
}

#[test]
fn test_very_long_keys() {
    let key = vec![b'a'; 200_000];
    let half = &key[..100_000];

    let trie = Trie::new().put(&key, 1u8).put(half, 2u8);
    assert_eq!(trie.get::<u8>(&key), Some(&1));
    assert_eq!(trie.get::<u8>(half), Some(&2));
    assert_eq!(trie.count_with_prefix("a"), 2);

    let without_key = trie.remove(&key);
    assert_eq!(without_key.get::<u8>(&key), None);
    assert_eq!(without_key.get::<u8>(half), Some(&2));
    assert_eq!(without_key.len(), 1);

    let emptied = without_key.remove(half);
    assert!(emptied.is_empty());
    assert_eq!(emptied.count_with_prefix(""), 0);

    // Older versions stay intact, and each one is freed on its own
    drop(without_key);
    assert_eq!(trie.get::<u8>(&key), Some(&1));
    drop(trie);
}

/// A value that cannot be copied or cloned.
#[derive(Debug, PartialEq)]
struct Token(Box<u32>);

#[test]
fn test_move_only_values() {
    let trie = Trie::new()
        .put("a", Token(Box::new(1)))
        .put("b", Box::new(2u32));

    assert_eq!(trie.get::<Token>("a"), Some(&Token(Box::new(1))));
    assert_eq!(trie.get::<Box<u32>>("b").map(|b| **b), Some(2));

    // New versions share the stored value instead of duplicating it
    let next = trie.put("c", Token(Box::new(3)));
    let before = trie.get::<Token>("a").unwrap() as *const Token;
    let after = next.get::<Token>("a").unwrap() as *const Token;
    assert_eq!(before, after);
}

#[test]
fn test_value_handed_over_through_channel() {
    let (sender, receiver) = mpsc::channel::<u32>();
    let trie = Trie::new().put("rx", Mutex::new(receiver));

    sender.send(42).unwrap();

    let stored = trie.get::<Mutex<mpsc::Receiver<u32>>>("rx").unwrap();
    assert_eq!(stored.lock().unwrap().recv().unwrap(), 42);
}

#[test]
fn test_concurrent_readers() {
    let base = (0..100u32).fold(Trie::new(), |trie, i| trie.put(i.to_string(), i));

    thread::scope(|scope| {
        for _ in 0..4 {
            let trie = base.clone();
            scope.spawn(move || {
                for i in 0..100u32 {
                    assert_eq!(trie.get::<u32>(i.to_string()), Some(&i));
                }
            });
        }
    });
}

#[test]
fn test_concurrent_writers_from_same_base() {
    let base = Trie::new().put("shared", 0u32);

    let versions: Vec<Trie> = thread::scope(|scope| {
        let handles: Vec<_> = (1..=4u32)
            .map(|n| {
                let base = &base;
                scope.spawn(move || {
                    (0..50u32).fold(base.clone(), |trie, i| {
                        trie.put(format!("{}-{}", n, i), i * n)
                    })
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(base.len(), 1);
    for (n, version) in (1..=4u32).zip(&versions) {
        assert_eq!(version.len(), 51);
        assert_eq!(version.get::<u32>("shared"), Some(&0));
        assert_eq!(version.get::<u32>(format!("{}-{}", n, 49)), Some(&(49 * n)));
        // Other writers' keys never leak into this version
        let other = if n == 1 { 2 } else { 1 };
        assert_eq!(version.get::<u32>(format!("{}-{}", other, 0)), None);
    }
}

#[test]
fn test_trie_moves_between_threads() {
    let trie = Trie::new().put("k", String::from("v"));

    let handle = thread::spawn(move || trie.remove("k").put("k2", 2u8));
    let trie = handle.join().unwrap();

    assert_eq!(trie.get::<String>("k"), None);
    assert_eq!(trie.get::<u8>("k2"), Some(&2));
}
