//! Examples of using the persistent trie
use persistent_trie::Trie;

fn main() {
    // Create a new trie
    let trie = Trie::new();

    // Insert some values
    let trie = trie.put("hello", 1i32);
    let trie = trie.put("world", 2i32);

    // Check values
    assert_eq!(trie.get::<i32>("hello"), Some(&1));
    assert_eq!(trie.get::<i32>("world"), Some(&2));
    assert_eq!(trie.get::<i32>("missing"), None);

    // Every version stays readable
    let without_hello = trie.remove("hello");
    assert_eq!(without_hello.get::<i32>("hello"), None);
    assert_eq!(trie.get::<i32>("hello"), Some(&1));

    // Keys can hold values of different types
    let trie = trie.put("greeting", String::from("hi"));
    assert_eq!(trie.get::<String>("greeting").map(String::as_str), Some("hi"));
    assert_eq!(trie.get::<i32>("greeting"), None);

    for key in trie.view_subtrie("h").keys() {
        println!("{}", String::from_utf8_lossy(&key));
    }
    println!("{} keys, {} under \"h\"", trie.len(), trie.count_with_prefix("h"));
}
