//! 随机插入 / 删除测试

use std::collections::BTreeSet;

use crate::common::sample_data::{random_keys, random_subset};
use crate::common::{check_tree, empty_tree, init_logger, keys_of, value_of};

/// 测试：100 个随机 key 中删除随机 50 个，每步都检查不变量
#[test]
fn test_random_remove_half() {
    init_logger();
    let keys = random_keys(100, 12345);

    let mut tree = empty_tree();
    for &k in &keys {
        tree = tree.insert(k, value_of(k)).unwrap();
    }
    check_tree(&tree);
    assert_eq!(tree.len(), 100);

    let removed = random_subset(&keys, 50, 54321);
    let mut remaining: BTreeSet<i64> = keys.iter().copied().collect();
    for k in &removed {
        tree = tree.remove(k).unwrap();
        remaining.remove(k);
        check_tree(&tree);
        assert_eq!(tree.get(k).unwrap(), None);
    }

    assert_eq!(keys_of(&tree), remaining.into_iter().collect::<Vec<_>>());
}

/// 测试：1000 个随机 key，验证全部可查
#[test]
fn test_random_insert_1000() {
    let keys = random_keys(1000, 98765);
    let mut tree = empty_tree();
    for &k in &keys {
        tree = tree.insert(k, value_of(k)).unwrap();
    }

    for &k in &keys {
        assert_eq!(tree.get(&k).unwrap(), Some(value_of(k)));
    }
    check_tree(&tree);
    // AVL 高度上界：1.44 * log2(n + 2)
    assert!(tree.height() <= 14, "height {}", tree.height());
}

/// 测试：随机交替 insert / remove
#[test]
fn test_random_mixed_operations() {
    let pool = random_keys(200, 7);
    let choices = random_subset(&pool, 200, 8);

    let mut tree = empty_tree();
    let mut model = BTreeSet::new();
    for (i, &k) in choices.iter().enumerate() {
        if i % 3 == 2 {
            let victim = pool[i % pool.len()];
            tree = tree.remove(&victim).unwrap();
            model.remove(&victim);
        } else {
            tree = tree.insert(k, value_of(k)).unwrap();
            model.insert(k);
        }
    }

    check_tree(&tree);
    assert_eq!(keys_of(&tree), model.into_iter().collect::<Vec<_>>());
}
