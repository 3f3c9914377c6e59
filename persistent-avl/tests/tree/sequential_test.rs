//! 顺序插入 / 删除测试

use persistent_avl::BatchOp;

use crate::common::{check_store, check_tree, empty_tree, init_logger, keys_of, make_tree, value_of};

/// 测试：插入 20..=0 再插入 -20..=-1，按排名定位
#[test]
fn test_descending_then_ascending_rank() {
    init_logger();
    let mut tree = empty_tree();
    for k in (0..=20).rev() {
        tree = tree.insert(k, value_of(k)).unwrap();
    }
    for k in -20..=-1 {
        tree = tree.insert(k, value_of(k)).unwrap();
    }

    assert_eq!(tree.len(), 41);
    check_tree(&tree);
    for j in 0..=40usize {
        let cursor = tree.at(j).unwrap();
        assert_eq!(cursor.key(), Some(&(j as i64 - 20)), "at({})", j);
        assert_eq!(cursor.index().unwrap(), j);
    }
}

/// 测试：插入 0..=30，完整中序遍历
#[test]
fn test_ascending_build_traversal() {
    let keys: Vec<i64> = (0..=30).collect();
    let tree = make_tree(&keys);

    let entries = tree.entries().unwrap();
    let expected: Vec<(i64, String)> = keys.iter().map(|&k| (k, value_of(k))).collect();
    assert_eq!(entries, expected);
    check_tree(&tree);
    // 31 个 key 的 AVL 树高度不超过 1.44 * log2(32)
    assert!(tree.height() <= 6);
}

/// 测试：左左删除后的再平衡
#[test]
fn test_remove_rebalances_left_left() {
    let tree = make_tree(&[4, 2, 6, 1, 3, 5, 7]);
    let tree = tree.remove(&7).unwrap();
    check_tree(&tree);
    let tree = tree.remove(&5).unwrap();
    check_tree(&tree);
    let tree = tree.remove(&6).unwrap();

    assert_eq!(keys_of(&tree), vec![1, 2, 3, 4]);
    assert_eq!(tree.root().unwrap().key, 2);
    check_tree(&tree);
}

/// 测试：重复 key 覆盖值，key 数量不变
#[test]
fn test_duplicate_key() {
    let tree = make_tree(&[10, 20, 30]);
    let tree = tree.insert(20, "first".to_string()).unwrap();
    let tree = tree.insert(20, "second".to_string()).unwrap();

    assert_eq!(tree.len(), 3);
    assert_eq!(tree.get(&20).unwrap(), Some("second".to_string()));
    let nodes = tree.nodes().unwrap();
    assert_eq!(nodes.iter().filter(|n| n.key == 20).count(), 1);
    check_tree(&tree);
}

/// 测试：每个旧版本在后续写入后保持不变
#[test]
fn test_every_version_is_a_snapshot() {
    let mut versions = vec![empty_tree()];
    for k in 0..20 {
        let next = versions.last().unwrap().insert(k * 3 % 20, value_of(k)).unwrap();
        versions.push(next);
    }
    for k in 0..10 {
        let next = versions.last().unwrap().remove(&(k * 2)).unwrap();
        versions.push(next);
    }

    for (i, version) in versions.iter().enumerate() {
        let expected = if i <= 20 { i } else { 20 - (i - 20) };
        assert_eq!(version.len(), expected, "version {}", i);
        check_tree(version);
    }
}

/// 测试：独立提交的各版本共享存储，存储内容等于所有版本可达节点的并集
#[test]
fn test_store_holds_only_reachable_nodes() {
    // 单批次构建，中间版本不落盘
    let v1 = empty_tree()
        .apply([5, 3, 8, 1, 4].map(|k| BatchOp::Insert(k, value_of(k))))
        .unwrap();
    let v2 = v1.insert(7, value_of(7)).unwrap();
    let v3 = v2.remove(&3).unwrap();

    // 同一个 Arc 存储
    let store = v3.store().clone();
    check_store(&store, &[&v1, &v2, &v3]);
}

/// 测试：删除全部 key 后得到空树，旧版本仍然完整
#[test]
fn test_remove_everything() {
    let keys: Vec<i64> = (0..16).collect();
    let full = make_tree(&keys);

    let mut tree = full.clone();
    for k in keys.iter().rev() {
        tree = tree.remove(k).unwrap();
        check_tree(&tree);
    }
    assert!(tree.is_empty());
    assert_eq!(tree.root_id(), None);
    assert_eq!(keys_of(&full), keys);
}
