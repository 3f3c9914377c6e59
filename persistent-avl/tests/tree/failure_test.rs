//! 存储故障测试

use std::sync::Arc;

use persistent_avl::{AvlTree, BatchOp, OrdComparator, StoreError, TreeDb, TreeDbConfig};

use crate::common::{check_tree, keys_of, value_of, FailingStore};

type FailingTree = AvlTree<i64, String, FailingStore>;

fn build(store: &Arc<FailingStore>, keys: impl IntoIterator<Item = i64>) -> FailingTree {
    let tree: FailingTree = AvlTree::new(Arc::clone(store), OrdComparator);
    tree.apply(keys.into_iter().map(|k| BatchOp::Insert(k, value_of(k))))
        .unwrap()
}

/// 测试：写入失败时返回错误，旧句柄保持可用，可以重试
#[test]
fn test_failed_write_keeps_old_handle() {
    let store = Arc::new(FailingStore::new());
    let tree = build(&store, 0..10);
    let before = store.inner().node_count();

    store.fail_writes(true);
    let result = tree.insert(42, value_of(42));
    assert!(matches!(result, Err(StoreError::Storage(_))));
    assert!(tree.remove(&3).is_err());
    assert!(tree.apply(vec![BatchOp::Remove(1)]).is_err());
    assert_eq!(store.inner().node_count(), before);

    // 旧句柄不受影响
    assert_eq!(keys_of(&tree), (0..10).collect::<Vec<_>>());
    check_tree(&tree);

    store.fail_writes(false);
    let retried = tree.insert(42, value_of(42)).unwrap();
    assert_eq!(retried.get(&42).unwrap(), Some(value_of(42)));
    assert_eq!(retried.len(), 11);
}

/// 测试：读取失败时错误向上传播
#[test]
fn test_failed_read_propagates() {
    let store = Arc::new(FailingStore::new());
    let tree = build(&store, 0..10);

    store.fail_reads(true);
    assert!(matches!(tree.get(&0), Err(StoreError::Storage(_))));
    assert!(tree.insert(100, value_of(100)).is_err());
    assert!(tree.at(3).is_err());

    store.fail_reads(false);
    assert_eq!(tree.get(&0).unwrap(), Some(value_of(0)));
}

/// 测试：迭代中途读取失败，错误作为下一项返回后迭代结束
#[test]
fn test_iterator_surfaces_read_error() {
    let store = Arc::new(FailingStore::new());
    let tree = build(&store, 0..10);

    let mut iter = tree.iter().unwrap();
    assert_eq!(iter.next().unwrap().unwrap().0, 0);

    store.fail_reads(true);
    let mut saw_error = false;
    for item in iter.by_ref() {
        if item.is_err() {
            saw_error = true;
            break;
        }
    }
    assert!(saw_error);
    assert!(iter.next().is_none());
}

/// 测试：head 指向的根不存在时打开失败
#[test]
fn test_dangling_root_id() {
    let store = Arc::new(FailingStore::new());
    let tree = build(&store, 0..3);
    let root_id = *tree.root_id().unwrap();

    store.inner().clear();
    let result: Result<FailingTree, _> = AvlTree::open(Arc::clone(&store), OrdComparator, Some(&root_id));
    assert!(matches!(result, Err(StoreError::NotFound)));
}

fn open_db(store: &Arc<FailingStore>) -> TreeDb<i64, String, FailingStore> {
    TreeDb::open(Arc::clone(store), TreeDbConfig::named("f"), OrdComparator).unwrap()
}

/// 测试：节点批次写入失败时 head 与快照都不变
#[test]
fn test_treedb_node_write_failure_keeps_head() {
    let store = Arc::new(FailingStore::new());
    let db = open_db(&store);
    db.insert(1, value_of(1)).unwrap();
    let before = store.inner().node_count();

    store.fail_writes(true);
    assert!(db.insert(2, value_of(2)).is_err());
    assert_eq!(store.inner().node_count(), before);
    assert_eq!(db.len(), 1);

    store.fail_writes(false);
    let reopened = open_db(&store);
    assert_eq!(keys_of(&reopened.snapshot()), vec![1]);
}

/// 测试：节点已提交但 head 写入失败，新节点不可达，重新打开仍是旧版本
#[test]
fn test_treedb_head_write_failure_leaves_unreferenced_nodes() {
    let store = Arc::new(FailingStore::new());
    let db = open_db(&store);
    db.apply((0..5).map(|k| BatchOp::Insert(k, value_of(k))))
        .unwrap();
    let reachable_before = store.inner().node_count();

    store.fail_heads(true);
    assert!(matches!(
        db.insert(9, value_of(9)),
        Err(StoreError::Storage(_))
    ));
    // 快照停留在旧版本
    assert_eq!(db.len(), 5);
    assert_eq!(db.get(&9).unwrap(), None);
    // 新路径上的节点已经写入，但没有 head 引用它们
    assert!(store.inner().node_count() > reachable_before);

    store.fail_heads(false);
    let reopened = open_db(&store);
    assert_eq!(keys_of(&reopened.snapshot()), (0..5).collect::<Vec<_>>());
    check_tree(&reopened.snapshot());

    // 之后的写入从旧版本继续
    db.insert(9, value_of(9)).unwrap();
    assert_eq!(open_db(&store).len(), 6);
}
