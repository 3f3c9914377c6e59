//! Cursor / 迭代器测试

use crate::common::sample_data::random_keys;
use crate::common::{make_tree, value_of};

/// 测试：at(i) 与 find(k).index() 互为逆运算
#[test]
fn test_rank_duality() {
    let mut keys = random_keys(120, 31337);
    let tree = make_tree(&keys);
    keys.sort_unstable();

    for (i, k) in keys.iter().enumerate() {
        assert_eq!(tree.at(i).unwrap().key(), Some(k));
        assert_eq!(tree.find(k).unwrap().index().unwrap(), i);
    }
    assert!(!tree.at(keys.len()).unwrap().is_valid());
}

/// 测试：不存在的 key 的方向定位
#[test]
fn test_seek_between_keys() {
    let tree = make_tree(&[10, 20, 30, 40]);

    assert_eq!(tree.ge(&15).unwrap().key(), Some(&20));
    assert_eq!(tree.gt(&15).unwrap().key(), Some(&20));
    assert_eq!(tree.le(&15).unwrap().key(), Some(&10));
    assert_eq!(tree.lt(&15).unwrap().key(), Some(&10));

    assert_eq!(tree.ge(&20).unwrap().key(), Some(&20));
    assert_eq!(tree.gt(&20).unwrap().key(), Some(&30));
    assert_eq!(tree.le(&20).unwrap().key(), Some(&20));
    assert_eq!(tree.lt(&20).unwrap().key(), Some(&10));

    assert!(!tree.ge(&41).unwrap().is_valid());
    assert!(!tree.le(&9).unwrap().is_valid());
}

/// 测试：从定位点开始的范围扫描
#[test]
fn test_range_scan_from_seek() {
    let keys: Vec<i64> = (0..50).map(|k| k * 2).collect();
    let tree = make_tree(&keys);

    let mut cursor = tree.ge(&31).unwrap();
    let mut scanned = Vec::new();
    while let Some(&k) = cursor.key() {
        if k >= 41 {
            break;
        }
        scanned.push(k);
        cursor.next().unwrap();
    }
    assert_eq!(scanned, vec![32, 34, 36, 38, 40]);

    // 反向扫描
    let mut cursor = tree.lt(&10).unwrap();
    let mut scanned = Vec::new();
    while let Some(&k) = cursor.key() {
        scanned.push(k);
        cursor.prev().unwrap();
    }
    assert_eq!(scanned, vec![8, 6, 4, 2, 0]);
}

/// 测试：旧版本上的 cursor 不受新版本影响
#[test]
fn test_cursor_on_old_version() {
    let v1 = make_tree(&[1, 2, 3, 4, 5]);
    let mut cursor = v1.begin().unwrap();
    cursor.next().unwrap();

    let v2 = v1.remove(&3).unwrap().insert(6, value_of(6)).unwrap();

    let mut seen = vec![*cursor.key().unwrap()];
    while cursor.has_next() {
        cursor.next().unwrap();
        seen.push(*cursor.key().unwrap());
    }
    assert_eq!(seen, vec![2, 3, 4, 5]);
    assert_eq!(v2.iter().unwrap().count(), 5);
}

/// 测试：正反迭代器结果互为逆序
#[test]
fn test_iterators_mirror() {
    let tree = make_tree(&random_keys(80, 99));
    let forward: Vec<(i64, String)> = tree.iter().unwrap().collect::<Result<_, _>>().unwrap();
    let mut backward: Vec<(i64, String)> =
        tree.iter_rev().unwrap().collect::<Result<_, _>>().unwrap();
    backward.reverse();

    assert_eq!(forward.len(), 80);
    assert_eq!(forward, backward);
    for (k, v) in &forward {
        assert_eq!(v, &value_of(*k));
    }
}
