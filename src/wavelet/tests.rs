use super::*;
use crate::perf_and_test_utils::gen_sequence;

#[test]
fn test_small() {
    let data = [1u8, 0, 1, 0, 2, 4, 5, 3];
    let wt = WaveletTree::new(&data, 0, 5);

    assert_eq!(wt.len(), 8);
    assert!(!wt.is_empty());
    assert_eq!(wt.n_levels(), 3);
    assert_eq!(wt.alphabet(), (0, 5));

    assert_eq!(wt.rank(1, 4), 2);
    assert_eq!(wt.rank(0, 8), 2);
    assert_eq!(wt.kth(0, 8, 0), 0);
    assert_eq!(wt.kth(0, 8, 7), 5);
    assert_eq!(wt.range_count(0, 8, 1, 3), 4);
}

#[test]
fn test_empty_tree() {
    let wt = WaveletTree::new(&[], 0, 9);
    assert!(wt.is_empty());
    assert_eq!(wt.len(), 0);
    assert_eq!(wt.rank(0, 100), 0);
    assert_eq!(wt.range_count(0, 100, 0, 9), 0);

    let wt = WaveletTree::default();
    assert!(wt.is_empty());
    assert_eq!(wt.rank(0, 1), 0);
}

#[test]
fn test_children_lengths_sum_to_parent() {
    let data = gen_sequence(512, 40);
    let wt = WaveletTree::new(&data, 0, 39);

    fn check(node: &Node) {
        if let Some(children) = node.children.as_deref() {
            assert_eq!(
                children.left.bitv.len() + children.right.bitv.len(),
                node.bitv.len()
            );
            // Ones route right, so the right child holds exactly that many.
            assert_eq!(node.bitv.rank1(node.bitv.len()), children.right.bitv.len());
            check(&children.left);
            check(&children.right);
        } else {
            assert!(node.low == node.high || node.bitv.is_empty());
        }
    }

    let root = wt.root.as_deref().unwrap();
    assert_eq!(root.bitv.len(), data.len());
    check(root);
}

#[test]
fn test_determinism() {
    let data = gen_sequence(1024, 100);
    let wt1 = WaveletTree::new(&data, 0, 99);
    let wt2 = WaveletTree::new(&data, 0, 99);

    assert_eq!(wt1, wt2);
    for pos in (0..=data.len()).step_by(97) {
        assert_eq!(wt1.rank(42, pos), wt2.rank(42, pos));
    }
}

#[test]
fn test_offset_alphabet() {
    let data = [200u8, 210, 220, 230, 200, 210];
    let wt = WaveletTree::new(&data, 200, 230);

    assert_eq!(wt.rank(200, 6), 2);
    assert_eq!(wt.rank(230, 6), 1);
    assert_eq!(wt.rank(199, 6), 0);
    assert_eq!(wt.kth(0, 6, 0), 200);
    assert_eq!(wt.kth(0, 6, 5), 230);
    assert_eq!(wt.range_count(0, 6, 205, 225), 3);
}

#[test]
#[should_panic(expected = "empty tree")]
fn test_kth_on_empty_tree() {
    WaveletTree::new(&[], 0, 9).kth(0, 0, 0);
}

#[test]
#[should_panic(expected = "out of bounds")]
fn test_kth_inverted_range() {
    WaveletTree::new(&[1, 2, 3], 0, 9).kth(2, 1, 0);
}

#[test]
#[should_panic(expected = "order statistic")]
fn test_kth_order_statistic_too_large() {
    WaveletTree::new(&[1, 2, 3], 0, 9).kth(0, 3, 3);
}

#[test]
fn test_serialize() {
    let data = gen_sequence(300, 27);
    let wt = WaveletTree::new(&data, 0, 26);

    let serialized = bincode::serialize(&wt).unwrap();
    let des_wt = bincode::deserialize::<WaveletTree>(&serialized).unwrap();

    assert_eq!(des_wt, wt);
}
