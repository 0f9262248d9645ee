use super::*;

#[test]
fn test_msb() {
    assert_eq!(msb(0u32), 0);
    assert_eq!(msb(1u32), 0);
    assert_eq!(msb(2u32), 1);
    assert_eq!(msb(3u32), 1);
    assert_eq!(msb(255u8), 7);
    assert_eq!(msb(256u16), 8);
    assert_eq!(msb(u64::MAX), 63);
}

#[test]
fn test_n_levels() {
    assert_eq!(n_levels(0, 0), 0);
    assert_eq!(n_levels(5, 5), 0);
    assert_eq!(n_levels(0, 1), 1);
    assert_eq!(n_levels(0, 3), 2);
    assert_eq!(n_levels(0, 4), 3);
    assert_eq!(n_levels(0, 9), 4);
    assert_eq!(n_levels(0, 255), 8);
    assert_eq!(n_levels(100, 103), 2);
    // Inverted interval.
    assert_eq!(n_levels(9, 0), 0);
}

#[test]
fn test_interval_mid() {
    assert_eq!(interval_mid(0, 9), 4);
    assert_eq!(interval_mid(5, 5), 5);
    assert_eq!(interval_mid(0, 255), 127);
    assert_eq!(interval_mid(u16::MAX - 1, u16::MAX), u16::MAX - 1);
}

#[test]
fn test_stable_partition_by_mid() {
    let data = [3u8, 1, 4, 1, 5, 0, 2];
    let (bits, left, right) = stable_partition_by_mid(&data, 2);

    assert_eq!(left, vec![1, 1, 0, 2]);
    assert_eq!(right, vec![3, 4, 5]);
    assert_eq!(
        bits,
        vec![true, false, true, false, true, false, false]
    );
}

#[test]
fn test_stable_partition_keeps_duplicates_in_order() {
    let data = [9u8, 0, 9, 0, 9, 0];
    let (bits, left, right) = stable_partition_by_mid(&data, 4);

    assert_eq!(left, vec![0, 0, 0]);
    assert_eq!(right, vec![9, 9, 9]);
    assert_eq!(bits.iter().filter(|&&b| b).count(), 3);
}

#[test]
fn test_stable_partition_one_sided() {
    let data = [1u8, 2, 3];
    let (bits, left, right) = stable_partition_by_mid(&data, 200);

    assert_eq!(left, vec![1, 2, 3]);
    assert!(right.is_empty());
    assert_eq!(bits, vec![false, false, false]);
}
