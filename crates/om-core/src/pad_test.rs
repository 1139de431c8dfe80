use super::*;

#[test]
fn test_pads_to_width() {
    assert_eq!(lpad(7, 3), "007");
    assert_eq!(lpad(42, 5), "00042");
}

#[test]
fn test_exact_width_unchanged() {
    assert_eq!(lpad(123, 3), "123");
}

#[test]
fn test_wider_than_width_not_truncated() {
    assert_eq!(lpad(123456, 3), "123456");
}

#[test]
fn test_zero_width() {
    assert_eq!(lpad(0, 0), "0");
    assert_eq!(lpad(19, 0), "19");
}

#[test]
fn test_zero_value() {
    assert_eq!(lpad(0, 4), "0000");
}

#[test]
fn test_length_is_max_of_width_and_digits() {
    for n in [0u64, 1, 9, 10, 99, 100, 4096, 1_000_000, u64::MAX] {
        let digits = n.to_string();
        for w in 0..12usize {
            let padded = lpad(n, w);
            assert_eq!(padded.len(), w.max(digits.len()), "lpad({n}, {w})");
            assert!(padded.ends_with(&digits));
            let zeros = &padded[..padded.len() - digits.len()];
            assert!(zeros.chars().all(|c| c == '0'), "lpad({n}, {w}) = {padded}");
        }
    }
}
