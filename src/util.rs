/// Split off the first `N` bytes as an array, or `None` if there are fewer
#[inline]
pub(crate) fn get_split<const N: usize>(data: &[u8]) -> Option<([u8; N], &[u8])> {
    data.split_first_chunk::<N>()
        .map(|(head, rest)| (*head, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(&[1, 2, 3, 4, 5], Some(([1, 2, 3, 4], &[5][..])))]
    #[case(&[1, 2, 3, 4], Some(([1, 2, 3, 4], &[][..])))]
    #[case(&[1, 2, 3], None)]
    fn test_get_split(#[case] input: &[u8], #[case] expected: Option<([u8; 4], &[u8])>) {
        assert_eq!(get_split::<4>(input), expected);
    }
}
