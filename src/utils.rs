/// True when `s` is empty or made only of ASCII spaces.
/// Tabs and newlines count as content, matching how names and values are echoed back.
pub fn is_blank(s: &str) -> bool {
    s.bytes().all(|b| b == b' ')
}

pub fn is_not_blank(s: &str) -> bool {
    !is_blank(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_rules() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(!is_blank(" a "));
        assert!(!is_blank("\t"));
        assert!(is_not_blank("PATH"));
    }
}
