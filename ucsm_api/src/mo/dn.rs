//! Helpers for distinguished names.
//!
//! A DN is a `/`-delimited path of relative names (RNs), e.g.
//! `org-root/boot-policy-default/san/sanimg-primary`.

/// Joins a parent DN and a relative name.
pub fn join(parent_dn: &str, rn: &str) -> String {
    if parent_dn.is_empty() {
        rn.to_string()
    } else {
        format!("{parent_dn}/{rn}")
    }
}

/// Returns the DN of the parent, or an empty string for a top-level DN.
pub fn parent(dn: &str) -> &str {
    dn.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

/// Returns the last relative name of the DN.
pub fn rn(dn: &str) -> &str {
    dn.rsplit_once('/').map(|(_, rn)| rn).unwrap_or(dn)
}

/// Returns true if `dn` is a strict descendant of `ancestor`.
pub fn is_descendant(dn: &str, ancestor: &str) -> bool {
    dn.len() > ancestor.len() + 1
        && dn.starts_with(ancestor)
        && dn.as_bytes()[ancestor.len()] == b'/'
}

/// Returns true if `dn` is a direct child of `parent_dn`.
pub fn is_child(dn: &str, parent_dn: &str) -> bool {
    is_descendant(dn, parent_dn) && !dn[parent_dn.len() + 1..].contains('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join() {
        assert_eq!(join("", "org-root"), "org-root");
        assert_eq!(
            join("org-root", "boot-policy-web"),
            "org-root/boot-policy-web"
        );
    }

    #[test]
    fn test_parent_and_rn() {
        let dn = "org-root/boot-policy-web/san/sanimg-primary";
        assert_eq!(parent(dn), "org-root/boot-policy-web/san");
        assert_eq!(rn(dn), "sanimg-primary");
        assert_eq!(parent("org-root"), "");
        assert_eq!(rn("org-root"), "org-root");
    }

    #[test]
    fn test_descendants() {
        assert!(is_descendant("org-root/a/b", "org-root"));
        assert!(!is_descendant("org-root", "org-root"));
        assert!(!is_descendant("org-rootx/a", "org-root"));
        assert!(is_child("org-root/a", "org-root"));
        assert!(!is_child("org-root/a/b", "org-root"));
    }
}
