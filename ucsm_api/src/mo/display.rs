//! Text rendering of managed object trees.

use std::fmt::{Display, Write};

use super::ManagedObject;

impl ManagedObject {
    /// Renders the subtree as an indented listing, one object per line.
    pub fn describe_tree(&self) -> String {
        let mut buf = String::new();
        describe_into(self, 0, &mut buf);
        buf
    }
}

fn describe_into(mo: &ManagedObject, depth: usize, buf: &mut String) {
    // Writing to a String cannot fail.
    let _ = writeln!(buf, "{:indent$}{}", "", mo, indent = depth * 2);
    for child in &mo.children {
        describe_into(child, depth + 1, buf);
    }
}

impl Display for ManagedObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.rn(), self.class_id)?;
        for (i, (name, value)) in self.attributes.iter().enumerate() {
            f.write_str(if i == 0 { " " } else { ", " })?;
            write!(f, "{name}={value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use crate::ClassId;

    use super::*;

    #[test]
    fn test_describe_tree() {
        let mut policy = ManagedObject::new(ClassId::LsbootPolicy, "org-root", "boot-policy-web")
            .with("name", "web");
        let san = policy.add_child(ClassId::LsbootSan, "san");
        san.set("order", "2");
        san.add_child(ClassId::LsbootSanCatSanImage, "sanimg-primary")
            .set("type", "primary");

        assert_eq!(
            policy.describe_tree(),
            indoc! {"
                boot-policy-web [lsbootPolicy] name=web
                  san [lsbootSan] order=2
                    sanimg-primary [lsbootSanCatSanImage] type=primary
            "}
        );
    }
}
