use std::fmt;

/// How large a version jump is. Only drives display emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Major,
    Minor,
    Patch,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Major => "major",
            Severity::Minor => "minor",
            Severity::Patch => "patch",
        };
        f.write_str(name)
    }
}

/// Classifies the jump from `current` to `latest` by the first differing dotted
/// component after stripping `+build` and `-pre` suffixes.
///
/// Anything that does not differ within the shared components (suffix-only or
/// length-only differences) is a patch.
pub fn classify(current: &str, latest: &str) -> Severity {
    let current_parts = base_components(current);
    let latest_parts = base_components(latest);

    current_parts
        .iter()
        .zip(latest_parts.iter())
        .position(|(c, l)| c != l)
        .map_or(Severity::Patch, |index| match index {
            0 => Severity::Major,
            1 => Severity::Minor,
            _ => Severity::Patch,
        })
}

fn base_components(version: &str) -> Vec<&str> {
    let base = version.split('+').next().unwrap_or(version);
    let base = base.split('-').next().unwrap_or(base);
    base.split('.').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_bump() {
        assert_eq!(classify("1.2.3", "1.3.0"), Severity::Minor);
    }

    #[test]
    fn test_major_bump() {
        assert_eq!(classify("1.2.3", "2.0.0"), Severity::Major);
    }

    #[test]
    fn test_patch_bump() {
        assert_eq!(classify("1.2.3", "1.2.4"), Severity::Patch);
    }

    #[test]
    fn test_suffix_only_difference_is_patch() {
        assert_eq!(classify("1.2.3+build1", "1.2.3+build2"), Severity::Patch);
        assert_eq!(classify("1.2.3-beta.1", "1.2.3-beta.2"), Severity::Patch);
    }

    #[test]
    fn test_length_only_difference_is_patch() {
        assert_eq!(classify("1.2", "1.2.1"), Severity::Patch);
    }

    #[test]
    fn test_loader_suffixed_versions() {
        assert_eq!(classify("0.91.0+1.20.1", "0.92.2+1.20.1"), Severity::Minor);
        assert_eq!(classify("mc1.20.1-0.5.3", "mc1.20.1-0.5.4"), Severity::Patch);
    }

    #[test]
    fn test_non_numeric_components_compare_as_text() {
        assert_eq!(classify("alpha", "beta"), Severity::Major);
        assert_eq!(classify("", ""), Severity::Patch);
    }

    #[test]
    fn test_display() {
        assert_eq!(Severity::Major.to_string(), "major");
        assert_eq!(Severity::Patch.to_string(), "patch");
    }
}
