use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Semester codes with a display label.
///
/// Codes are matched case-sensitively. Any other code is passed through
/// as its own label by [`semester_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Semester {
    /// Mid-term of the first semester.
    Mid1,
    /// Final of the first semester.
    Final1,
    /// Mid-term of the second semester.
    Mid2,
    /// Final of the second semester.
    Final2,
}

impl Semester {
    /// Returns the human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mid1 => "Giữa HK1",
            Self::Final1 => "Cuối HK1",
            Self::Mid2 => "Giữa HK2",
            Self::Final2 => "Cuối HK2",
        }
    }
}

/// Returns the label of a semester code, or the code itself when unknown.
pub fn semester_text(code: &str) -> String {
    code.parse::<Semester>()
        .map(|semester| semester.label().to_owned())
        .unwrap_or_else(|_| code.to_owned())
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(semester_text("mid1"), "Giữa HK1");
        assert_eq!(semester_text("final1"), "Cuối HK1");
        assert_eq!(semester_text("mid2"), "Giữa HK2");
        assert_eq!(semester_text("final2"), "Cuối HK2");
    }

    #[test]
    fn test_unknown_code_is_passed_through() {
        assert_eq!(semester_text("summer"), "summer");
        assert_eq!(semester_text("MID1"), "MID1");
    }

    #[test]
    fn test_codes_round_trip() {
        for semester in Semester::iter() {
            assert_eq!(semester.as_ref().parse::<Semester>().unwrap(), semester);
        }
    }
}
