//! Non-fatal conditions reported alongside successful results, and the policy
//! deciding which of them get emitted.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

//===========================================================================//

/// A text field of the package header.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum Field {
    /// The name displayed in the calculator menu.
    ProgramName,
    /// The internal application name, conventionally `@` then uppercase.
    InternalName,
    /// The version string.
    Version,
    /// The build date string.
    BuildDate,
}

impl Field {
    /// Returns the width of the field's slot in the header, in bytes.
    pub fn max_len(&self) -> usize {
        match *self {
            Field::ProgramName => crate::layout::PROGRAM_NAME.len,
            Field::InternalName => crate::layout::INTERNAL_NAME.len,
            Field::Version => crate::layout::VERSION.len,
            Field::BuildDate => crate::layout::BUILD_DATE.len,
        }
    }

    /// Returns the advisory format of the field, as a matching template and
    /// a human-readable rendition, or `None` if any text is fine.
    pub fn template(&self) -> Option<(&'static str, &'static str)> {
        match *self {
            Field::ProgramName => None,
            Field::InternalName => Some(("@AAAAAAA", "@[A-Z]{0,7}")),
            Field::Version => Some(("00.00.0000", "MM.mm.pppp")),
            Field::BuildDate => Some(("0000.0000.0000", "yyyy.MMdd.hhmm")),
        }
    }

    fn label(&self) -> &'static str {
        match *self {
            Field::ProgramName => "application name",
            Field::InternalName => "internal name",
            Field::Version => "version string",
            Field::BuildDate => "date string",
        }
    }
}

//===========================================================================//

/// A condition worth reporting that does not stop the operation.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum Warning {
    /// A field value is longer than its slot and will be truncated.
    FieldTooLong {
        /// Which field.
        field: Field,
        /// The full value as given.
        value: String,
    },
    /// A field value does not follow the field's advisory format.
    FieldFormat {
        /// Which field.
        field: Field,
        /// The value as given.
        value: String,
    },
    /// The icon bitmap is not as wide as expected.
    IconWidth {
        /// The bitmap's declared width.
        found: u32,
        /// The expected width.
        expected: u32,
    },
    /// The icon bitmap is not as tall as expected.
    IconHeight {
        /// The bitmap's declared height.
        found: u32,
        /// The expected height.
        expected: u32,
    },
    /// The icon has pixels that are neither pure black nor pure white.
    IconNotMonochrome,
    /// The icon uses a color depth whose decoding is best-effort.
    IconPartiallySupported {
        /// The bitmap's depth in bits per pixel.
        depth: u16,
    },
}

impl Warning {
    /// Returns the short name used to enable or disable this kind of warning.
    pub fn name(&self) -> &'static str {
        match *self {
            Warning::FieldTooLong { .. } => "length",
            Warning::FieldFormat { .. } => "format",
            Warning::IconWidth { .. } => "bmp-width",
            Warning::IconHeight { .. } => "bmp-height",
            Warning::IconNotMonochrome => "bmp-color",
            Warning::IconPartiallySupported { .. } => "bmp-16-bit",
        }
    }

    /// Returns true if this kind of warning may be disabled.
    pub fn is_maskable(&self) -> bool {
        is_maskable(self.name())
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Warning::FieldTooLong { field, ref value } => write!(
                f,
                "{} '{}' is too long (maximum is {} characters)",
                field.label(),
                value,
                field.max_len()
            ),
            Warning::FieldFormat { field, ref value } => {
                let shown = field.template().map_or("", |(_, shown)| shown);
                write!(
                    f,
                    "{} '{}' does not have expected format '{}'",
                    field.label(),
                    value,
                    shown
                )
            }
            Warning::IconWidth { found, expected } => write!(
                f,
                "bitmap image has width {}, expected {}",
                found, expected
            ),
            Warning::IconHeight { found, expected } => write!(
                f,
                "bitmap image has height {}, expected {}",
                found, expected
            ),
            Warning::IconNotMonochrome => {
                write!(f, "bitmap image is not black and white")
            }
            Warning::IconPartiallySupported { depth } => {
                write!(f, "{}-bit bitmap is not fully supported", depth)
            }
        }
    }
}

//===========================================================================//

const MASKABLE: &[&str] =
    &["length", "format", "bmp-width", "bmp-height", "bmp-color"];

fn is_maskable(name: &str) -> bool {
    MASKABLE.contains(&name)
}

/// Decides which warnings are emitted.  Every warning starts enabled.
#[derive(Clone, Debug, Default)]
pub struct WarningPolicy {
    disabled: BTreeSet<&'static str>,
}

impl WarningPolicy {
    /// Creates a policy with every warning enabled.
    pub fn new() -> WarningPolicy {
        WarningPolicy::default()
    }

    /// Applies a switch of the form `<name>` (enable) or `no-<name>`
    /// (disable).  Returns false if the switch doesn't name a maskable
    /// warning, in which case nothing changes.
    pub fn apply_argument(&mut self, argument: &str) -> bool {
        let (enable, name) = match argument.strip_prefix("no-") {
            Some(name) => (false, name),
            None => (true, argument),
        };
        let name = match MASKABLE.iter().find(|&&known| known == name) {
            Some(&name) => name,
            None => return false,
        };
        if enable {
            self.disabled.remove(name);
        } else {
            self.disabled.insert(name);
        }
        true
    }

    /// Returns true if `warning` should be reported.
    pub fn is_enabled(&self, warning: &Warning) -> bool {
        !self.disabled.contains(warning.name())
    }

    /// Logs `warning` about `subject` if it is enabled.  Returns whether it
    /// was emitted.
    pub fn emit(&self, subject: &dyn fmt::Display, warning: &Warning) -> bool {
        if !self.is_enabled(warning) {
            log::debug!("suppressed {} warning for {}", warning.name(), subject);
            return false;
        }
        log::warn!("{}: {}", subject, warning);
        true
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{Field, Warning, WarningPolicy};

    #[test]
    fn warning_messages() {
        let warning = Warning::FieldTooLong {
            field: Field::InternalName,
            value: "@TOOLONGNAME".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "internal name '@TOOLONGNAME' is too long (maximum is 8 characters)"
        );
        let warning = Warning::FieldFormat {
            field: Field::Version,
            value: "1.0".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "version string '1.0' does not have expected format 'MM.mm.pppp'"
        );
    }

    #[test]
    fn policy_disables_and_reenables() {
        let mut policy = WarningPolicy::new();
        let warning = Warning::IconNotMonochrome;
        assert!(policy.is_enabled(&warning));
        assert!(policy.apply_argument("no-bmp-color"));
        assert!(!policy.is_enabled(&warning));
        assert!(!policy.emit(&"icon.bmp", &warning));
        assert!(policy.apply_argument("bmp-color"));
        assert!(policy.is_enabled(&warning));
    }

    #[test]
    fn policy_rejects_unknown_and_unmaskable() {
        let mut policy = WarningPolicy::new();
        assert!(!policy.apply_argument("no-such-thing"));
        assert!(!policy.apply_argument("no-bmp-16-bit"));
        let warning = Warning::IconPartiallySupported { depth: 16 };
        assert!(!warning.is_maskable());
        assert!(policy.is_enabled(&warning));
        assert!(Warning::IconNotMonochrome.is_maskable());
    }
}

//===========================================================================//
