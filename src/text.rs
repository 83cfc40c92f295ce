//===========================================================================//

/// Copies `value` into a fixed-width slot, padding the remainder with NUL
/// bytes.  Returns true if `value` had to be truncated to fit.
pub(crate) fn write_slot(slot: &mut [u8], value: &str) -> bool {
    let bytes = value.as_bytes();
    let len = bytes.len().min(slot.len());
    slot[..len].copy_from_slice(&bytes[..len]);
    for byte in slot[len..].iter_mut() {
        *byte = 0;
    }
    bytes.len() > slot.len()
}

/// Reads a fixed-width slot up to its first NUL byte.
pub(crate) fn read_slot(slot: &[u8]) -> String {
    let end = slot.iter().position(|&byte| byte == 0).unwrap_or(slot.len());
    String::from_utf8_lossy(&slot[..end]).into_owned()
}

/// Checks `value` against a character template, one character at a time:
/// `a` matches a lowercase letter, `A` an uppercase letter, `0` a digit,
/// `*` any printable character, and any other character only itself.
///
/// A value shorter than the template matches if what it has matches; a value
/// longer than the template never matches.
pub(crate) fn matches_template(value: &str, template: &str) -> bool {
    let mut chars = value.chars();
    for expected in template.chars() {
        let actual = match chars.next() {
            Some(actual) => actual,
            None => return true,
        };
        let ok = match expected {
            'a' => actual.is_ascii_lowercase(),
            'A' => actual.is_ascii_uppercase(),
            '0' => actual.is_ascii_digit(),
            '*' => actual.is_ascii_graphic() || actual == ' ',
            _ => actual == expected,
        };
        if !ok {
            return false;
        }
    }
    chars.next().is_none()
}

//===========================================================================//


//===========================================================================//
