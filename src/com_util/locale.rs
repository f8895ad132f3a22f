use windows::Win32::Foundation::PWSTR;
use windows::Win32::Globalization::LCIDToLocaleName;
use windows::Win32::System::SystemServices::LOCALE_NAME_MAX_LENGTH;

use super::from_wide;

/// A Windows locale identifier.
pub struct Locale {
    lcid: u32,
}

impl Locale {
    pub fn new(lcid: u32) -> Self {
        Self {
            lcid,
        }
    }

    /// Parses the hexadecimal form SAPI uses in voice attributes, e.g. `409`.
    pub fn from_hex(s: &str) -> Option<Self> {
        u32::from_str_radix(s.trim(), 16).ok().map(Self::new)
    }

    /// The locale name, e.g. `en-US`, or `None` if Windows does not know the identifier.
    pub fn name(&self) -> Option<String> {
        let mut buffer: [u16; LOCALE_NAME_MAX_LENGTH as _] = [0; LOCALE_NAME_MAX_LENGTH as _];
        let len = unsafe {
            LCIDToLocaleName(self.lcid, PWSTR(&mut buffer[0]), LOCALE_NAME_MAX_LENGTH as _, 0)
        };
        if len == 0 {
            return None;
        }
        let name = unsafe { from_wide(&PWSTR(&mut buffer[0])) };
        Some(name.to_string_lossy().into_owned())
    }
}
