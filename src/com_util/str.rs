use std::ffi::OsString;
use std::os::windows::prelude::OsStringExt;

use windows::Win32::Foundation::PWSTR;

pub unsafe fn from_wide(s: &PWSTR) -> OsString {
    let len = (0..).take_while(|&i| *s.0.offset(i) != 0).count();
    let slice = std::slice::from_raw_parts(s.0, len);
    OsString::from_wide(slice)
}
