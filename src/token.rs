use std::ffi::OsString;

use windows as Windows;
use Windows::Win32::Media::Speech::{
    IEnumSpObjectTokens, ISpObjectToken, ISpObjectTokenCategory, SpObjectTokenCategory,
};
use Windows::Win32::System::Com::{CoCreateInstance, CLSCTX_ALL};

use crate::com_util::{from_wide, next_obj, ComBox, Intf};
use crate::Result;

/// A SAPI object token, e.g. an installed voice.
#[derive(Clone)]
pub(crate) struct Token {
    pub(crate) intf: Intf<ISpObjectToken>,
}

impl Token {
    pub fn from_sapi(intf: ISpObjectToken) -> Self {
        Self {
            intf: Intf(intf),
        }
    }

    pub fn id(&self) -> Result<String> {
        let id = unsafe { ComBox::from_raw(self.intf.GetId()?) };
        Ok(unsafe { from_wide(&id) }.to_string_lossy().into_owned())
    }

    pub fn attr(&self, name: &str) -> Result<OsString> {
        let attrs = unsafe { self.intf.OpenKey("Attributes") }?;
        let value = unsafe { ComBox::from_raw(attrs.GetStringValue(name)?) };
        Ok(unsafe { from_wide(&value) })
    }

    /// Reads an attribute, treating a missing one as absent.
    pub fn opt_attr(&self, name: &str) -> Option<String> {
        self.attr(name).ok().map(|value| value.to_string_lossy().into_owned())
    }
}

pub(crate) struct Tokens {
    intf: IEnumSpObjectTokens,
}

impl Iterator for Tokens {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        unsafe { next_obj(&self.intf, IEnumSpObjectTokens::Next) }.ok()?.map(Token::from_sapi)
    }
}

/// A registry category of SAPI tokens.
pub(crate) struct Category {
    intf: ISpObjectTokenCategory,
}

impl Category {
    pub fn new(id: &str) -> Result<Self> {
        let intf: ISpObjectTokenCategory =
            unsafe { CoCreateInstance(&SpObjectTokenCategory, None, CLSCTX_ALL) }?;
        unsafe { intf.SetId(id, false) }?;
        Ok(Self {
            intf,
        })
    }

    pub fn enum_tokens(&self) -> Result<Tokens> {
        let intf = unsafe { self.intf.EnumTokens("", "") }?;
        Ok(Tokens {
            intf,
        })
    }
}
